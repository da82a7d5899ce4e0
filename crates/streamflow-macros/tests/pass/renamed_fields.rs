use streamflow_macros::FieldVector;

#[derive(Debug, Clone, Copy, FieldVector)]
pub struct Reservoir {
    #[field_vector(name = "K_s")]
    pub k_s: f64,
    pub capacity: f64,
}

fn main() {
    assert_eq!(Reservoir::field_names(), &["K_s", "capacity"]);
    let err = Reservoir::from_slice(&[1.0]).unwrap_err();
    assert!(err.contains("K_s, capacity"));
    assert!(err.contains("got 1"));
}
