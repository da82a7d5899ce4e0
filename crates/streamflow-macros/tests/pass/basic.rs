use streamflow_macros::FieldVector;

#[derive(Debug, Clone, Copy, FieldVector)]
pub struct TestState {
    pub upper: f64,
    pub lower: f64,
    pub outflow: f64,
}

fn main() {
    let s = TestState { upper: 1.0, lower: 2.0, outflow: 3.0 };
    assert_eq!(TestState::LEN, 3);
    assert_eq!(s.to_array(), [1.0, 2.0, 3.0]);
    assert_eq!(TestState::field_names(), &["upper", "lower", "outflow"]);

    let back = TestState::from_array([4.0, 5.0, 6.0]);
    assert_eq!(back.lower, 5.0);

    assert!(TestState::from_slice(&[1.0, 2.0]).is_err());
    let ok = TestState::from_slice(&[7.0, 8.0, 9.0]).unwrap();
    assert_eq!(ok.outflow, 9.0);
}
