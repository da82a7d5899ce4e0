/// Catchment model state and derivative vectors.
///
/// Both share the same ordering: interception storage `S_i`, unsaturated
/// storage `S_u`, slow reservoir `S_s`, fast reservoir `S_f`, cumulative
/// discharge `z`.
use streamflow_macros::FieldVector;

#[derive(Debug, Clone, Copy, Default, PartialEq, FieldVector)]
pub struct State {
    /// Interception storage `S_i` [mm].
    #[field_vector(name = "S_i")]
    pub interception: f64,
    /// Unsaturated zone storage `S_u` [mm].
    #[field_vector(name = "S_u")]
    pub unsaturated: f64,
    /// Slow reservoir storage `S_s` [mm].
    #[field_vector(name = "S_s")]
    pub slow: f64,
    /// Fast reservoir storage `S_f` [mm].
    #[field_vector(name = "S_f")]
    pub fast: f64,
    /// Cumulative discharge `z` [mm].
    #[field_vector(name = "z")]
    pub discharge: f64,
}

impl State {
    /// Completely dry catchment with nothing discharged yet.
    pub fn dry() -> Self {
        Self::default()
    }
}

/// Time derivatives of [`State`], same ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, FieldVector)]
pub struct Derivatives {
    #[field_vector(name = "dS_i")]
    pub interception: f64,
    #[field_vector(name = "dS_u")]
    pub unsaturated: f64,
    #[field_vector(name = "dS_s")]
    pub slow: f64,
    #[field_vector(name = "dS_f")]
    pub fast: f64,
    #[field_vector(name = "dz")]
    pub discharge: f64,
}

impl Derivatives {
    /// Net change of the four storages, excluding the discharge accumulator.
    pub fn storage_change(&self) -> f64 {
        self.interception + self.unsaturated + self.slow + self.fast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STATE_SIZE;

    #[test]
    fn layout_matches_contract() {
        assert_eq!(State::LEN, STATE_SIZE);
        assert_eq!(Derivatives::LEN, STATE_SIZE);
        assert_eq!(State::field_names(), &["S_i", "S_u", "S_s", "S_f", "z"]);
    }

    #[test]
    fn to_array_preserves_order() {
        let s = State {
            interception: 1.0,
            unsaturated: 2.0,
            slow: 3.0,
            fast: 4.0,
            discharge: 5.0,
        };
        assert_eq!(s.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(State::from_array(s.to_array()), s);
    }

    #[test]
    fn from_slice_wrong_length() {
        assert!(State::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(State::from_slice(&[0.0; 6]).is_err());
        let err = State::from_slice(&[]).unwrap_err();
        assert!(err.contains("got 0"));
    }

    #[test]
    fn dry_state_is_zero() {
        assert_eq!(State::dry().to_array(), [0.0; STATE_SIZE]);
    }
}
