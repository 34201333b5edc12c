use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Drawing options. Every field falls back to its default when missing from
/// a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawOptions {
    pub bond_length: f64,
    /// Fraction of the bond length kept by the inner line of a ring double
    /// bond.
    pub short_bond_length: f64,
    /// Distance between the lines of a multiple bond.
    pub bond_spacing: f64,
    pub bond_thickness: f64,
    pub kk_threshold: f64,
    pub kk_inner_threshold: f64,
    pub kk_max_iteration: usize,
    pub kk_max_inner_iteration: usize,
    pub kk_max_energy: f64,
    pub overlap_sensitivity: f64,
    pub explicit_hydrogens: bool,
    /// Honour chirality markers. When off, stereocenters are not detected.
    pub isomeric: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        let bond_length = 30.0;
        Self {
            bond_length,
            short_bond_length: 0.8,
            bond_spacing: 0.17 * bond_length,
            bond_thickness: 1.0,
            kk_threshold: 0.1,
            kk_inner_threshold: 0.1,
            kk_max_iteration: 20000,
            kk_max_inner_iteration: 50,
            kk_max_energy: 1e9,
            overlap_sensitivity: 0.42,
            explicit_hydrogens: true,
            isomeric: true,
        }
    }
}

impl DrawOptions {
    /// Reads options from JSON and checks them with [`DrawOptions::validate`].
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Bond length and thickness scale every computed shape and must be
    /// positive.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("bondLength", self.bond_length),
            ("bondThickness", self.bond_thickness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OptionsError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    pub fn half_bond_spacing(&self) -> f64 {
        self.bond_spacing / 2.0
    }

    pub fn bond_length_sq(&self) -> f64 {
        self.bond_length * self.bond_length
    }

    /// Total length removed from the inner line of a ring double bond.
    pub fn short_bond_shortening(&self) -> f64 {
        self.bond_length - self.short_bond_length * self.bond_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = DrawOptions::default();
        assert_eq!(opts.bond_length, 30.0);
        assert!((opts.bond_spacing - 5.1).abs() < 1e-12);
        assert!((opts.short_bond_shortening() - 6.0).abs() < 1e-12);
        assert_eq!(opts.kk_max_iteration, 20000);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts = DrawOptions::from_json(r#"{"bondLength": 40, "explicitHydrogens": false}"#).unwrap();
        assert_eq!(opts.bond_length, 40.0);
        assert!(!opts.explicit_hydrogens);
        assert_eq!(opts.kk_max_inner_iteration, 50);
        assert!(opts.isomeric);
    }

    #[test]
    fn round_trips_through_camel_case() {
        let json = serde_json::to_string(&DrawOptions::default()).unwrap();
        assert!(json.contains("\"kkMaxEnergy\""));
        assert_eq!(DrawOptions::from_json(&json).unwrap(), DrawOptions::default());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            DrawOptions::from_json(r#"{"bondLength": "long"}"#),
            Err(OptionsError::Json(_))
        ));
    }

    #[test]
    fn rejects_non_positive_lengths() {
        for json in [r#"{"bondThickness": 0}"#, r#"{"bondThickness": -1.5}"#, r#"{"bondLength": 0}"#] {
            let err = DrawOptions::from_json(json).unwrap_err();
            assert!(matches!(err, OptionsError::NotPositive { .. }), "{json}");
        }
        let options = DrawOptions {
            bond_length: f64::INFINITY,
            ..DrawOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::NotPositive { field: "bondLength", .. })
        ));
    }
}
