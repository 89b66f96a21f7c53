//! # Materials
//!
//! Material model for reinforced concrete flexure: concrete compressive
//! strength `f'c` and reinforcing-steel yield strength `fy`, both in MPa.
//! The fixed constants (εcu, Es) and everything derived from the strengths
//! come from the [`DesignCode`](crate::design_code::DesignCode).
//!
//! ## Example
//!
//! ```rust
//! use rcb_core::materials::ConcreteMaterial;
//! use rcb_core::design_code::DesignCode;
//!
//! let mat = ConcreteMaterial::new(28.0, 415.0);
//! let code = DesignCode::nscp_2015();
//! assert!(mat.validate().is_ok());
//! assert!((mat.yield_strain(&code) - 0.002075).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::design_code::DesignCode;
use crate::errors::{CalcError, CalcResult};

/// Concrete and reinforcing-steel strengths.
///
/// ## JSON Example
///
/// ```json
/// { "fc_mpa": 28.0, "fy_mpa": 415.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    /// Specified concrete compressive strength f'c (MPa)
    #[serde(alias = "fc")]
    pub fc_mpa: f64,

    /// Reinforcement yield strength fy (MPa)
    #[serde(alias = "fy")]
    pub fy_mpa: f64,
}

impl ConcreteMaterial {
    /// Create a new material model
    pub fn new(fc_mpa: f64, fy_mpa: f64) -> Self {
        ConcreteMaterial { fc_mpa, fy_mpa }
    }

    /// Validate that both strengths are positive
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.fc_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "fc",
                self.fc_mpa.to_string(),
                "f'c must be positive",
            ));
        }
        if !(self.fy_mpa > 0.0) {
            return Err(CalcError::invalid_input(
                "fy",
                self.fy_mpa.to_string(),
                "fy must be positive",
            ));
        }
        Ok(())
    }

    /// Uniform stress of the equivalent rectangular block, 0.85 f'c (MPa)
    #[inline]
    pub fn block_stress_mpa(&self, code: &DesignCode) -> f64 {
        code.stress_block_coefficient * self.fc_mpa
    }

    /// Steel yield strain εy
    #[inline]
    pub fn yield_strain(&self, code: &DesignCode) -> f64 {
        code.yield_strain(self.fy_mpa)
    }

    /// β1 for this concrete
    #[inline]
    pub fn beta1(&self, code: &DesignCode) -> f64 {
        code.beta1(self.fc_mpa)
    }

    /// Reinforcement ratio limits for this material pair
    pub fn ratio_limits(&self, code: &DesignCode) -> RatioLimits {
        RatioLimits {
            rho_min: code.rho_min(self.fc_mpa, self.fy_mpa),
            rho_max: code.rho_max(self.fc_mpa, self.fy_mpa),
            rho_balanced: code.rho_balanced(self.fc_mpa, self.fy_mpa),
        }
    }
}

/// Code reinforcement ratio limits (ρ = As / bd)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioLimits {
    /// Minimum ratio
    pub rho_min: f64,
    /// Maximum ratio for a tension-controlled section
    pub rho_max: f64,
    /// Balanced ratio
    pub rho_balanced: f64,
}
