//! # Design Code Coefficients
//!
//! Code-mandated coefficients for flexural strength design of reinforced
//! concrete, per NSCP 2015 (ACI 318-14 based).
//!
//! ## Overview
//!
//! All coefficients are pure functions of the material strengths `f'c`, `fy`
//! or of the net tensile strain at ultimate. They live on a [`DesignCode`]
//! value that is passed into every analysis and design call, so an alternate
//! code edition is a different `DesignCode`, not a change to the solvers.
//!
//! | Coefficient | Description                          | NSCP 2015 value          |
//! |-------------|--------------------------------------|--------------------------|
//! | εcu         | Ultimate concrete strain             | 0.003                    |
//! | Es          | Steel modulus                        | 200 000 MPa              |
//! | β1          | Stress-block depth factor            | 0.65 – 0.85              |
//! | φ           | Strength reduction (flexure)         | 0.65 – 0.90              |
//! | ρmin        | Minimum reinforcement ratio          | max(√f'c/4fy, 1.4/fy)    |
//! | ρmax        | Ratio at εt = 0.005                  | strain compatibility     |
//! | ρb          | Balanced ratio (εt = εy)             | strain compatibility     |
//!
//! ## Example
//!
//! ```rust
//! use rcb_core::design_code::DesignCode;
//!
//! let code = DesignCode::nscp_2015();
//! assert_eq!(code.beta1(28.0), 0.85);
//! assert!((code.beta1(42.0) - 0.75).abs() < 1e-12);
//! assert_eq!(code.phi(0.010, 415.0), 0.90);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// NSCP 2015 section references cited in status messages.
pub mod nscp_ref {
    /// Strength reduction factor by net tensile strain
    pub const PHI: &str = "NSCP 421.2.2";
    /// Minimum flexural reinforcement
    pub const RHO_MIN: &str = "NSCP 409.6.1.2";
    /// Strength design load combinations
    pub const LOAD_COMBINATIONS: &str = "NSCP 203.3.1";
}

/// Code coefficients for flexural strength design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "NSCP 2015",
///   "epsilon_cu": 0.003,
///   "es_mpa": 200000.0,
///   "stress_block_coefficient": 0.85,
///   "beta1_max": 0.85,
///   "beta1_min": 0.65,
///   "beta1_threshold_mpa": 28.0,
///   "beta1_decrement": 0.05,
///   "beta1_interval_mpa": 7.0,
///   "phi_tension": 0.9,
///   "phi_compression": 0.65,
///   "phi_transition_strain": 0.003,
///   "tension_controlled_strain": 0.005,
///   "rho_min_sqrt_divisor": 4.0,
///   "rho_min_numerator": 1.4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCode {
    /// Display name of the code edition
    pub name: String,

    /// Ultimate concrete compressive strain εcu
    pub epsilon_cu: f64,

    /// Steel modulus of elasticity Es (MPa)
    pub es_mpa: f64,

    /// Intensity of the equivalent stress block as a multiple of f'c (0.85)
    pub stress_block_coefficient: f64,

    /// β1 for f'c at or below the threshold
    pub beta1_max: f64,

    /// Lower bound on β1
    pub beta1_min: f64,

    /// f'c above which β1 starts to decrease (MPa)
    pub beta1_threshold_mpa: f64,

    /// β1 reduction per interval of f'c above the threshold
    pub beta1_decrement: f64,

    /// f'c interval for each β1 decrement (MPa)
    pub beta1_interval_mpa: f64,

    /// φ for tension-controlled sections
    pub phi_tension: f64,

    /// φ for compression-controlled sections (tied)
    pub phi_compression: f64,

    /// Strain span above εy over which φ transitions
    pub phi_transition_strain: f64,

    /// Net tensile strain defining a tension-controlled section
    pub tension_controlled_strain: f64,

    /// ρmin term √f'c / (divisor · fy)
    pub rho_min_sqrt_divisor: f64,

    /// ρmin term numerator / fy
    pub rho_min_numerator: f64,
}

impl Default for DesignCode {
    fn default() -> Self {
        Self::nscp_2015()
    }
}

/// Strain classification of a section at nominal strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrainClassification {
    /// εt ≥ tension-controlled limit
    TensionControlled,
    /// εy < εt < tension-controlled limit
    Transition,
    /// εt ≤ εy
    CompressionControlled,
}

impl StrainClassification {
    /// Status text used in result messages
    pub fn description(&self) -> &'static str {
        match self {
            StrainClassification::TensionControlled => "Section is tension-controlled (εt ≥ 0.005)",
            StrainClassification::Transition => "Section is in transition zone",
            StrainClassification::CompressionControlled => "Section is compression-controlled (εt < εy)",
        }
    }
}

impl DesignCode {
    /// NSCP 2015 coefficients
    pub fn nscp_2015() -> Self {
        DesignCode {
            name: "NSCP 2015".to_string(),
            epsilon_cu: 0.003,
            es_mpa: 200_000.0,
            stress_block_coefficient: 0.85,
            beta1_max: 0.85,
            beta1_min: 0.65,
            beta1_threshold_mpa: 28.0,
            beta1_decrement: 0.05,
            beta1_interval_mpa: 7.0,
            phi_tension: 0.90,
            phi_compression: 0.65,
            phi_transition_strain: 0.003,
            tension_controlled_strain: 0.005,
            rho_min_sqrt_divisor: 4.0,
            rho_min_numerator: 1.4,
        }
    }

    /// Check that a loaded code override is physically meaningful.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("epsilon_cu", self.epsilon_cu),
            ("es_mpa", self.es_mpa),
            ("stress_block_coefficient", self.stress_block_coefficient),
            ("beta1_min", self.beta1_min),
            ("beta1_interval_mpa", self.beta1_interval_mpa),
            ("phi_compression", self.phi_compression),
            ("phi_transition_strain", self.phi_transition_strain),
            ("tension_controlled_strain", self.tension_controlled_strain),
            ("rho_min_sqrt_divisor", self.rho_min_sqrt_divisor),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "must be positive"));
            }
        }
        if self.beta1_min > self.beta1_max {
            return Err(CalcError::invalid_input(
                "beta1_min",
                self.beta1_min.to_string(),
                "must not exceed beta1_max",
            ));
        }
        if !(self.phi_compression <= self.phi_tension && self.phi_tension <= 1.0) {
            return Err(CalcError::invalid_input(
                "phi_tension",
                self.phi_tension.to_string(),
                "must lie between phi_compression and 1.0",
            ));
        }
        Ok(())
    }

    /// Stress-block depth factor β1.
    ///
    /// 0.85 for f'c ≤ 28 MPa, reduced by 0.05 per 7 MPa above that,
    /// never below 0.65.
    pub fn beta1(&self, fc_mpa: f64) -> f64 {
        if fc_mpa <= self.beta1_threshold_mpa {
            return self.beta1_max;
        }
        let beta1 = self.beta1_max
            - self.beta1_decrement * (fc_mpa - self.beta1_threshold_mpa) / self.beta1_interval_mpa;
        beta1.max(self.beta1_min)
    }

    /// Steel yield strain εy = fy / Es
    #[inline]
    pub fn yield_strain(&self, fy_mpa: f64) -> f64 {
        fy_mpa / self.es_mpa
    }

    /// Strength reduction factor φ from the net tensile strain.
    ///
    /// 0.65 at or below εy, 0.90 at or above εy + 0.003, linear between.
    pub fn phi(&self, epsilon_t: f64, fy_mpa: f64) -> f64 {
        let epsilon_y = self.yield_strain(fy_mpa);

        if epsilon_t >= epsilon_y + self.phi_transition_strain {
            self.phi_tension
        } else if epsilon_t <= epsilon_y {
            self.phi_compression
        } else {
            self.phi_compression
                + (self.phi_tension - self.phi_compression) * (epsilon_t - epsilon_y)
                    / self.phi_transition_strain
        }
    }

    /// Classify a section by its net tensile strain
    pub fn classify(&self, epsilon_t: f64, fy_mpa: f64) -> StrainClassification {
        if self.is_tension_controlled(epsilon_t) {
            StrainClassification::TensionControlled
        } else if epsilon_t >= self.yield_strain(fy_mpa) {
            StrainClassification::Transition
        } else {
            StrainClassification::CompressionControlled
        }
    }

    /// εt at or beyond the tension-controlled limit
    #[inline]
    pub fn is_tension_controlled(&self, epsilon_t: f64) -> bool {
        epsilon_t >= self.tension_controlled_strain
    }

    /// Minimum reinforcement ratio ρmin = max(√f'c / 4fy, 1.4 / fy)
    pub fn rho_min(&self, fc_mpa: f64, fy_mpa: f64) -> f64 {
        let rho1 = fc_mpa.sqrt() / (self.rho_min_sqrt_divisor * fy_mpa);
        let rho2 = self.rho_min_numerator / fy_mpa;
        rho1.max(rho2)
    }

    /// Maximum reinforcement ratio for a tension-controlled section.
    ///
    /// Strain compatibility at εt = 0.005:
    /// ρmax = 0.85 β1 (f'c/fy) · εcu / (εcu + 0.005)
    pub fn rho_max(&self, fc_mpa: f64, fy_mpa: f64) -> f64 {
        self.rho_at_strain(fc_mpa, fy_mpa, self.tension_controlled_strain)
    }

    /// Balanced reinforcement ratio (εt = εy when concrete reaches εcu)
    pub fn rho_balanced(&self, fc_mpa: f64, fy_mpa: f64) -> f64 {
        self.rho_at_strain(fc_mpa, fy_mpa, self.yield_strain(fy_mpa))
    }

    /// Neutral-axis ratio c/d giving tensile strain `epsilon_t` at the steel
    #[inline]
    pub fn neutral_axis_ratio(&self, epsilon_t: f64) -> f64 {
        self.epsilon_cu / (self.epsilon_cu + epsilon_t)
    }

    fn rho_at_strain(&self, fc_mpa: f64, fy_mpa: f64, epsilon_t: f64) -> f64 {
        self.stress_block_coefficient
            * self.beta1(fc_mpa)
            * (fc_mpa / fy_mpa)
            * self.neutral_axis_ratio(epsilon_t)
    }
}
