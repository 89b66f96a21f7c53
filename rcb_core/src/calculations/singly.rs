//! # Singly Reinforced Rectangular Beam
//!
//! Closed-form flexural design and analysis of a rectangular section with one
//! layer of tension steel, using the equivalent rectangular stress block.
//!
//! ## Assumptions
//!
//! - Tension steel yields at nominal strength (checked through εt)
//! - Plane sections remain plane; concrete tensile strength ignored
//! - Design assumes φ = 0.90 and is bounded by ρmax, so it stays
//!   tension-controlled
//!
//! ## Example
//!
//! ```rust
//! use rcb_core::calculations::rectangular::RectangularSection;
//! use rcb_core::calculations::singly;
//! use rcb_core::design_code::DesignCode;
//! use rcb_core::materials::ConcreteMaterial;
//!
//! let code = DesignCode::nscp_2015();
//! let beam = RectangularSection::new(300.0, 500.0, 65.0, ConcreteMaterial::new(28.0, 415.0));
//!
//! let design = singly::design(&beam, 150.0, &code).unwrap();
//! assert!(design.is_adequate);
//!
//! let check = singly::analyze(&beam, design.as_required_mm2, &code).unwrap();
//! assert!(check.phi_mn_knm >= 150.0 * 0.999);
//! ```

use serde::{Deserialize, Serialize};

use super::rectangular::RectangularSection;
use crate::design_code::{nscp_ref, DesignCode};
use crate::equations::flexure::{
    flexural_resistance_coefficient, required_ratio, singly_nominal_moment, stress_block_depth,
    tensile_strain,
};
use crate::errors::{CalcError, CalcResult};
use crate::units::{knm_to_nmm, nmm_to_knm};

/// Relative shortfall of φMn below Mu still reported as adequate
/// (absorbs round-off when the quadratic is solved exactly).
pub(crate) const ADEQUACY_TOLERANCE: f64 = 1.0e-6;

/// Capacity of the section at the tension-controlled reinforcement limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TensionControlledLimit {
    /// As at ρmax (mm²)
    pub as_max_mm2: f64,
    /// Stress-block depth at ρmax (mm)
    pub a_max_mm: f64,
    /// Neutral-axis depth at ρmax (mm)
    pub c_max_mm: f64,
    /// φMn at ρmax with φ = 0.90 (kN·m)
    pub phi_mn_max_knm: f64,
}

/// Maximum tension-controlled capacity of a singly reinforced rectangle.
pub fn tension_controlled_limit(section: &RectangularSection, code: &DesignCode) -> TensionControlledLimit {
    let mat = &section.material;
    let b = section.width_mm;
    let d = section.effective_depth_mm();
    let block = mat.block_stress_mpa(code);

    let as_max = code.rho_max(mat.fc_mpa, mat.fy_mpa) * b * d;
    let a_max = stress_block_depth(as_max, mat.fy_mpa, block, b);
    let c_max = a_max / mat.beta1(code);
    let phi_mn_max = code.phi_tension * block * b * a_max * (d - a_max / 2.0);

    TensionControlledLimit {
        as_max_mm2: as_max,
        a_max_mm: a_max,
        c_max_mm: c_max,
        phi_mn_max_knm: nmm_to_knm(phi_mn_max),
    }
}

/// Results of singly reinforced design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "mu_knm": 150.0,
///   "as_required_mm2": 988.6,
///   "as_min_mm2": 440.2,
///   "as_max_mm2": 2385.5,
///   "rho_required": 0.007576,
///   "phi": 0.9,
///   "phi_mn_knm": 150.0,
///   "is_adequate": true,
///   "message": "Design OK - Section is tension-controlled"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglyDesignResult {
    /// Factored moment demand (kN·m)
    pub mu_knm: f64,

    // === Reinforcement ===
    /// Required tension steel area (mm²), never below As,min
    pub as_required_mm2: f64,
    /// Minimum steel area ρmin·b·d (mm²)
    pub as_min_mm2: f64,
    /// Maximum tension-controlled steel area ρmax·b·d (mm²)
    pub as_max_mm2: f64,

    // === Ratios ===
    /// Ratio from the flexure quadratic, before the minimum clamp
    pub rho_required: f64,
    pub rho_min: f64,
    pub rho_max: f64,
    pub rho_balanced: f64,

    // === Section at nominal strength ===
    /// Stress-block depth a (mm)
    pub a_mm: f64,
    /// Neutral-axis depth c (mm)
    pub c_mm: f64,
    /// Net tensile strain εt
    pub epsilon_t: f64,
    /// Strength reduction factor from εt
    pub phi: f64,

    // === Capacity ===
    /// Design strength with the required steel (kN·m)
    pub phi_mn_knm: f64,
    /// Maximum tension-controlled design strength (kN·m)
    pub phi_mn_max_knm: f64,

    // === Status ===
    pub is_tension_controlled: bool,
    /// φMn ≥ Mu. False means compression steel or a larger section is needed.
    pub is_adequate: bool,
    pub message: String,
}

/// Results of singly reinforced analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglyAnalysisResult {
    /// Provided tension steel (mm²)
    pub as_mm2: f64,

    /// Stress-block depth a (mm)
    pub a_mm: f64,
    /// Neutral-axis depth c (mm)
    pub c_mm: f64,
    /// Stress-block factor β1
    pub beta1: f64,
    /// Net tensile strain εt
    pub epsilon_t: f64,
    /// Strength reduction factor
    pub phi: f64,

    /// Provided ratio As / bd
    pub rho: f64,
    pub rho_min: f64,
    pub rho_max: f64,
    pub rho_balanced: f64,

    /// Nominal moment Mn (kN·m)
    pub mn_knm: f64,
    /// Design moment φMn (kN·m)
    pub phi_mn_knm: f64,

    pub is_tension_controlled: bool,
    pub meets_min_reinf: bool,
    pub meets_max_reinf: bool,
    /// Classification plus advisory warnings
    pub message: String,
}

impl SinglyAnalysisResult {
    /// Check that the section can carry a factored moment
    pub fn resists(&self, mu_knm: f64) -> bool {
        self.phi_mn_knm >= mu_knm
    }
}

pub(crate) fn validate_moment(mu_knm: f64) -> CalcResult<()> {
    if !mu_knm.is_finite() || mu_knm < 0.0 {
        return Err(CalcError::invalid_input(
            "mu_knm",
            mu_knm.to_string(),
            "Factored moment must be a non-negative number",
        ));
    }
    Ok(())
}

/// Size tension steel for a factored moment.
///
/// # Arguments
///
/// * `section` - Beam geometry and materials
/// * `mu_knm` - Factored moment Mu (kN·m)
/// * `code` - Design code coefficients
///
/// # Returns
///
/// * `Ok(SinglyDesignResult)` - Possibly with `is_adequate = false` when Mu
///   exceeds the tension-controlled maximum
/// * `Err(CalcError)` - If inputs are invalid
pub fn design(section: &RectangularSection, mu_knm: f64, code: &DesignCode) -> CalcResult<SinglyDesignResult> {
    section.validate()?;
    validate_moment(mu_knm)?;

    let mat = &section.material;
    let b = section.width_mm;
    let d = section.effective_depth_mm();
    let block = mat.block_stress_mpa(code);
    let limits = mat.ratio_limits(code);
    let limit = tension_controlled_limit(section, code);

    let mut result = SinglyDesignResult {
        mu_knm,
        as_required_mm2: 0.0,
        as_min_mm2: limits.rho_min * b * d,
        as_max_mm2: limit.as_max_mm2,
        rho_required: 0.0,
        rho_min: limits.rho_min,
        rho_max: limits.rho_max,
        rho_balanced: limits.rho_balanced,
        a_mm: 0.0,
        c_mm: 0.0,
        epsilon_t: 0.0,
        phi: 0.0,
        phi_mn_knm: limit.phi_mn_max_knm,
        phi_mn_max_knm: limit.phi_mn_max_knm,
        is_tension_controlled: false,
        is_adequate: false,
        message: String::new(),
    };

    if mu_knm > limit.phi_mn_max_knm {
        result.message = format!(
            "Section inadequate for singly reinforced design. Mu={:.2} kN-m > φMn,max={:.2} kN-m. \
             Consider increasing section size or using doubly reinforced design.",
            mu_knm, limit.phi_mn_max_knm
        );
        tracing::warn!(mu_knm, phi_mn_max_knm = limit.phi_mn_max_knm, "singly design inadequate");
        return Ok(result);
    }

    let rn = flexural_resistance_coefficient(knm_to_nmm(mu_knm), code.phi_tension, b, d);
    let Some(rho_required) = required_ratio(rn, block, mat.fy_mpa) else {
        result.message = "Section inadequate - moment too high for singly reinforced design".to_string();
        return Ok(result);
    };
    result.rho_required = rho_required;

    let min_governs = rho_required < limits.rho_min;
    let rho = rho_required.max(limits.rho_min);
    result.as_required_mm2 = rho * b * d;

    // Verify with the actual steel; φ may differ from the assumed 0.90
    result.a_mm = stress_block_depth(result.as_required_mm2, mat.fy_mpa, block, b);
    result.c_mm = result.a_mm / mat.beta1(code);
    result.epsilon_t = tensile_strain(code.epsilon_cu, result.c_mm, d);
    result.phi = code.phi(result.epsilon_t, mat.fy_mpa);
    result.is_tension_controlled = code.is_tension_controlled(result.epsilon_t);
    result.phi_mn_knm =
        result.phi * nmm_to_knm(singly_nominal_moment(result.as_required_mm2, mat.fy_mpa, d, result.a_mm));
    result.is_adequate = result.phi_mn_knm >= mu_knm * (1.0 - ADEQUACY_TOLERANCE);

    result.message = if !result.is_adequate {
        "Design inadequate - steel at this ratio falls in the transition zone".to_string()
    } else if result.is_tension_controlled {
        "Design OK - Section is tension-controlled".to_string()
    } else {
        "Design OK - Section is in transition zone".to_string()
    };
    if min_governs {
        result.message.push_str(" | Minimum reinforcement governs");
    }

    Ok(result)
}

/// Compute the design strength of a given tension steel area.
///
/// # Arguments
///
/// * `section` - Beam geometry and materials
/// * `as_mm2` - Provided tension steel area (mm²), must be positive
/// * `code` - Design code coefficients
pub fn analyze(section: &RectangularSection, as_mm2: f64, code: &DesignCode) -> CalcResult<SinglyAnalysisResult> {
    section.validate()?;
    if !(as_mm2 > 0.0) {
        return Err(CalcError::invalid_input(
            "as_mm2",
            as_mm2.to_string(),
            "Tension reinforcement area must be positive",
        ));
    }

    let mat = &section.material;
    let b = section.width_mm;
    let d = section.effective_depth_mm();
    let limits = mat.ratio_limits(code);
    let beta1 = mat.beta1(code);

    let rho = as_mm2 / (b * d);
    let meets_min_reinf = rho >= limits.rho_min;
    let meets_max_reinf = rho <= limits.rho_max;

    // T = C → As·fy = 0.85 f'c b a
    let a = stress_block_depth(as_mm2, mat.fy_mpa, mat.block_stress_mpa(code), b);
    let c = a / beta1;
    let epsilon_t = tensile_strain(code.epsilon_cu, c, d);
    let phi = code.phi(epsilon_t, mat.fy_mpa);

    let mn_knm = nmm_to_knm(singly_nominal_moment(as_mm2, mat.fy_mpa, d, a));

    let mut message = code.classify(epsilon_t, mat.fy_mpa).description().to_string();
    if !meets_min_reinf {
        message.push_str(&format!(" | WARNING: Below minimum reinforcement ({})", nscp_ref::RHO_MIN));
    }
    if !meets_max_reinf {
        message.push_str(&format!(" | WARNING: Exceeds tension-controlled maximum ({})", nscp_ref::PHI));
    }

    Ok(SinglyAnalysisResult {
        as_mm2,
        a_mm: a,
        c_mm: c,
        beta1,
        epsilon_t,
        phi,
        rho,
        rho_min: limits.rho_min,
        rho_max: limits.rho_max,
        rho_balanced: limits.rho_balanced,
        mn_knm,
        phi_mn_knm: phi * mn_knm,
        is_tension_controlled: code.is_tension_controlled(epsilon_t),
        meets_min_reinf,
        meets_max_reinf,
        message,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::materials::ConcreteMaterial;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn design_then_analyze_resists_demand(fraction in 0.01_f64..0.99_f64) {
            let code = DesignCode::nscp_2015();
            let beam = RectangularSection::new(300.0, 500.0, 65.0, ConcreteMaterial::new(28.0, 415.0));
            let mu = fraction * tension_controlled_limit(&beam, &code).phi_mn_max_knm;

            let design = design(&beam, mu, &code).unwrap();
            if design.is_adequate {
                let check = analyze(&beam, design.as_required_mm2, &code).unwrap();
                prop_assert!(check.phi_mn_knm >= mu * (1.0 - ADEQUACY_TOLERANCE));
            }
        }
    }
}
