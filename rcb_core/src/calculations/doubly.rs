//! # Doubly Reinforced Rectangular Beam
//!
//! Flexural design and analysis of a rectangular section with tension steel
//! `As` and compression steel `A's` at depth `d'`.
//!
//! ## Design
//!
//! When the demand exceeds the singly reinforced tension-controlled maximum,
//! the moment is split in two couples:
//!
//! ```text
//!   Mu1 = φMn,max  ── concrete block + As1 = ρmax·b·d
//!   Mu2 = Mu − Mu1 ── steel couple   As2 · fy · (d − d')
//! ```
//!
//! and `A's` balances `As2` at the compression-steel stress found at
//! `c = c_max`. The section stays at εt = 0.005 by construction.
//!
//! ## Analysis
//!
//! The compression-steel stress (and whether it displaces block concrete)
//! depends on the unknown `c`, so `c` is found by damped fixed-point
//! iteration on `T = Cc + Cs`, starting from the both-steels-yield guess.
//! The imbalance falls as `c` grows, so the trials bracket the root and a
//! step that leaves the bracket or stalls is replaced by bisection. A depth
//! is accepted only when both the step and the force imbalance are within
//! tolerance.

use serde::{Deserialize, Serialize};

use super::rectangular::RectangularSection;
use super::singly::{self, tension_controlled_limit};
use crate::design_code::{nscp_ref, DesignCode};
use crate::equations::flexure::{net_compression_stress, steel_stress, strain_at_depth, tensile_strain};
use crate::errors::{CalcError, CalcResult};
use crate::solver::Convergence;
use crate::units::{kn_to_n, knm_to_nmm, n_to_kn, nmm_to_knm};

/// Iteration cap for the equilibrium solve
const MAX_ITERATIONS: usize = 50;
/// Neutral-axis change (mm) below which the solve has converged
const TOLERANCE_MM: f64 = 0.01;
/// Force imbalance |T − Cc − Cs| (kN) the converged depth must also meet
const TOLERANCE_KN: f64 = 0.1;
/// Weight of the new estimate in each damped update
const DAMPING: f64 = 0.5;
/// Smallest neutral-axis depth the solver will visit (mm)
const MIN_NEUTRAL_AXIS_MM: f64 = 1.0;
/// Doubly design accepts φMn within 0.1% of Mu
const DESIGN_ACCEPTANCE: f64 = 0.999;

const SOLVER_NAME: &str = "doubly reinforced equilibrium";

/// Results of doubly reinforced design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoublyDesignResult {
    /// Factored moment demand (kN·m)
    pub mu_knm: f64,

    /// Compression steel is needed (Mu > singly tension-controlled maximum)
    pub requires_comp_steel: bool,

    // === Moment split ===
    /// Moment carried by the concrete couple (kN·m)
    pub mu1_knm: f64,
    /// Moment carried by the steel couple (kN·m)
    pub mu2_knm: f64,

    // === Reinforcement ===
    /// Tension steel balancing the concrete block (mm²)
    pub as1_mm2: f64,
    /// Tension steel balancing the compression steel (mm²)
    pub as2_mm2: f64,
    /// Total tension steel As1 + As2 (mm²)
    pub as_total_mm2: f64,
    /// Required compression steel A's (mm²)
    pub asc_required_mm2: f64,
    pub as_min_mm2: f64,
    pub as_max_mm2: f64,

    pub rho_min: f64,
    pub rho_max: f64,
    pub rho_balanced: f64,

    // === Section at the tension-controlled limit ===
    pub a_max_mm: f64,
    pub c_max_mm: f64,

    /// Compression-steel stress f's (MPa)
    pub fsc_mpa: f64,
    /// Compression steel reaches fy
    pub comp_yielded: bool,

    pub epsilon_t: f64,
    /// Compression-steel strain ε's
    pub epsilon_sc: f64,

    pub phi: f64,
    /// Design strength with the reported steel (kN·m)
    pub phi_mn_knm: f64,

    pub is_tension_controlled: bool,
    pub is_adequate: bool,
    pub message: String,
}

/// Results of doubly reinforced analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoublyAnalysisResult {
    pub as_mm2: f64,
    pub asc_mm2: f64,

    /// Stress-block depth a (mm)
    pub a_mm: f64,
    /// Neutral-axis depth c (mm)
    pub c_mm: f64,
    pub beta1: f64,

    /// Net tensile strain εt
    pub epsilon_t: f64,
    /// Compression-steel strain ε's (negative if the bar ends up in tension)
    pub epsilon_sc: f64,

    /// Tension-steel stress fs (MPa)
    pub fs_mpa: f64,
    /// Compression-steel stress f's (MPa), signed
    pub fsc_mpa: f64,

    pub tension_yielded: bool,
    pub comp_yielded: bool,

    pub rho: f64,
    /// Compression ratio A's / bd
    pub rho_comp: f64,
    pub rho_min: f64,
    pub rho_max: f64,
    pub rho_balanced: f64,

    // === Forces (kN) ===
    /// Concrete block force 0.85 f'c b a
    pub cc_kn: f64,
    /// Compression-steel force net of displaced concrete
    pub cs_kn: f64,
    /// Tension-steel force
    pub t_kn: f64,
    /// T − (Cc + Cs) at the returned neutral axis
    pub equilibrium_residual_kn: f64,

    pub phi: f64,
    pub mn_knm: f64,
    pub phi_mn_knm: f64,

    pub is_tension_controlled: bool,
    pub meets_min_reinf: bool,
    pub convergence: Convergence,
    pub message: String,
}

/// Size tension and compression steel for a factored moment.
///
/// Falls back to the singly reinforced design when no compression steel is
/// needed.
pub fn design(section: &RectangularSection, mu_knm: f64, code: &DesignCode) -> CalcResult<DoublyDesignResult> {
    section.validate()?;
    let d_prime = section.compression_cover()?;
    singly::validate_moment(mu_knm)?;

    let mat = &section.material;
    let fy = mat.fy_mpa;
    let d = section.effective_depth_mm();
    let limits = mat.ratio_limits(code);
    let limit = tension_controlled_limit(section, code);

    let mut result = DoublyDesignResult {
        mu_knm,
        requires_comp_steel: false,
        mu1_knm: mu_knm,
        mu2_knm: 0.0,
        as1_mm2: 0.0,
        as2_mm2: 0.0,
        as_total_mm2: 0.0,
        asc_required_mm2: 0.0,
        as_min_mm2: limits.rho_min * section.bd_mm2(),
        as_max_mm2: limit.as_max_mm2,
        rho_min: limits.rho_min,
        rho_max: limits.rho_max,
        rho_balanced: limits.rho_balanced,
        a_max_mm: limit.a_max_mm,
        c_max_mm: limit.c_max_mm,
        fsc_mpa: 0.0,
        comp_yielded: false,
        epsilon_t: 0.0,
        epsilon_sc: 0.0,
        phi: 0.0,
        phi_mn_knm: 0.0,
        is_tension_controlled: false,
        is_adequate: false,
        message: String::new(),
    };

    if mu_knm <= limit.phi_mn_max_knm {
        let single = singly::design(section, mu_knm, code)?;
        result.as1_mm2 = single.as_required_mm2;
        result.as_total_mm2 = single.as_required_mm2;
        result.epsilon_t = single.epsilon_t;
        result.phi = single.phi;
        result.phi_mn_knm = single.phi_mn_knm;
        result.is_tension_controlled = single.is_tension_controlled;
        result.is_adequate = single.is_adequate;
        result.message = if single.is_adequate {
            "Singly reinforced design is adequate".to_string()
        } else {
            single.message
        };
        return Ok(result);
    }

    result.requires_comp_steel = true;
    result.mu1_knm = limit.phi_mn_max_knm;
    result.mu2_knm = mu_knm - limit.phi_mn_max_knm;
    result.as1_mm2 = limit.as_max_mm2;

    result.epsilon_sc = strain_at_depth(code.epsilon_cu, limit.c_max_mm, d_prime);
    if result.epsilon_sc <= 0.0 {
        result.message = format!(
            "Design inadequate - compression steel at d'={:.1} mm lies at or below the neutral axis \
             (c={:.1} mm). Increase section depth.",
            d_prime, limit.c_max_mm
        );
        tracing::warn!(d_prime, c_max = limit.c_max_mm, "compression steel ineffective");
        return Ok(result);
    }

    result.comp_yielded = result.epsilon_sc >= mat.yield_strain(code);
    result.fsc_mpa = if result.comp_yielded {
        fy
    } else {
        result.epsilon_sc * code.es_mpa
    };

    // Mu2 = φ As2 fy (d − d')
    let lever_arm = d - d_prime;
    result.as2_mm2 = knm_to_nmm(result.mu2_knm) / (code.phi_tension * fy * lever_arm);
    result.as_total_mm2 = result.as1_mm2 + result.as2_mm2;

    // As2 fy = A's f's
    result.asc_required_mm2 = result.as2_mm2 * fy / result.fsc_mpa;

    result.epsilon_t = code.tension_controlled_strain;
    result.phi = code.phi_tension;
    result.is_tension_controlled = true;

    let mn1 = result.as1_mm2 * fy * (d - limit.a_max_mm / 2.0);
    let mn2 = result.as2_mm2 * fy * lever_arm;
    result.phi_mn_knm = result.phi * nmm_to_knm(mn1 + mn2);
    result.is_adequate = result.phi_mn_knm >= mu_knm * DESIGN_ACCEPTANCE;

    result.message = if !result.is_adequate {
        "Design inadequate - Consider increasing section size".to_string()
    } else if result.comp_yielded {
        "Doubly reinforced design OK - Compression steel yields".to_string()
    } else {
        format!(
            "Doubly reinforced design OK - Compression steel does not yield (f'sc = {:.1} MPa)",
            result.fsc_mpa
        )
    };

    Ok(result)
}

/// Steel state of a doubly reinforced rectangle at a trial neutral axis.
struct SteelState {
    a: f64,
    epsilon_t: f64,
    epsilon_sc: f64,
    fs: f64,
    fsc: f64,
    fsc_net: f64,
}

impl SteelState {
    fn at(c: f64, d: f64, d_prime: f64, beta1: f64, block: f64, fy: f64, code: &DesignCode) -> Self {
        let epsilon_t = tensile_strain(code.epsilon_cu, c, d);
        let epsilon_sc = strain_at_depth(code.epsilon_cu, c, d_prime);

        // Tension steel pushed into compression carries nothing here
        let fs = if epsilon_t < 0.0 {
            0.0
        } else {
            (epsilon_t * code.es_mpa).min(fy)
        };
        let fsc = steel_stress(epsilon_sc, fy, code.es_mpa);
        let a = beta1 * c;

        SteelState {
            a,
            epsilon_t,
            epsilon_sc,
            fs,
            fsc,
            fsc_net: net_compression_stress(fsc, d_prime, a, block),
        }
    }
}

/// Compute the design strength of given tension and compression steel.
///
/// # Arguments
///
/// * `as_mm2` - Tension steel (mm²), positive
/// * `asc_mm2` - Compression steel (mm²), zero or positive
pub fn analyze(
    section: &RectangularSection,
    as_mm2: f64,
    asc_mm2: f64,
    code: &DesignCode,
) -> CalcResult<DoublyAnalysisResult> {
    section.validate()?;
    let d_prime = section.compression_cover()?;
    if !(as_mm2 > 0.0) {
        return Err(CalcError::invalid_input(
            "as_mm2",
            as_mm2.to_string(),
            "Tension reinforcement area must be positive",
        ));
    }
    if !(asc_mm2 >= 0.0) {
        return Err(CalcError::invalid_input(
            "asc_mm2",
            asc_mm2.to_string(),
            "Compression reinforcement area cannot be negative",
        ));
    }

    let mat = &section.material;
    let fy = mat.fy_mpa;
    let b = section.width_mm;
    let d = section.effective_depth_mm();
    let beta1 = mat.beta1(code);
    let block = mat.block_stress_mpa(code);
    let epsilon_y = mat.yield_strain(code);
    let limits = mat.ratio_limits(code);
    let stiffness = block * b * beta1;

    // Seed: both steels yield, compression steel inside the block
    // As fy = 0.85 f'c b β1 c + A's (fy − 0.85 f'c)
    let mut c = ((as_mm2 * fy - asc_mm2 * (fy - block)) / stiffness).max(MIN_NEUTRAL_AXIS_MM);

    // T − Cc − Cs falls as c grows, so every trial narrows a bracket on the root
    let mut lower = 0.0_f64;
    let mut upper = f64::INFINITY;
    let mut last_imbalance = f64::INFINITY;

    let mut convergence = None;
    let mut last_step = f64::INFINITY;
    for iteration in 1..=MAX_ITERATIONS {
        let state = SteelState::at(c, d, d_prime, beta1, block, fy, code);
        let c_new = (as_mm2 * state.fs - asc_mm2 * state.fsc_net) / stiffness;
        let imbalance_n = stiffness * (c_new - c);

        last_step = (c_new - c).abs();
        if last_step < TOLERANCE_MM && imbalance_n.abs() < kn_to_n(TOLERANCE_KN) {
            convergence = Some(Convergence::converged(SOLVER_NAME, iteration, last_step));
            break;
        }

        if imbalance_n > 0.0 {
            lower = lower.max(c);
        } else {
            upper = upper.min(c);
        }

        let mut next = (c + DAMPING * (c_new - c)).max(MIN_NEUTRAL_AXIS_MM);
        // Bisect when the damped step leaves the bracket or stalls
        if upper.is_finite() && (next <= lower || next >= upper || imbalance_n.abs() > 0.5 * last_imbalance) {
            next = 0.5 * (lower + upper);
        }
        last_imbalance = imbalance_n.abs();
        c = next;
    }
    let convergence = convergence
        .unwrap_or_else(|| Convergence::capped(SOLVER_NAME, MAX_ITERATIONS, last_step))
        .traced();

    let state = SteelState::at(c, d, d_prime, beta1, block, fy, code);

    let cc_n = block * b * state.a;
    let cs_n = asc_mm2 * state.fsc_net;
    let t_n = as_mm2 * state.fs;

    // Moments about the tension steel
    let mn_nmm = cc_n * (d - state.a / 2.0) + cs_n * (d - d_prime);
    let mn_knm = nmm_to_knm(mn_nmm);
    let phi = code.phi(state.epsilon_t, fy);

    let rho = as_mm2 / section.bd_mm2();
    let meets_min_reinf = rho >= limits.rho_min;

    let mut message = code.classify(state.epsilon_t, fy).description().to_string();
    if !meets_min_reinf {
        message.push_str(&format!(" | WARNING: Below minimum reinforcement ({})", nscp_ref::RHO_MIN));
    }
    message.push_str(&convergence.warning());

    Ok(DoublyAnalysisResult {
        as_mm2,
        asc_mm2,
        a_mm: state.a,
        c_mm: c,
        beta1,
        epsilon_t: state.epsilon_t,
        epsilon_sc: state.epsilon_sc,
        fs_mpa: state.fs,
        fsc_mpa: state.fsc,
        tension_yielded: state.epsilon_t >= epsilon_y,
        comp_yielded: state.epsilon_sc >= epsilon_y,
        rho,
        rho_comp: asc_mm2 / section.bd_mm2(),
        rho_min: limits.rho_min,
        rho_max: limits.rho_max,
        rho_balanced: limits.rho_balanced,
        cc_kn: n_to_kn(cc_n),
        cs_kn: n_to_kn(cs_n),
        t_kn: n_to_kn(t_n),
        equilibrium_residual_kn: n_to_kn(t_n - cc_n - cs_n),
        phi,
        mn_knm,
        phi_mn_knm: phi * mn_knm,
        is_tension_controlled: code.is_tension_controlled(state.epsilon_t),
        meets_min_reinf,
        convergence,
        message,
    })
}
