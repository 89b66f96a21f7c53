//! # Polygonal Section Analysis
//!
//! Finds the neutral axis of a [`PolygonSection`] by force equilibrium and
//! computes its moment capacity.
//!
//! Each trial `c` gives a stress-block depth `a = β1 c`, a concrete force
//! from the integrated block area, and a strain, stress and force in every
//! layer. The trial is moved by the force imbalance divided by the block
//! stiffness at `c` (`0.85 f'c · b(c)`), step-limited and damped, until
//! `|T − (Cc + Cs)| < 0.1 kN`.

use serde::{Deserialize, Serialize};

use super::{PolygonSection, SectionProperties};
use crate::design_code::DesignCode;
use crate::equations::flexure::{net_compression_stress, steel_stress, strain_at_depth};
use crate::errors::{CalcError, CalcResult};
use crate::solver::Convergence;
use crate::units::{kn_to_n, n_to_kn, nmm_to_knm};

/// Iteration cap for the neutral-axis solve
const MAX_ITERATIONS: usize = 100;
/// Force imbalance (kN) below which the solve has converged
const TOLERANCE_KN: f64 = 0.1;
/// Fraction of the computed correction applied per iteration
const DAMPING: f64 = 0.5;
/// Largest correction (mm) considered per iteration, before damping
const MAX_STEP_MM: f64 = 10.0;
/// The trial neutral axis stays this far inside the section (mm)
const EDGE_MARGIN_MM: f64 = 1.0;
/// Initial neutral-axis guess as a fraction of d
const INITIAL_C_RATIO: f64 = 0.3;

const SOLVER_NAME: &str = "section equilibrium";

/// State of one reinforcement layer at the solved neutral axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelLayerResult {
    /// Height above the section bottom (mm)
    pub y_mm: f64,
    /// Depth below the top fibre (mm)
    pub depth_mm: f64,
    pub area_mm2: f64,
    /// Strain, compression positive
    pub strain: f64,
    /// Stress capped at ±fy (MPa), compression positive
    pub stress_mpa: f64,
    /// Bar force A·fs (kN)
    pub force_kn: f64,
    /// Bar force less displaced block concrete (kN)
    pub net_force_kn: f64,
    pub is_tension: bool,
    pub has_yielded: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Results of polygonal section analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysisResult {
    pub properties: SectionProperties,

    /// Neutral-axis depth below the top fibre (mm)
    pub c_mm: f64,
    /// Stress-block depth (mm)
    pub a_mm: f64,
    pub beta1: f64,

    /// Concrete area inside the stress block (mm²)
    pub compression_area_mm2: f64,
    /// Top fibre to the block centroid (mm)
    pub compression_centroid_mm: f64,

    /// Largest tensile strain among tension layers
    pub epsilon_t: f64,

    // === Forces (kN) ===
    pub cc_kn: f64,
    pub cs_kn: f64,
    pub t_kn: f64,
    /// T − (Cc + Cs) at the returned neutral axis
    pub equilibrium_residual_kn: f64,

    pub steel_layers: Vec<SteelLayerResult>,

    pub phi: f64,
    pub mn_knm: f64,
    pub phi_mn_knm: f64,

    pub is_tension_controlled: bool,
    pub convergence: Convergence,
    pub message: String,
}

/// Internal forces at a trial neutral axis.
struct TrialState {
    c: f64,
    a: f64,
    compression_area: f64,
    cc_n: f64,
    cs_n: f64,
    t_n: f64,
    layers: Vec<SteelLayerResult>,
}

impl TrialState {
    fn imbalance_kn(&self) -> f64 {
        n_to_kn(self.t_n - self.cc_n - self.cs_n)
    }
}

fn evaluate(
    section: &PolygonSection,
    props: &SectionProperties,
    c: f64,
    beta1: f64,
    block: f64,
    code: &DesignCode,
) -> TrialState {
    let fy = section.fy;
    let epsilon_y = code.yield_strain(fy);
    let a = beta1 * c;
    let compression_area = section.compression_block_area(a);

    let mut cs_n = 0.0;
    let mut t_n = 0.0;
    let layers = section
        .reinforcement
        .iter()
        .map(|layer| {
            let depth = props.depth_of(layer.y);
            let strain = strain_at_depth(code.epsilon_cu, c, depth);
            let stress = steel_stress(strain, fy, code.es_mpa);
            let force = layer.area * stress;

            let is_tension = strain < 0.0;
            let net_force = if is_tension {
                t_n += force.abs();
                force
            } else {
                let net = layer.area * net_compression_stress(stress, depth, a, block);
                cs_n += net;
                net
            };

            SteelLayerResult {
                y_mm: layer.y,
                depth_mm: depth,
                area_mm2: layer.area,
                strain,
                stress_mpa: stress,
                force_kn: n_to_kn(force),
                net_force_kn: n_to_kn(net_force),
                is_tension,
                has_yielded: strain.abs() >= epsilon_y,
                description: layer.description.clone(),
            }
        })
        .collect();

    TrialState {
        c,
        a,
        compression_area,
        cc_n: block * compression_area,
        cs_n,
        t_n,
        layers,
    }
}

/// Solve the neutral axis and compute the moment capacity.
///
/// # Example
///
/// ```rust
/// use rcb_core::calculations::section::{analyze, PolygonSection, RebarLayer};
/// use rcb_core::design_code::DesignCode;
///
/// let beam = PolygonSection::rectangle("B-1", 300.0, 500.0, 28.0, 415.0)
///     .with_layer(RebarLayer::new(65.0, 1000.0));
/// let result = analyze(&beam, &DesignCode::nscp_2015()).unwrap();
///
/// assert!(result.convergence.converged);
/// assert!((result.phi_mn_knm - 151.6).abs() < 1.5);
/// ```
pub fn analyze(section: &PolygonSection, code: &DesignCode) -> CalcResult<SectionAnalysisResult> {
    section.validate()?;
    let props = section.calculate_properties();
    let d = props.effective_depth_mm;
    if !(d > 0.0) {
        return Err(CalcError::invalid_input(
            "effective_depth",
            d.to_string(),
            "effective depth must be positive; provide tension steel or an override",
        ));
    }

    let fy = section.fy;
    let beta1 = code.beta1(section.fc);
    let block = section.material().block_stress_mpa(code);
    let c_max = props.height_mm - EDGE_MARGIN_MM;

    let mut c = INITIAL_C_RATIO * d;
    let mut solved = None;
    for iteration in 1..=MAX_ITERATIONS {
        let state = evaluate(section, &props, c, beta1, block, code);
        let imbalance = state.imbalance_kn();
        if imbalance.abs() < TOLERANCE_KN {
            solved = Some((state, Convergence::converged(SOLVER_NAME, iteration, imbalance.abs())));
            break;
        }

        // T > C needs a deeper block
        let stiffness = n_to_kn(block * section.width_at_depth(c));
        let step = (imbalance / stiffness).clamp(-MAX_STEP_MM, MAX_STEP_MM);
        c = (c + DAMPING * step).max(EDGE_MARGIN_MM).min(c_max);
    }
    let (state, convergence) = match solved {
        Some(found) => found,
        None => {
            let state = evaluate(section, &props, c, beta1, block, code);
            let residual = state.imbalance_kn().abs();
            (state, Convergence::capped(SOLVER_NAME, MAX_ITERATIONS, residual))
        }
    };
    let convergence = convergence.traced();

    let epsilon_t = state
        .layers
        .iter()
        .filter(|l| l.is_tension)
        .map(|l| l.strain.abs())
        .fold(0.0, f64::max);

    // Moments about the effective depth, compression positive
    let centroid = section.compression_block_centroid(state.a);
    let mn_nmm = state.cc_n * (d - centroid)
        + state
            .layers
            .iter()
            .map(|l| kn_to_n(l.net_force_kn) * (d - l.depth_mm))
            .sum::<f64>();
    let mn_knm = nmm_to_knm(mn_nmm);

    let phi = code.phi(epsilon_t, fy);
    let mut message = code.classify(epsilon_t, fy).description().to_string();
    message.push_str(&convergence.warning());

    Ok(SectionAnalysisResult {
        c_mm: state.c,
        a_mm: state.a,
        beta1,
        compression_area_mm2: state.compression_area,
        compression_centroid_mm: centroid,
        epsilon_t,
        cc_kn: n_to_kn(state.cc_n),
        cs_kn: n_to_kn(state.cs_n),
        t_kn: n_to_kn(state.t_n),
        equilibrium_residual_kn: state.imbalance_kn(),
        steel_layers: state.layers,
        phi,
        mn_knm,
        phi_mn_knm: phi * mn_knm,
        is_tension_controlled: code.is_tension_controlled(epsilon_t),
        convergence,
        message,
        properties: props,
    })
}
