//! # Flexure Equations
//!
//! Fundamental strength-design relations used by every section type.
//! Keeping them in one place makes each calculation read as a sequence of
//! named formulas that can be checked against the code text.
//!
//! ## Modules
//!
//! - [`flexure`] - Strain compatibility, stress block, flexure quadratic
//!
//! ## Units
//!
//! Lengths in mm, areas in mm², stresses in MPa, forces in N and moments in
//! N·mm. Conversion to kN / kN·m happens in the calculation modules.

pub mod flexure;

pub use flexure::{
    flexural_resistance_coefficient,
    net_compression_stress,
    required_ratio,
    singly_nominal_moment,
    steel_stress,
    strain_at_depth,
    stress_block_depth,
    tensile_strain,
};
