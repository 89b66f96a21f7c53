//! # rcb_core - Reinforced Concrete Beam Flexure Engine
//!
//! `rcb_core` computes the flexural capacity and required reinforcement of
//! reinforced concrete beam sections by strain compatibility and the
//! equivalent rectangular stress block, per NSCP 2015. All inputs and outputs
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a section and return a result
//! - **Configurable**: Code coefficients live on a [`DesignCode`] value
//! - **Honest solvers**: Iterative results carry a convergence record
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use rcb_core::calculations::{singly, RectangularSection};
//! use rcb_core::materials::ConcreteMaterial;
//! use rcb_core::DesignCode;
//!
//! let beam = RectangularSection::new(300.0, 500.0, 65.0, ConcreteMaterial::new(28.0, 415.0));
//! let result = singly::design(&beam, 150.0, &DesignCode::nscp_2015()).unwrap();
//!
//! assert!(result.is_adequate);
//! println!("As = {:.0} mm²", result.as_required_mm2);
//! ```
//!
//! ## Modules
//!
//! - [`design_code`] - Code coefficients (β1, φ, reinforcement ratios)
//! - [`calculations`] - Rectangular and polygonal flexure, request envelope
//! - [`equations`] - Strain compatibility and stress-block formulas
//! - [`loads`] - NSCP load combinations
//! - [`materials`] - Concrete and steel strengths
//! - [`solver`] - Convergence records of the iterative solvers
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON input loading

pub mod calculations;
pub mod design_code;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod solver;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationOutput, CalculationRequest};
pub use design_code::DesignCode;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_design_code, load_request, load_section};
pub use solver::Convergence;
