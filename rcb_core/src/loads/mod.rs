//! Load combinations per NSCP 2015 Section 203.3
//!
//! Turns unfactored beam moments into the factored design moment `Mu` used by
//! the flexure calculations.
//!
//! # Overview
//!
//! - [`LoadType`] - Load categories of the strength-design combinations
//! - [`LoadMoments`] - Unfactored moments by load type (kN·m)
//! - [`LoadCombination`] - Factors for one combination
//! - [`calculate`] - Governing factored moment for a request
//!
//! # Example
//!
//! ```
//! use rcb_core::loads::{calculate, CombinationSet, FactoredMomentInput, LoadMoments};
//!
//! let input = FactoredMomentInput {
//!     label: "B-1 midspan".to_string(),
//!     moments: LoadMoments { dead: 80.0, live: 45.0, ..Default::default() },
//!     combinations: CombinationSet::Nscp,
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.governing_id, "2");
//! assert!((result.mu_knm - 168.0).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::{find_governing_combination, nscp_combinations, simplified_combinations, LoadCombination};
pub use load_types::{LoadMoments, LoadType};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which combination set to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinationSet {
    /// All seven basic combinations
    #[default]
    Nscp,
    /// 1.4D and 1.2D + 1.6L only
    Simplified,
}

impl CombinationSet {
    pub fn combinations(&self) -> Vec<LoadCombination> {
        match self {
            CombinationSet::Nscp => nscp_combinations(),
            CombinationSet::Simplified => simplified_combinations(),
        }
    }
}

/// Input for the factored-moment calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoredMomentInput {
    #[serde(default)]
    pub label: String,

    /// Unfactored moments (kN·m)
    pub moments: LoadMoments,

    #[serde(default)]
    pub combinations: CombinationSet,
}

/// One combination's factored moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationMoment {
    pub id: String,
    pub equation: String,
    pub moment_knm: f64,
}

/// Governing factored moment and the full table it was picked from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoredMomentResult {
    /// Governing factored moment Mu (kN·m)
    pub mu_knm: f64,
    pub governing_id: String,
    pub governing_equation: String,
    pub combinations: Vec<CombinationMoment>,
}

/// Find the governing factored moment.
///
/// Fails when no combination produces a positive moment, since there is
/// nothing to design for.
pub fn calculate(input: &FactoredMomentInput) -> CalcResult<FactoredMomentResult> {
    let combos = input.combinations.combinations();
    let (mu_knm, governing) = find_governing_combination(&input.moments, &combos).ok_or_else(|| {
        CalcError::calculation_failed("FactoredMoment", "no load combination produces a positive moment")
    })?;

    Ok(FactoredMomentResult {
        mu_knm,
        governing_id: governing.id,
        governing_equation: governing.equation,
        combinations: combos
            .iter()
            .map(|c| CombinationMoment {
                id: c.id.clone(),
                equation: c.equation.clone(),
                moment_knm: c.apply(&input.moments),
            })
            .collect(),
    })
}
