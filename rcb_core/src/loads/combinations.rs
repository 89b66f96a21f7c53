//! NSCP 2015 Strength-Design Load Combinations
//!
//! Section 203.3.1 basic combinations, applied to unfactored beam moments.
//!
//! ## "Lr or R" terms
//!
//! Where the code reads `0.5(Lr or R)` both factors are carried. Enter only
//! the roof load that applies to the member; the other stays zero.
//!
//! Wind and earthquake reverse, so their sign on input does not matter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::load_types::{LoadMoments, LoadType};

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use rcb_core::loads::{LoadCombination, LoadMoments, LoadType};
///
/// let combo = LoadCombination::new("2", "1.2D + 1.6L")
///     .with_factor(LoadType::Dead, 1.2)
///     .with_factor(LoadType::Live, 1.6);
///
/// let moments = LoadMoments::default()
///     .with(LoadType::Dead, 50.0)
///     .with(LoadType::Live, 25.0);
///
/// assert!((combo.apply(&moments) - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier within its set ("1" .. "7")
    pub id: String,

    /// Human-readable equation (e.g., "1.2D + 1.6L")
    pub equation: String,

    /// Load factors keyed by load type
    pub factors: HashMap<LoadType, f64>,
}

impl LoadCombination {
    /// Create a combination with no factors
    pub fn new(id: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            id: id.into(),
            equation: equation.into(),
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Factored moment for this combination (kN·m)
    ///
    /// Wind and earthquake moments may act in either direction, so they are
    /// taken in the sense that adds to the demand.
    pub fn apply(&self, moments: &LoadMoments) -> f64 {
        LoadType::ALL
            .iter()
            .map(|&load_type| {
                let moment = moments.get(load_type);
                let moment = if load_type.is_directional() { moment.abs() } else { moment };
                self.get_factor(load_type) * moment
            })
            .sum()
    }

    /// Factor for a load type (0.0 if not in the combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// NSCP 2015 Section 203.3.1 basic combinations
///
/// # Example
/// ```
/// use rcb_core::loads::nscp_combinations;
///
/// let combos = nscp_combinations();
/// assert_eq!(combos.len(), 7);
/// assert_eq!(combos[0].equation, "1.4D");
/// ```
pub fn nscp_combinations() -> Vec<LoadCombination> {
    vec![
        LoadCombination::new("1", "1.4D")
            .with_factor(LoadType::Dead, 1.4),

        LoadCombination::new("2", "1.2D + 1.6L + 0.5(Lr or R)")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6)
            .with_factor(LoadType::Roof, 0.5)
            .with_factor(LoadType::Rain, 0.5),

        LoadCombination::new("3", "1.2D + 1.6(Lr or R) + (1.0L or 0.5W)")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Roof, 1.6)
            .with_factor(LoadType::Rain, 1.6)
            .with_factor(LoadType::Wind, 0.5),

        LoadCombination::new("4", "1.2D + 1.0W + 1.0L + 0.5(Lr or R)")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Wind, 1.0)
            .with_factor(LoadType::Roof, 0.5)
            .with_factor(LoadType::Rain, 0.5),

        LoadCombination::new("5", "1.2D + 1.0E + 1.0L")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Earthquake, 1.0),

        LoadCombination::new("6", "0.9D + 1.0W")
            .with_factor(LoadType::Dead, 0.9)
            .with_factor(LoadType::Wind, 1.0),

        LoadCombination::new("7", "0.9D + 1.0E")
            .with_factor(LoadType::Dead, 0.9)
            .with_factor(LoadType::Earthquake, 1.0),
    ]
}

/// Gravity-only subset for ordinary floor beams
pub fn simplified_combinations() -> Vec<LoadCombination> {
    vec![
        LoadCombination::new("1", "1.4D")
            .with_factor(LoadType::Dead, 1.4),

        LoadCombination::new("2", "1.2D + 1.6L")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6),
    ]
}

/// Find the combination producing the largest factored moment
///
/// Returns `None` when no combination gives a positive moment.
///
/// # Example
/// ```
/// use rcb_core::loads::{find_governing_combination, nscp_combinations, LoadMoments, LoadType};
///
/// let moments = LoadMoments::default()
///     .with(LoadType::Dead, 100.0)
///     .with(LoadType::Live, 10.0);
///
/// let (mu, combo) = find_governing_combination(&moments, &nscp_combinations()).unwrap();
/// assert_eq!(combo.id, "1");
/// assert!((mu - 140.0).abs() < 1e-9);
/// ```
pub fn find_governing_combination(
    moments: &LoadMoments,
    combinations: &[LoadCombination],
) -> Option<(f64, LoadCombination)> {
    let mut governing: Option<(f64, &LoadCombination)> = None;
    for combo in combinations {
        let mu = combo.apply(moments);
        let current = governing.map_or(0.0, |(m, _)| m);
        if mu > current {
            governing = Some((mu, combo));
        }
    }
    governing.map(|(mu, combo)| (mu, combo.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moments() -> LoadMoments {
        LoadMoments::default()
            .with(LoadType::Dead, 80.0)
            .with(LoadType::Live, 45.0)
    }

    #[test]
    fn test_factor_sets() {
        let combos = nscp_combinations();
        let c3 = &combos[2];
        assert_eq!(c3.get_factor(LoadType::Dead), 1.2);
        assert_eq!(c3.get_factor(LoadType::Live), 1.0);
        assert_eq!(c3.get_factor(LoadType::Roof), 1.6);
        assert_eq!(c3.get_factor(LoadType::Rain), 1.6);
        assert_eq!(c3.get_factor(LoadType::Wind), 0.5);
        assert_eq!(c3.get_factor(LoadType::Earthquake), 0.0);
    }

    #[test]
    fn test_gravity_governs() {
        // 1.4D = 112, 1.2D + 1.6L = 168
        let (mu, combo) = find_governing_combination(&moments(), &nscp_combinations()).unwrap();
        assert_eq!(combo.id, "2");
        assert!((mu - 168.0).abs() < 1e-9);
    }

    #[test]
    fn test_earthquake_governs() {
        let m = moments().with(LoadType::Earthquake, 120.0);
        // 1.2D + 1.0E + 1.0L = 96 + 120 + 45 = 261
        let (mu, combo) = find_governing_combination(&m, &nscp_combinations()).unwrap();
        assert_eq!(combo.id, "5");
        assert!((mu - 261.0).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_wind_still_adds() {
        // 1.2D + 1.0W + 1.0L = 96 + 60 + 45 = 201 either way round
        let leeward = moments().with(LoadType::Wind, -60.0);
        let windward = moments().with(LoadType::Wind, 60.0);
        let (mu, combo) = find_governing_combination(&leeward, &nscp_combinations()).unwrap();
        assert_eq!(combo.id, "4");
        assert!((mu - 201.0).abs() < 1e-9);
        assert_eq!(nscp_combinations()[5].apply(&leeward), nscp_combinations()[5].apply(&windward));
    }

    #[test]
    fn test_simplified_set() {
        let (mu, _) = find_governing_combination(&moments(), &simplified_combinations()).unwrap();
        assert!((mu - 168.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_positive_moment() {
        assert!(find_governing_combination(&LoadMoments::default(), &nscp_combinations()).is_none());
        let uplift = LoadMoments::default().with(LoadType::Dead, -10.0);
        assert!(find_governing_combination(&uplift, &nscp_combinations()).is_none());
    }
}
