//! Load type definitions per NSCP 2015 Section 203
//!
//! The load categories that enter the strength-design combinations, and the
//! unfactored beam moments they produce.

use serde::{Deserialize, Serialize};

/// Load types used by the NSCP strength-design combinations
///
/// # Example
/// ```
/// use rcb_core::loads::LoadType;
///
/// assert_eq!(LoadType::Roof.code(), "Lr");
/// assert_eq!(LoadType::Earthquake.description(), "Earthquake load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// D - Dead load (self-weight and permanent attachments)
    Dead,
    /// L - Floor live load
    Live,
    /// Lr - Roof live load
    Roof,
    /// W - Wind load
    Wind,
    /// E - Earthquake load
    Earthquake,
    /// R - Rain load
    Rain,
}

impl LoadType {
    /// All load types in combination order
    pub const ALL: [LoadType; 6] = [
        LoadType::Dead,
        LoadType::Live,
        LoadType::Roof,
        LoadType::Wind,
        LoadType::Earthquake,
        LoadType::Rain,
    ];

    /// Standard abbreviation (D, L, Lr, W, E, R)
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::Live => "L",
            LoadType::Roof => "Lr",
            LoadType::Wind => "W",
            LoadType::Earthquake => "E",
            LoadType::Rain => "R",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::Live => "Live load",
            LoadType::Roof => "Roof live load",
            LoadType::Wind => "Wind load",
            LoadType::Earthquake => "Earthquake load",
            LoadType::Rain => "Rain load",
        }
    }

    /// Whether the load may reverse direction (wind, earthquake)
    pub fn is_directional(&self) -> bool {
        matches!(self, LoadType::Wind | LoadType::Earthquake)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Unfactored beam moments by load type (kN·m)
///
/// ## JSON Example
///
/// ```json
/// { "dead": 80.0, "live": 45.0, "wind": 20.0 }
/// ```
///
/// Missing entries are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadMoments {
    pub dead: f64,
    pub live: f64,
    pub roof: f64,
    pub wind: f64,
    pub earthquake: f64,
    pub rain: f64,
}

impl LoadMoments {
    /// Moment for one load type
    pub fn get(&self, load_type: LoadType) -> f64 {
        match load_type {
            LoadType::Dead => self.dead,
            LoadType::Live => self.live,
            LoadType::Roof => self.roof,
            LoadType::Wind => self.wind,
            LoadType::Earthquake => self.earthquake,
            LoadType::Rain => self.rain,
        }
    }

    /// Set the moment for one load type (builder pattern)
    pub fn with(mut self, load_type: LoadType, moment_knm: f64) -> Self {
        let slot = match load_type {
            LoadType::Dead => &mut self.dead,
            LoadType::Live => &mut self.live,
            LoadType::Roof => &mut self.roof,
            LoadType::Wind => &mut self.wind,
            LoadType::Earthquake => &mut self.earthquake,
            LoadType::Rain => &mut self.rain,
        };
        *slot = moment_knm;
        self
    }
}
