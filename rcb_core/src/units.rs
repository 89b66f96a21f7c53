//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI units the flexure engine mixes.
//! Geometry is in millimetres and stresses in MPa (N/mm²), so the mechanics
//! naturally produce newtons and newton-millimetres, while engineers read
//! forces in kN and moments in kN·m.
//!
//! ## Example
//!
//! ```rust
//! use rcb_core::units::{KilonewtonMeters, NewtonMillimeters};
//!
//! let mu = KilonewtonMeters(150.0);
//! let mu_nmm: NewtonMillimeters = mu.into();
//! assert_eq!(mu_nmm.0, 150.0e6);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / 1000.0)
    }
}

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in newton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMillimeters(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilonewtonMeters(pub f64);

impl From<NewtonMillimeters> for KilonewtonMeters {
    fn from(nmm: NewtonMillimeters) -> Self {
        KilonewtonMeters(nmm.0 / 1.0e6)
    }
}

impl From<KilonewtonMeters> for NewtonMillimeters {
    fn from(knm: KilonewtonMeters) -> Self {
        NewtonMillimeters(knm.0 * 1.0e6)
    }
}

/// Convert a moment demand in kN·m to N·mm
#[inline]
pub fn knm_to_nmm(moment_knm: f64) -> f64 {
    NewtonMillimeters::from(KilonewtonMeters(moment_knm)).0
}

/// Convert a moment in N·mm to kN·m
#[inline]
pub fn nmm_to_knm(moment_nmm: f64) -> f64 {
    KilonewtonMeters::from(NewtonMillimeters(moment_nmm)).0
}

/// Convert a force in N to kN
#[inline]
pub fn n_to_kn(force_n: f64) -> f64 {
    Kilonewtons::from(Newtons(force_n)).0
}

/// Convert a force in kN to N
#[inline]
pub fn kn_to_n(force_kn: f64) -> f64 {
    Newtons::from(Kilonewtons(force_kn)).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_conversion() {
        let nmm: NewtonMillimeters = KilonewtonMeters(2.5).into();
        assert_eq!(nmm.0, 2.5e6);
        let back: KilonewtonMeters = nmm.into();
        assert!((back.0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_force_helpers() {
        assert_eq!(n_to_kn(415_000.0), 415.0);
        assert_eq!(kn_to_n(0.1), 100.0);
        assert!((nmm_to_knm(knm_to_nmm(123.4)) - 123.4).abs() < 1e-9);
    }

    #[test]
    fn test_serialization() {
        let m = KilonewtonMeters(150.0);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "150.0");
        let roundtrip: KilonewtonMeters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
