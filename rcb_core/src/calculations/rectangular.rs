//! # Rectangular Beam Section
//!
//! Geometry and material of a rectangular reinforced concrete beam, shared by
//! the singly and doubly reinforced calculations.
//!
//! ```text
//!     ┌───────────┐  ─┬─
//!     │  ● ● ●    │   │ d'  (compression steel, optional)
//!     │           │   │
//!   h │           │   d
//!     │           │   │
//!     │  ● ● ●    │  ─┴─   tension steel centroid
//!     └───────────┘  cover
//!           b
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::ConcreteMaterial;

/// Rectangular beam section.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-1",
///   "width_mm": 300.0,
///   "height_mm": 500.0,
///   "cover_mm": 65.0,
///   "compression_cover_mm": 65.0,
///   "material": { "fc_mpa": 28.0, "fy_mpa": 415.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularSection {
    /// User label (e.g., "B-1", "Girder at Grid 3")
    #[serde(default)]
    pub label: String,

    /// Beam width b (mm)
    pub width_mm: f64,

    /// Total height h (mm)
    pub height_mm: f64,

    /// Distance from the tension face to the tension-steel centroid (mm)
    pub cover_mm: f64,

    /// Distance d' from the compression face to the compression-steel
    /// centroid (mm). Required for doubly reinforced calculations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_cover_mm: Option<f64>,

    /// Concrete and steel strengths
    pub material: ConcreteMaterial,
}

impl RectangularSection {
    /// Create a section with tension steel only
    pub fn new(width_mm: f64, height_mm: f64, cover_mm: f64, material: ConcreteMaterial) -> Self {
        RectangularSection {
            label: String::new(),
            width_mm,
            height_mm,
            cover_mm,
            compression_cover_mm: None,
            material,
        }
    }

    /// Set the compression-steel cover d' (builder pattern)
    pub fn with_compression_cover(mut self, d_prime_mm: f64) -> Self {
        self.compression_cover_mm = Some(d_prime_mm);
        self
    }

    /// Set the label (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Effective depth d = h − cover (mm)
    #[inline]
    pub fn effective_depth_mm(&self) -> f64 {
        self.height_mm - self.cover_mm
    }

    /// Gross b·d area used for reinforcement ratios (mm²)
    #[inline]
    pub fn bd_mm2(&self) -> f64 {
        self.width_mm * self.effective_depth_mm()
    }

    /// Validate geometry and material.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.width_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "width_mm",
                self.width_mm.to_string(),
                "Width must be positive",
            ));
        }
        if !(self.effective_depth_mm() > 0.0) {
            return Err(CalcError::invalid_input(
                "cover_mm",
                self.cover_mm.to_string(),
                format!(
                    "Effective depth h - cover = {:.1} mm must be positive",
                    self.effective_depth_mm()
                ),
            ));
        }
        self.material.validate()
    }

    /// Compression cover d', validated for doubly reinforced use.
    pub fn compression_cover(&self) -> CalcResult<f64> {
        let d_prime = self
            .compression_cover_mm
            .ok_or_else(|| CalcError::missing_field("compression_cover_mm"))?;
        if !(d_prime > 0.0) {
            return Err(CalcError::invalid_input(
                "compression_cover_mm",
                d_prime.to_string(),
                "Compression steel cover must be positive",
            ));
        }
        if d_prime >= self.effective_depth_mm() {
            return Err(CalcError::invalid_input(
                "compression_cover_mm",
                d_prime.to_string(),
                "Compression steel must lie above the tension steel (d' < d)",
            ));
        }
        Ok(d_prime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_section() -> RectangularSection {
        RectangularSection::new(300.0, 500.0, 65.0, ConcreteMaterial::new(28.0, 415.0))
    }

    #[test]
    fn test_effective_depth() {
        let s = test_section();
        assert_eq!(s.effective_depth_mm(), 435.0);
        assert_eq!(s.bd_mm2(), 130_500.0);
    }

    #[test]
    fn test_validation() {
        assert!(test_section().validate().is_ok());

        let mut s = test_section();
        s.width_mm = 0.0;
        assert!(s.validate().is_err());

        let mut s = test_section();
        s.cover_mm = 500.0;
        assert!(s.validate().is_err());

        let mut s = test_section();
        s.material.fy_mpa = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_compression_cover() {
        let s = test_section();
        assert!(matches!(s.compression_cover(), Err(CalcError::MissingField { .. })));

        let s = test_section().with_compression_cover(65.0);
        assert_eq!(s.compression_cover().unwrap(), 65.0);

        let s = test_section().with_compression_cover(0.0);
        assert!(s.compression_cover().is_err());

        let s = test_section().with_compression_cover(450.0);
        assert!(s.compression_cover().is_err());
    }

    #[test]
    fn test_serialization() {
        let s = test_section().with_compression_cover(60.0).with_label("B-1");
        let json = serde_json::to_string_pretty(&s).unwrap();
        let roundtrip: RectangularSection = serde_json::from_str(&json).unwrap();
        assert_eq!(s, roundtrip);
    }
}
