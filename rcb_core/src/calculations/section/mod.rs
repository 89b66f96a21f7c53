//! # Polygonal Sections
//!
//! Flexure of a cross-section of arbitrary polygonal shape (tee, inverted
//! tee, trapezoid, channel) with any number of reinforcement layers.
//!
//! ```text
//!   y
//!   ↑   ┌───────────────────┐   ← top fibre (compression face)
//!   │   │  ● ●        ● ●   │     compression layer (auto: above mid-height)
//!   │   └──────┐     ┌──────┘
//!   │          │     │
//!   │          │ ● ● │            tension layer (auto: below mid-height)
//!   │          └─────┘
//!   └──────────────────────→ x
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Shoelace area, width at a height, compression block
//! - [`analysis`] - Neutral-axis equilibrium solve and moment capacity
//! - [`design`] - Tension steel by repeated analysis
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "T-1",
//!   "description": "Interior tee girder",
//!   "fc": 28.0,
//!   "fy": 415.0,
//!   "vertices": [
//!     {"x": 175, "y": 0}, {"x": 425, "y": 0}, {"x": 425, "y": 400},
//!     {"x": 600, "y": 400}, {"x": 600, "y": 500}, {"x": 0, "y": 500},
//!     {"x": 0, "y": 400}, {"x": 175, "y": 400}
//!   ],
//!   "reinforcement": [
//!     {"y": 65, "area": 1500, "description": "3-25mm"},
//!     {"y": 440, "area": 400, "type": "compression"}
//!   ]
//! }
//! ```

pub mod analysis;
pub mod design;
pub mod geometry;

pub use analysis::{analyze, SectionAnalysisResult, SteelLayerResult};
pub use design::{design, SectionDesignResult};
pub use geometry::{BoundingBox, Point};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::ConcreteMaterial;

/// How a reinforcement layer is assigned to the tension or compression side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Tension,
    Compression,
    /// Compression when above mid-height of the section, tension otherwise
    #[default]
    Auto,
}

/// A layer of reinforcing bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarLayer {
    /// Height of the layer centroid above the section bottom (mm)
    pub y: f64,

    /// Steel area of the layer (mm²)
    pub area: f64,

    /// Bar callout, e.g. "3-25mm"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "type", default)]
    pub kind: LayerKind,
}

impl RebarLayer {
    /// Layer with automatic classification
    pub fn new(y: f64, area: f64) -> Self {
        RebarLayer {
            y,
            area,
            description: String::new(),
            kind: LayerKind::Auto,
        }
    }

    /// Set the classification (builder pattern)
    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the bar callout (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the layer counts as compression steel for a section whose
    /// bounding box has the given mid-height.
    pub fn is_compression(&self, mid_height: f64) -> bool {
        match self.kind {
            LayerKind::Compression => true,
            LayerKind::Tension => false,
            LayerKind::Auto => self.y > mid_height,
        }
    }
}

/// Reinforced concrete section with a polygonal outline.
///
/// Vertices are listed in one consistent winding (either direction) and form
/// a simple polygon without holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSection {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Concrete compressive strength f'c (MPa)
    pub fc: f64,

    /// Steel yield strength fy (MPa)
    pub fy: f64,

    pub vertices: Vec<Point>,

    pub reinforcement: Vec<RebarLayer>,

    /// Effective depth d (mm); taken from the tension-steel centroid when
    /// absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_depth: Option<f64>,
}

/// Geometric and reinforcement properties of a [`PolygonSection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Overall width (bounding box) (mm)
    pub width_mm: f64,
    /// Overall height (mm)
    pub height_mm: f64,
    /// Gross concrete area (mm²)
    pub area_mm2: f64,

    pub centroid_x_mm: f64,
    pub centroid_y_mm: f64,

    pub bounds: BoundingBox,

    pub total_tension_steel_mm2: f64,
    pub total_compression_steel_mm2: f64,

    /// Top fibre to tension-steel centroid, or the override (mm). Zero when
    /// neither exists.
    pub effective_depth_mm: f64,

    /// Top fibre to compression-steel centroid (mm). Zero without
    /// compression steel.
    pub compression_cover_mm: f64,
}

impl SectionProperties {
    /// Height above the bottom used for automatic layer classification
    #[inline]
    pub fn mid_height(&self) -> f64 {
        self.bounds.mid_height()
    }

    /// Depth of a point at height `y` below the top fibre (mm)
    #[inline]
    pub fn depth_of(&self, y: f64) -> f64 {
        self.bounds.max_y - y
    }
}

impl PolygonSection {
    /// Create a section with no reinforcement yet
    pub fn new(name: impl Into<String>, fc: f64, fy: f64, vertices: Vec<Point>) -> Self {
        PolygonSection {
            name: name.into(),
            description: String::new(),
            fc,
            fy,
            vertices,
            reinforcement: Vec::new(),
            effective_depth: None,
        }
    }

    /// `b × h` rectangle with its bottom-left corner at the origin
    pub fn rectangle(name: impl Into<String>, b: f64, h: f64, fc: f64, fy: f64) -> Self {
        let vertices = vec![
            Point::new(0.0, 0.0),
            Point::new(b, 0.0),
            Point::new(b, h),
            Point::new(0.0, h),
        ];
        PolygonSection::new(name, fc, fy, vertices)
    }

    /// Add a reinforcement layer (builder pattern)
    pub fn with_layer(mut self, layer: RebarLayer) -> Self {
        self.reinforcement.push(layer);
        self
    }

    /// Override the effective depth (builder pattern)
    pub fn with_effective_depth(mut self, d_mm: f64) -> Self {
        self.effective_depth = Some(d_mm);
        self
    }

    /// Strengths as a material model
    pub fn material(&self) -> ConcreteMaterial {
        ConcreteMaterial::new(self.fc, self.fy)
    }

    /// Validate the section record.
    ///
    /// Each failure names its own field: `vertices`, `fc`, `fy`,
    /// `reinforcement`, `reinforcement[i].area` or `effective_depth`.
    pub fn validate(&self) -> CalcResult<()> {
        if self.vertices.len() < 3 {
            return Err(CalcError::invalid_input(
                "vertices",
                self.vertices.len().to_string(),
                "section must have at least 3 vertices",
            ));
        }
        self.material().validate()?;
        if self.reinforcement.is_empty() {
            return Err(CalcError::invalid_input(
                "reinforcement",
                "0",
                "section must have at least one reinforcement layer",
            ));
        }
        for (i, layer) in self.reinforcement.iter().enumerate() {
            if !(layer.area > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("reinforcement[{}].area", i),
                    layer.area.to_string(),
                    format!("reinforcement layer {} must have positive area", i + 1),
                ));
            }
        }
        if let Some(d) = self.effective_depth {
            if !(d > 0.0) {
                return Err(CalcError::invalid_input(
                    "effective_depth",
                    d.to_string(),
                    "effective depth override must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Compute geometric and reinforcement properties.
    ///
    /// Returns all-zero geometry for fewer than 3 vertices.
    pub fn calculate_properties(&self) -> SectionProperties {
        let bounds = BoundingBox::of(&self.vertices).unwrap_or(BoundingBox {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        });
        let (area, cx, cy) = geometry::area_and_centroid(&self.vertices);

        let mid = bounds.mid_height();
        let (mut t_area, mut t_moment, mut c_area, mut c_moment) = (0.0, 0.0, 0.0, 0.0);
        for layer in &self.reinforcement {
            if layer.is_compression(mid) {
                c_area += layer.area;
                c_moment += layer.area * layer.y;
            } else {
                t_area += layer.area;
                t_moment += layer.area * layer.y;
            }
        }

        let mut effective_depth = if t_area > 0.0 {
            bounds.max_y - t_moment / t_area
        } else {
            0.0
        };
        if let Some(d) = self.effective_depth.filter(|d| *d > 0.0) {
            effective_depth = d;
        }

        SectionProperties {
            width_mm: bounds.width(),
            height_mm: bounds.height(),
            area_mm2: area,
            centroid_x_mm: cx,
            centroid_y_mm: cy,
            bounds,
            total_tension_steel_mm2: t_area,
            total_compression_steel_mm2: c_area,
            effective_depth_mm: effective_depth,
            compression_cover_mm: if c_area > 0.0 {
                bounds.max_y - c_moment / c_area
            } else {
                0.0
            },
        }
    }

    /// Width at height `y` above the section bottom (mm)
    pub fn width_at_y(&self, y: f64) -> f64 {
        geometry::width_at_y(&self.vertices, y)
    }

    /// Width at `depth` below the top fibre (mm)
    pub fn width_at_depth(&self, depth: f64) -> f64 {
        match BoundingBox::of(&self.vertices) {
            Some(b) => self.width_at_y(b.max_y - depth),
            None => 0.0,
        }
    }

    /// Area of the top `a` mm of the section (mm²)
    pub fn compression_block_area(&self, a: f64) -> f64 {
        geometry::compression_block_area(&self.vertices, a)
    }

    /// Depth to the centroid of the top `a` mm of the section (mm)
    pub fn compression_block_centroid(&self, a: f64) -> f64 {
        geometry::compression_block_centroid(&self.vertices, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> PolygonSection {
        PolygonSection::rectangle("B-1", 300.0, 500.0, 28.0, 415.0)
            .with_layer(RebarLayer::new(65.0, 1000.0))
            .with_layer(RebarLayer::new(440.0, 400.0))
    }

    #[test]
    fn test_properties() {
        let props = beam().calculate_properties();
        assert_eq!(props.width_mm, 300.0);
        assert_eq!(props.height_mm, 500.0);
        assert_eq!(props.area_mm2, 150_000.0);
        assert_eq!(props.centroid_y_mm, 250.0);
        assert_eq!(props.total_tension_steel_mm2, 1000.0);
        assert_eq!(props.total_compression_steel_mm2, 400.0);
        assert_eq!(props.effective_depth_mm, 435.0);
        assert_eq!(props.compression_cover_mm, 60.0);
    }

    #[test]
    fn test_explicit_kind_overrides_position() {
        let s = PolygonSection::rectangle("B", 300.0, 500.0, 28.0, 415.0)
            .with_layer(RebarLayer::new(65.0, 1000.0))
            .with_layer(RebarLayer::new(300.0, 200.0).with_kind(LayerKind::Tension));
        let props = s.calculate_properties();
        assert_eq!(props.total_tension_steel_mm2, 1200.0);
        assert_eq!(props.total_compression_steel_mm2, 0.0);
        // Centroid of 1000 @ 65 and 200 @ 300
        let centroid = (1000.0 * 65.0 + 200.0 * 300.0) / 1200.0;
        assert!((props.effective_depth_mm - (500.0 - centroid)).abs() < 1e-9);
    }

    #[test]
    fn test_effective_depth_override() {
        let props = beam().with_effective_depth(420.0).calculate_properties();
        assert_eq!(props.effective_depth_mm, 420.0);
    }

    #[test]
    fn test_validation_errors_are_distinct() {
        let field = |s: &PolygonSection| match s.validate() {
            Err(CalcError::InvalidInput { field, .. }) => field,
            other => panic!("expected invalid input, got {:?}", other),
        };

        let mut s = beam();
        s.vertices.truncate(2);
        assert_eq!(field(&s), "vertices");

        let mut s = beam();
        s.fc = 0.0;
        assert_eq!(field(&s), "fc");

        let mut s = beam();
        s.fy = -1.0;
        assert_eq!(field(&s), "fy");

        let mut s = beam();
        s.reinforcement.clear();
        assert_eq!(field(&s), "reinforcement");

        let mut s = beam();
        s.reinforcement[1].area = 0.0;
        assert_eq!(field(&s), "reinforcement[1].area");

        assert_eq!(field(&beam().with_effective_depth(0.0)), "effective_depth");
        assert!(beam().validate().is_ok());
    }

    #[test]
    fn test_layer_message_is_one_based() {
        let mut s = beam();
        s.reinforcement[0].area = -5.0;
        let msg = s.validate().unwrap_err().to_string();
        assert!(msg.contains("reinforcement layer 1 must have positive area"));
    }

    #[test]
    fn test_width_at_depth() {
        let s = beam();
        assert_eq!(s.width_at_depth(0.0), 300.0);
        assert_eq!(s.width_at_depth(250.0), 300.0);
    }

    #[test]
    fn test_json_record() {
        let json = r#"{
            "name": "T-1",
            "fc": 28,
            "fy": 415,
            "vertices": [
                {"x": 0, "y": 0}, {"x": 300, "y": 0},
                {"x": 300, "y": 500}, {"x": 0, "y": 500}
            ],
            "reinforcement": [
                {"y": 65, "area": 1000, "description": "4-20mm"},
                {"y": 440, "area": 400, "type": "compression"}
            ]
        }"#;
        let s: PolygonSection = serde_json::from_str(json).unwrap();
        assert_eq!(s.reinforcement[0].kind, LayerKind::Auto);
        assert_eq!(s.reinforcement[1].kind, LayerKind::Compression);
        assert_eq!(s.effective_depth, None);
        assert!(s.validate().is_ok());
    }
}
