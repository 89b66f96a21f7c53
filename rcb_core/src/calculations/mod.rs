//! # Flexure Calculations
//!
//! Each section type follows the pattern:
//!
//! - a section record (JSON-serializable, `validate()`)
//! - `design(section, mu, code)` - required reinforcement for a moment
//! - `analyze(section, steel, code)` - capacity of given reinforcement
//! - `*Result` records (JSON-serializable), created fresh per call
//!
//! Inadequate designs are ordinary results with `is_adequate = false`;
//! only invalid input is an error.
//!
//! ## Available Calculations
//!
//! - [`singly`] - Rectangular section, tension steel only
//! - [`doubly`] - Rectangular section, tension and compression steel
//! - [`section`] - Polygonal section, any number of layers
//!
//! [`CalculationRequest`] wraps every operation in one tagged JSON record
//! for file-driven use.

pub mod doubly;
pub mod rectangular;
pub mod section;
pub mod singly;

use serde::{Deserialize, Serialize};

use crate::design_code::{nscp_ref, DesignCode};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{self, FactoredMomentInput, FactoredMomentResult};

pub use doubly::{DoublyAnalysisResult, DoublyDesignResult};
pub use rectangular::RectangularSection;
pub use section::{
    LayerKind, PolygonSection, RebarLayer, SectionAnalysisResult, SectionDesignResult, SectionProperties,
};
pub use singly::{SinglyAnalysisResult, SinglyDesignResult};

/// Rectangular section with a moment demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularDesignInput {
    pub section: RectangularSection,
    /// Factored moment Mu (kN·m)
    pub mu_knm: f64,
}

/// Rectangular section with its reinforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularAnalysisInput {
    pub section: RectangularSection,
    /// Tension steel As (mm²)
    pub as_mm2: f64,
    /// Compression steel A's (mm²); required for doubly analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asc_mm2: Option<f64>,
}

/// Polygonal section on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInput {
    pub section: PolygonSection,
}

/// Polygonal section with a moment demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDesignInput {
    pub section: PolygonSection,
    /// Factored moment Mu (kN·m)
    pub mu_knm: f64,
}

/// Any calculation the engine runs, tagged by `"type"`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "SinglyDesign",
///   "section": {
///     "width_mm": 300, "height_mm": 500, "cover_mm": 65,
///     "material": { "fc_mpa": 28, "fy_mpa": 415 }
///   },
///   "mu_knm": 150
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationRequest {
    SinglyDesign(RectangularDesignInput),
    SinglyAnalysis(RectangularAnalysisInput),
    DoublyDesign(RectangularDesignInput),
    DoublyAnalysis(RectangularAnalysisInput),
    SectionProperties(SectionInput),
    SectionAnalysis(SectionInput),
    SectionDesign(SectionDesignInput),
    FactoredMoment(FactoredMomentInput),
}

/// Result of a [`CalculationRequest`], tagged like the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    SinglyDesign(SinglyDesignResult),
    SinglyAnalysis(SinglyAnalysisResult),
    DoublyDesign(DoublyDesignResult),
    DoublyAnalysis(DoublyAnalysisResult),
    SectionProperties(SectionProperties),
    SectionAnalysis(SectionAnalysisResult),
    SectionDesign(SectionDesignResult),
    FactoredMoment(FactoredMomentResult),
}

impl CalculationRequest {
    /// The user-provided label (section label or name)
    pub fn label(&self) -> &str {
        match self {
            CalculationRequest::SinglyDesign(i) | CalculationRequest::DoublyDesign(i) => &i.section.label,
            CalculationRequest::SinglyAnalysis(i) | CalculationRequest::DoublyAnalysis(i) => &i.section.label,
            CalculationRequest::SectionProperties(i) | CalculationRequest::SectionAnalysis(i) => &i.section.name,
            CalculationRequest::SectionDesign(i) => &i.section.name,
            CalculationRequest::FactoredMoment(i) => &i.label,
        }
    }

    /// The calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRequest::SinglyDesign(_) => "SinglyDesign",
            CalculationRequest::SinglyAnalysis(_) => "SinglyAnalysis",
            CalculationRequest::DoublyDesign(_) => "DoublyDesign",
            CalculationRequest::DoublyAnalysis(_) => "DoublyAnalysis",
            CalculationRequest::SectionProperties(_) => "SectionProperties",
            CalculationRequest::SectionAnalysis(_) => "SectionAnalysis",
            CalculationRequest::SectionDesign(_) => "SectionDesign",
            CalculationRequest::FactoredMoment(_) => "FactoredMoment",
        }
    }

    /// Run the calculation under `code`.
    pub fn run(&self, code: &DesignCode) -> CalcResult<CalculationOutput> {
        tracing::debug!(calc_type = self.calc_type(), label = self.label(), code = %code.name, "running calculation");

        let output = match self {
            CalculationRequest::SinglyDesign(i) => {
                CalculationOutput::SinglyDesign(singly::design(&i.section, i.mu_knm, code)?)
            }
            CalculationRequest::SinglyAnalysis(i) => {
                CalculationOutput::SinglyAnalysis(singly::analyze(&i.section, i.as_mm2, code)?)
            }
            CalculationRequest::DoublyDesign(i) => {
                CalculationOutput::DoublyDesign(doubly::design(&i.section, i.mu_knm, code)?)
            }
            CalculationRequest::DoublyAnalysis(i) => {
                let asc = i.asc_mm2.ok_or_else(|| CalcError::missing_field("asc_mm2"))?;
                CalculationOutput::DoublyAnalysis(doubly::analyze(&i.section, i.as_mm2, asc, code)?)
            }
            CalculationRequest::SectionProperties(i) => {
                i.section.validate()?;
                CalculationOutput::SectionProperties(i.section.calculate_properties())
            }
            CalculationRequest::SectionAnalysis(i) => {
                CalculationOutput::SectionAnalysis(section::analyze(&i.section, code)?)
            }
            CalculationRequest::SectionDesign(i) => {
                CalculationOutput::SectionDesign(section::design(&i.section, i.mu_knm, code)?)
            }
            CalculationRequest::FactoredMoment(i) => CalculationOutput::FactoredMoment(loads::calculate(i)?),
        };
        Ok(output)
    }
}

impl CalculationOutput {
    /// One-line status for display
    pub fn message(&self) -> String {
        match self {
            CalculationOutput::SinglyDesign(r) => r.message.clone(),
            CalculationOutput::SinglyAnalysis(r) => r.message.clone(),
            CalculationOutput::DoublyDesign(r) => r.message.clone(),
            CalculationOutput::DoublyAnalysis(r) => r.message.clone(),
            CalculationOutput::SectionProperties(p) => format!(
                "Area {:.0} mm², d = {:.1} mm, As = {:.0} mm², A's = {:.0} mm²",
                p.area_mm2, p.effective_depth_mm, p.total_tension_steel_mm2, p.total_compression_steel_mm2
            ),
            CalculationOutput::SectionAnalysis(r) => r.message.clone(),
            CalculationOutput::SectionDesign(r) => r.message.clone(),
            CalculationOutput::FactoredMoment(r) => {
                format!(
                    "Mu = {:.2} kN·m (combination {}: {}, {})",
                    r.mu_knm,
                    r.governing_id,
                    r.governing_equation,
                    nscp_ref::LOAD_COMBINATIONS
                )
            }
        }
    }

    /// Design strength φMn, where the calculation produces one (kN·m)
    pub fn phi_mn_knm(&self) -> Option<f64> {
        match self {
            CalculationOutput::SinglyDesign(r) => Some(r.phi_mn_knm),
            CalculationOutput::SinglyAnalysis(r) => Some(r.phi_mn_knm),
            CalculationOutput::DoublyDesign(r) => Some(r.phi_mn_knm),
            CalculationOutput::DoublyAnalysis(r) => Some(r.phi_mn_knm),
            CalculationOutput::SectionAnalysis(r) => Some(r.phi_mn_knm),
            CalculationOutput::SectionDesign(r) => Some(r.phi_mn_knm),
            CalculationOutput::SectionProperties(_) | CalculationOutput::FactoredMoment(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLY_DESIGN: &str = r#"{
        "type": "SinglyDesign",
        "section": {
            "label": "B-1",
            "width_mm": 300, "height_mm": 500, "cover_mm": 65,
            "material": { "fc": 28, "fy": 415 }
        },
        "mu_knm": 150
    }"#;

    #[test]
    fn test_request_json() {
        let request: CalculationRequest = serde_json::from_str(SINGLY_DESIGN).unwrap();
        assert_eq!(request.calc_type(), "SinglyDesign");
        assert_eq!(request.label(), "B-1");

        let output = request.run(&DesignCode::nscp_2015()).unwrap();
        let phi_mn = output.phi_mn_knm().unwrap();
        assert!(phi_mn >= 149.99);

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.starts_with(r#"{"type":"SinglyDesign""#));
    }

    #[test]
    fn test_doubly_analysis_requires_asc() {
        let request: CalculationRequest = serde_json::from_str(
            r#"{
                "type": "DoublyAnalysis",
                "section": {
                    "width_mm": 300, "height_mm": 500, "cover_mm": 65,
                    "compression_cover_mm": 65,
                    "material": { "fc_mpa": 28, "fy_mpa": 415 }
                },
                "as_mm2": 2000
            }"#,
        )
        .unwrap();
        let err = request.run(&DesignCode::nscp_2015()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_section_properties_request() {
        let request = CalculationRequest::SectionProperties(SectionInput {
            section: PolygonSection::rectangle("R", 300.0, 500.0, 28.0, 415.0).with_layer(RebarLayer::new(65.0, 1000.0)),
        });
        match request.run(&DesignCode::nscp_2015()).unwrap() {
            CalculationOutput::SectionProperties(p) => assert_eq!(p.effective_depth_mm, 435.0),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_factored_moment_message_cites_combinations() {
        let request: CalculationRequest = serde_json::from_str(
            r#"{"type": "FactoredMoment", "label": "B-1", "moments": {"dead": 80, "live": 45}}"#,
        )
        .unwrap();
        let output = request.run(&DesignCode::nscp_2015()).unwrap();
        assert!(output.message().starts_with("Mu = 168.00 kN·m"));
        assert!(output.message().contains(nscp_ref::LOAD_COMBINATIONS));
        assert_eq!(output.phi_mn_knm(), None);
    }

    #[test]
    fn test_invalid_request_is_error() {
        let request = CalculationRequest::SectionAnalysis(SectionInput {
            section: PolygonSection::rectangle("R", 300.0, 500.0, 28.0, 415.0),
        });
        let err = request.run(&DesignCode::nscp_2015()).unwrap_err();
        assert!(err.is_input_error());
    }
}
