use thiserror::Error;

/// First-page geometry and page count of an uploaded PDF
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PdfGeometry {
    pub width_pt: f64,
    pub height_pt: f64,
    pub page_count: u32,
}

/// Why a PDF could not be reduced to a [`PdfGeometry`]
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GeometryError {
    #[error("the PDF is empty")]
    Empty,

    #[error("failed to parse PDF: {0}")]
    Malformed(String),

    #[error("first page has no MediaBox")]
    MissingMediaBox,

    #[error("invalid page box: {0}")]
    InvalidBox(String),
}

/// Derived quantities of a submission that passed every check
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationSummary {
    pub trim: String,
    pub bleed_mm: f64,
    pub paper_type: String,
    pub pages: u32,
    pub spine_mm: f64,
}

/// Result of validating a content/cover submission.
///
/// Entries in each list appear in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub checks: Vec<String>,
    pub summary: Option<ValidationSummary>,
}

impl ValidationOutcome {
    /// True when no error was recorded
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_serializes_in_field_order() {
        let outcome = ValidationOutcome {
            errors: vec![],
            warnings: vec!["w".to_string()],
            checks: vec!["c".to_string()],
            summary: Some(ValidationSummary {
                trim: "A5".to_string(),
                bleed_mm: 3.0,
                paper_type: "woodfree-white-80".to_string(),
                pages: 200,
                spine_mm: 20.0,
            }),
        };

        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"errors":[],"warnings":["w"],"checks":["c"],"summary":{"trim":"A5","bleed_mm":3.0,"paper_type":"woodfree-white-80","pages":200,"spine_mm":20.0}}"#
        );

        let back: ValidationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_passed_tracks_errors() {
        let mut outcome = ValidationOutcome::default();
        assert!(outcome.passed());
        outcome.errors.push("bad".to_string());
        assert!(!outcome.passed());
    }

    #[test]
    fn test_geometry_error_messages() {
        assert_eq!(GeometryError::Empty.to_string(), "the PDF is empty");
        assert_eq!(
            GeometryError::Malformed("bad xref".into()).to_string(),
            "failed to parse PDF: bad xref"
        );
    }
}
