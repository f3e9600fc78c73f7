//! Print preflight: checks a book's content and cover PDFs against the
//! printer's physical production rules.
//!
//! [`ValidationEngine::validate`] turns a trim size, bleed, paper stock and
//! page count into expected page and cover geometry, compares it with what
//! was extracted from the uploaded PDFs and reports the result as ordered
//! errors, warnings and passed checks.

pub mod catalog;
pub mod error;
pub mod messages;
pub mod units;

use shared_types::{GeometryError, PdfGeometry, ValidationOutcome, ValidationSummary};
use tracing::debug;

pub use catalog::{PaperType, SpecCatalog, TrimSize};
pub use error::CatalogError;
pub use messages::{Locale, SizeMismatch};
pub use units::{mm_to_pt, pt_to_mm};

/// Maximum per-axis difference between expected and actual size (~0.35 mm)
pub const DIMENSION_TOLERANCE_PT: f64 = 1.0;

/// Absorbs representation error so that exactly `expected ± tolerance` passes
const FLOAT_SLACK_PT: f64 = 1e-9;

/// One submission to validate
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRequest {
    pub trim: String,
    pub bleed_mm: f64,
    pub paper_type: String,
    /// Page count stated by the customer; wins over the PDF's when positive
    pub declared_pages: Option<u32>,
    pub content_geometry: Result<PdfGeometry, GeometryError>,
    pub cover_geometry: Result<PdfGeometry, GeometryError>,
}

/// Expected page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedBox {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl ExpectedBox {
    /// Content page: trim plus bleed on all four sides
    pub fn content(trim: &TrimSize, bleed_mm: f64) -> Self {
        let bleed_pt = mm_to_pt(bleed_mm);
        Self {
            width_pt: mm_to_pt(trim.width_mm) + 2.0 * bleed_pt,
            height_pt: mm_to_pt(trim.height_mm) + 2.0 * bleed_pt,
        }
    }

    /// Cover spread: back + spine + front, bleed on the outer edges
    pub fn cover(trim: &TrimSize, bleed_mm: f64, spine_mm: f64) -> Self {
        Self {
            width_pt: mm_to_pt(2.0 * trim.width_mm + spine_mm + 2.0 * bleed_mm),
            height_pt: mm_to_pt(trim.height_mm + 2.0 * bleed_mm),
        }
    }

    /// Both axes within [`DIMENSION_TOLERANCE_PT`]
    pub fn matches(&self, actual: &PdfGeometry) -> bool {
        near(actual.width_pt, self.width_pt) && near(actual.height_pt, self.height_pt)
    }

    fn mismatch(&self, actual: &PdfGeometry) -> SizeMismatch {
        SizeMismatch {
            expected_w_pt: self.width_pt,
            expected_h_pt: self.height_pt,
            actual_w_pt: actual.width_pt,
            actual_h_pt: actual.height_pt,
        }
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() <= DIMENSION_TOLERANCE_PT + FLOAT_SLACK_PT
}

/// Spine thickness in mm for a page count on a given paper
pub fn spine_mm(pages: u32, paper: &PaperType) -> f64 {
    pages as f64 * paper.thickness_mm
}

/// Round to 2 decimals, half-to-even on the exact value, so the summary
/// agrees with the `{:.2}` rendering in the report messages
fn round_2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Validation entry point
pub struct ValidationEngine {
    catalog: SpecCatalog,
    locale: Locale,
}

impl ValidationEngine {
    pub fn new(catalog: SpecCatalog) -> Self {
        Self {
            catalog,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Validate a submission.
    ///
    /// Unsupported trim/paper ids and unreadable PDFs are reported on their
    /// own, with no warnings, checks or summary. Otherwise every geometry
    /// check and advisory runs; the summary is only attached when no error
    /// was recorded.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationOutcome {
        let msg = self.locale;
        let mut outcome = ValidationOutcome::default();

        let trim = self.catalog.trim_size(&request.trim);
        let paper = self.catalog.paper_type(&request.paper_type);
        if trim.is_none() {
            outcome.errors.push(msg.unsupported_trim(&request.trim));
        }
        if paper.is_none() {
            outcome.errors.push(msg.unsupported_paper(&request.paper_type));
        }
        let (trim, paper) = match (trim, paper) {
            (Some(trim), Some(paper)) => (trim, paper),
            _ => return outcome,
        };

        if let Err(err) = &request.content_geometry {
            outcome.errors.push(msg.unreadable_content(err));
        }
        if let Err(err) = &request.cover_geometry {
            outcome.errors.push(msg.unreadable_cover(err));
        }
        let (content, cover) = match (&request.content_geometry, &request.cover_geometry) {
            (Ok(content), Ok(cover)) => (content, cover),
            _ => return outcome,
        };

        let pages = match request.declared_pages {
            Some(declared) if declared > 0 => declared,
            _ => content.page_count,
        };
        if pages != content.page_count {
            outcome
                .warnings
                .push(msg.page_count_mismatch(pages, content.page_count, pages));
        }

        let expected_content = ExpectedBox::content(trim, request.bleed_mm);
        debug!(
            "Expected content box {:.2}x{:.2}pt, actual {:.2}x{:.2}pt ({:.1}x{:.1}mm)",
            expected_content.width_pt,
            expected_content.height_pt,
            content.width_pt,
            content.height_pt,
            pt_to_mm(content.width_pt),
            pt_to_mm(content.height_pt)
        );
        if expected_content.matches(content) {
            outcome.checks.push(msg.content_ok());
        } else {
            outcome.errors.push(msg.content_mismatch(
                &expected_content.mismatch(content),
                &trim.id,
                request.bleed_mm,
            ));
        }

        if pages % 2 != 0 {
            outcome.warnings.push(msg.odd_page_count());
        }

        let spine = spine_mm(pages, paper);
        let expected_cover = ExpectedBox::cover(trim, request.bleed_mm, spine);
        debug!(
            "Spine {:.2}mm, expected cover box {:.2}x{:.2}pt, actual {:.2}x{:.2}pt",
            spine,
            expected_cover.width_pt,
            expected_cover.height_pt,
            cover.width_pt,
            cover.height_pt
        );

        if cover.page_count > 1 {
            outcome.warnings.push(msg.cover_page_count(cover.page_count));
        }

        if expected_cover.matches(cover) {
            outcome.checks.push(msg.cover_ok(spine));
        } else {
            outcome
                .errors
                .push(msg.cover_mismatch(&expected_cover.mismatch(cover), spine));
        }

        outcome.warnings.push(msg.export_reminder());
        outcome.warnings.push(msg.barcode_reminder());

        if outcome.errors.is_empty() {
            outcome.summary = Some(ValidationSummary {
                trim: trim.id.clone(),
                bleed_mm: request.bleed_mm,
                paper_type: paper.id.clone(),
                pages,
                spine_mm: round_2(spine),
            });
        }

        outcome
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(SpecCatalog::standard())
    }
}
