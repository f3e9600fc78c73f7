//! Operator-facing messages
//!
//! Every string placed in a [`ValidationOutcome`](shared_types::ValidationOutcome)
//! is produced here so the report can be rendered in the operator's language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::GeometryError;

/// Language of the report strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    He,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "he" => Ok(Locale::He),
            other => Err(format!("Unsupported locale '{}'. Supported: en, he", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::He => write!(f, "he"),
        }
    }
}

/// Expected vs. actual size of a page, in points
#[derive(Debug, Clone, Copy)]
pub struct SizeMismatch {
    pub expected_w_pt: f64,
    pub expected_h_pt: f64,
    pub actual_w_pt: f64,
    pub actual_h_pt: f64,
}

impl Locale {
    pub fn unsupported_trim(self, trim: &str) -> String {
        match self {
            Locale::En => format!("Unsupported trim size: {}", trim),
            Locale::He => format!("גדל גזירה לא נתמך: {}", trim),
        }
    }

    pub fn unsupported_paper(self, paper_type: &str) -> String {
        match self {
            Locale::En => format!("Unsupported paper type: {}", paper_type),
            Locale::He => format!("סוג נייר לא נתמך: {}", paper_type),
        }
    }

    pub fn unreadable_content(self, err: &GeometryError) -> String {
        match self {
            Locale::En => format!("Failed to read content PDF: {}", err),
            Locale::He => format!("שגיאה בקריאת PDF התוכן: {}", self.geometry_error(err)),
        }
    }

    pub fn unreadable_cover(self, err: &GeometryError) -> String {
        match self {
            Locale::En => format!("Failed to read cover PDF: {}", err),
            Locale::He => format!("שגיאה בקריאת PDF הכריכה: {}", self.geometry_error(err)),
        }
    }

    fn geometry_error(self, err: &GeometryError) -> String {
        match (self, err) {
            (Locale::En, err) => err.to_string(),
            (Locale::He, GeometryError::Empty) => "ה-PDF ריק.".to_string(),
            (Locale::He, GeometryError::Malformed(detail)) => {
                format!("לא ניתן לפענח את הקובץ ({})", detail)
            }
            (Locale::He, GeometryError::MissingMediaBox) => {
                "לעמוד הראשון אין MediaBox".to_string()
            }
            (Locale::He, GeometryError::InvalidBox(detail)) => {
                format!("תיבת עמוד לא תקינה ({})", detail)
            }
        }
    }

    pub fn page_count_mismatch(self, declared: u32, in_pdf: u32, used: u32) -> String {
        match self {
            Locale::En => format!(
                "Declared page count ({}) differs from the page count in the PDF ({}). Calculated using {}.",
                declared, in_pdf, used
            ),
            Locale::He => format!(
                "מס' עמודים שסופק ({}) שונה ממספר העמודים ב-PDF ({}). נחשב לפי {}.",
                declared, in_pdf, used
            ),
        }
    }

    pub fn content_mismatch(self, size: &SizeMismatch, trim: &str, bleed_mm: f64) -> String {
        match self {
            Locale::En => format!(
                "Content page size does not match. Expected ~{:.0}×{:.0}pt (trim {} + bleed {} mm), actual {:.0}×{:.0}pt.",
                size.expected_w_pt, size.expected_h_pt, trim, bleed_mm, size.actual_w_pt, size.actual_h_pt
            ),
            Locale::He => format!(
                "ממד עמודי התוכן לא תואם. צפוי ~{:.0}×{:.0}pt (trim {} + bleed {} מ\"מ), בפועל {:.0}×{:.0}pt.",
                size.expected_w_pt, size.expected_h_pt, trim, bleed_mm, size.actual_w_pt, size.actual_h_pt
            ),
        }
    }

    pub fn content_ok(self) -> String {
        match self {
            Locale::En => "Content: page size matches the selected trim and bleed.".to_string(),
            Locale::He => "תוכן: המידות תואמות את ה-trim וה-bleed שנבחרו.".to_string(),
        }
    }

    pub fn odd_page_count(self) -> String {
        match self {
            Locale::En => {
                "An even page count is recommended (signatures and imposition).".to_string()
            }
            Locale::He => "מומלץ שמספר העמודים יהיה זוגי (שיקולי חתימות/עימוד).".to_string(),
        }
    }

    pub fn cover_page_count(self, pages: u32) -> String {
        match self {
            Locale::En => format!(
                "Cover: a single-page file is recommended (front+spine+back). Found {} pages.",
                pages
            ),
            Locale::He => format!(
                "כריכה: מומלץ קובץ בעמוד אחד (קדמי+שדרה+אחורי). זוהו {} עמודים.",
                pages
            ),
        }
    }

    pub fn cover_mismatch(self, size: &SizeMismatch, spine_mm: f64) -> String {
        match self {
            Locale::En => format!(
                "Cover: size does not match. Expected ~{:.0}×{:.0}pt (2×trim + spine({:.2} mm) + 2×bleed), actual {:.0}×{:.0}pt.",
                size.expected_w_pt, size.expected_h_pt, spine_mm, size.actual_w_pt, size.actual_h_pt
            ),
            Locale::He => format!(
                "כריכה: המידות אינן תואמות. צפוי ~{:.0}×{:.0}pt (2×trim + spine({:.2} מ\"מ) + 2×bleed), בפועל {:.0}×{:.0}pt.",
                size.expected_w_pt, size.expected_h_pt, spine_mm, size.actual_w_pt, size.actual_h_pt
            ),
        }
    }

    pub fn cover_ok(self, spine_mm: f64) -> String {
        match self {
            Locale::En => format!("Cover: size is correct. Computed spine ≈ {:.2} mm.", spine_mm),
            Locale::He => format!("כריכה: המידות תקינות. שדרה מחושבת ≈ {:.2} מ\"מ.", spine_mm),
        }
    }

    pub fn export_reminder(self) -> String {
        match self {
            Locale::En => "Export a flattened PDF with no layers and no crop marks, with all fonts embedded.".to_string(),
            Locale::He => "ודא/י ייצוא PDF 'שטוח' וללא שכבות, ללא סימני חיתוך, וכל הפונטים סגורים/מוטמעים.".to_string(),
        }
    }

    pub fn barcode_reminder(self) -> String {
        match self {
            Locale::En => "If the cover has interior printing, leave room for a 1.5×4 cm barcode on the inside-left.".to_string(),
            Locale::He => "אם יש הדפסה פנימית על הכריכה, השאר/י מקום לברקוד 1.5×4 ס\"מ בצד השמאלי הפנימי.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("HE".parse::<Locale>().unwrap(), Locale::He);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
        assert_eq!(Locale::He.to_string(), "he");
    }

    #[test]
    fn test_dimensions_round_to_whole_points() {
        let size = SizeMismatch {
            expected_w_pt: 436.535,
            expected_h_pt: 612.283,
            actual_w_pt: 430.0,
            actual_h_pt: 612.0,
        };
        let msg = Locale::En.content_mismatch(&size, "A5", 3.0);
        assert_eq!(
            msg,
            "Content page size does not match. Expected ~437×612pt (trim A5 + bleed 3 mm), actual 430×612pt."
        );
    }

    #[test]
    fn test_spine_shown_with_two_decimals() {
        assert_eq!(
            Locale::En.cover_ok(20.0),
            "Cover: size is correct. Computed spine ≈ 20.00 mm."
        );
        assert!(Locale::He.cover_ok(12.5).contains("12.50"));
    }

    #[test]
    fn test_hebrew_geometry_errors() {
        assert_eq!(
            Locale::He.unreadable_content(&GeometryError::Empty),
            "שגיאה בקריאת PDF התוכן: ה-PDF ריק."
        );
        assert_eq!(
            Locale::En.unreadable_cover(&GeometryError::Empty),
            "Failed to read cover PDF: the PDF is empty"
        );
    }
}
