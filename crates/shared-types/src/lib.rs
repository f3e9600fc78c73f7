pub mod types;

pub use types::{GeometryError, PdfGeometry, ValidationOutcome, ValidationSummary};
