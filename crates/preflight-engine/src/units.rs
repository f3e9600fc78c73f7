//! Physical unit conversion

/// PDF user-space units per inch
pub const PT_PER_INCH: f64 = 72.0;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimetres to PDF points (1/72 inch)
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_INCH / MM_PER_INCH
}

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_INCH / PT_PER_INCH
}
