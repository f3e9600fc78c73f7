//! Shared PDF handling utilities
//!
//! This crate reduces uploaded PDF bytes to the page geometry the
//! preflight engine checks against the printer's production rules.

pub mod geometry;

pub use geometry::{extract_geometry, PageBox};
pub use shared_types::{GeometryError, PdfGeometry};
