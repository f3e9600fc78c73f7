//! Specification tables: trim sizes and paper stocks
//!
//! The catalog is plain configuration data. The engine only looks entries
//! up by id, so new trim sizes or papers never require engine changes.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Standard trim sizes: (id, width mm, height mm)
pub const STANDARD_TRIM_SIZES: &[(&str, f64, f64)] = &[
    ("A5", 148.0, 210.0),
    ("B5", 176.0, 250.0),
    ("A4", 210.0, 297.0),
];

/// Standard paper stocks: (id, display name, thickness mm per page)
pub const STANDARD_PAPER_TYPES: &[(&str, &str, f64)] = &[
    ("woodfree-white-70", "Woodfree white 70g", 0.09),
    ("woodfree-white-80", "Woodfree white 80g", 0.10),
    ("woodfree-white-90", "Woodfree white 90g", 0.13),
    ("woodfree-white-110", "Woodfree white 110g", 0.15),
    ("woodfree-cream-70", "Woodfree cream 70g", 0.09),
    ("woodfree-cream-80", "Woodfree cream 80g", 0.10),
    ("woodfree-cream-90", "Woodfree cream 90g", 0.13),
    ("woodfree-cream-110", "Woodfree cream 110g", 0.15),
    ("matte-coated-105", "Matte coated 105g", 0.10),
    ("matte-coated-115", "Matte coated 115g", 0.11),
    ("matte-coated-130", "Matte coated 130g", 0.125),
    ("matte-coated-170", "Matte coated 170g", 0.16),
];

/// Final cut size of a printed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimSize {
    pub id: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Paper stock and the spine thickness each page contributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub thickness_mm: f64,
}

/// Immutable trim-size and paper-type tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecCatalog {
    trim_sizes: Vec<TrimSize>,
    paper_types: Vec<PaperType>,
}

/// On-disk catalog layout, validated before becoming a [`SpecCatalog`]
#[derive(Deserialize)]
struct CatalogFile {
    trim_sizes: Vec<TrimSize>,
    paper_types: Vec<PaperType>,
}

impl SpecCatalog {
    /// Build a catalog, rejecting empty tables, duplicate ids and
    /// non-positive measurements
    pub fn new(trim_sizes: Vec<TrimSize>, paper_types: Vec<PaperType>) -> Result<Self, CatalogError> {
        if trim_sizes.is_empty() {
            return Err(CatalogError::EmptyTable("trim sizes"));
        }
        if paper_types.is_empty() {
            return Err(CatalogError::EmptyTable("paper types"));
        }

        let mut seen = HashSet::new();
        for trim in &trim_sizes {
            if !seen.insert(trim.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    table: "trim size",
                    id: trim.id.clone(),
                });
            }
            check_positive("trim size", &trim.id, "width_mm", trim.width_mm)?;
            check_positive("trim size", &trim.id, "height_mm", trim.height_mm)?;
        }

        seen.clear();
        for paper in &paper_types {
            if !seen.insert(paper.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    table: "paper type",
                    id: paper.id.clone(),
                });
            }
            check_positive("paper type", &paper.id, "thickness_mm", paper.thickness_mm)?;
        }

        Ok(Self {
            trim_sizes,
            paper_types,
        })
    }

    /// The built-in tables
    pub fn standard() -> Self {
        Self {
            trim_sizes: STANDARD_TRIM_SIZES
                .iter()
                .map(|(id, width_mm, height_mm)| TrimSize {
                    id: id.to_string(),
                    width_mm: *width_mm,
                    height_mm: *height_mm,
                })
                .collect(),
            paper_types: STANDARD_PAPER_TYPES
                .iter()
                .map(|(id, name, thickness_mm)| PaperType {
                    id: id.to_string(),
                    name: name.to_string(),
                    thickness_mm: *thickness_mm,
                })
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.trim_sizes, file.paper_types)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn trim_size(&self, id: &str) -> Option<&TrimSize> {
        self.trim_sizes.iter().find(|t| t.id == id)
    }

    pub fn paper_type(&self, id: &str) -> Option<&PaperType> {
        self.paper_types.iter().find(|p| p.id == id)
    }

    /// Trim sizes in declaration order
    pub fn trim_sizes(&self) -> &[TrimSize] {
        &self.trim_sizes
    }

    /// Paper types in declaration order
    pub fn paper_types(&self) -> &[PaperType] {
        &self.paper_types
    }
}

impl Default for SpecCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_positive(table: &'static str, id: &str, field: &str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidEntry {
            table,
            id: id.to_string(),
            reason: format!("{} must be a positive number (found {})", field, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_trim_lookup() {
        let catalog = SpecCatalog::standard();
        let a5 = catalog.trim_size("A5").unwrap();
        assert_eq!((a5.width_mm, a5.height_mm), (148.0, 210.0));
        assert!(catalog.trim_size("X9").is_none());
        // ids are case sensitive
        assert!(catalog.trim_size("a5").is_none());
    }

    #[test]
    fn test_standard_paper_lookup() {
        let catalog = SpecCatalog::standard();
        assert_eq!(
            catalog.paper_type("matte-coated-130").unwrap().thickness_mm,
            0.125
        );
        assert!(catalog.paper_type("newsprint").is_none());
    }

    #[test]
    fn test_listing_keeps_declaration_order() {
        let catalog = SpecCatalog::standard();
        let ids: Vec<&str> = catalog.trim_sizes().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A5", "B5", "A4"]);
        assert_eq!(catalog.paper_types().len(), 12);
        assert_eq!(catalog.paper_types()[0].id, "woodfree-white-70");
    }

    #[test]
    fn test_standard_tables_pass_validation() {
        let standard = SpecCatalog::standard();
        let rebuilt = SpecCatalog::new(
            standard.trim_sizes().to_vec(),
            standard.paper_types().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, standard);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "trim_sizes": [{"id": "US-Trade", "width_mm": 152.4, "height_mm": 228.6}],
            "paper_types": [{"id": "bulky-60", "thickness_mm": 0.12}]
        }"#;
        let catalog = SpecCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.trim_size("US-Trade").unwrap().width_mm, 152.4);
        assert_eq!(catalog.paper_type("bulky-60").unwrap().name, "");
        assert!(catalog.trim_size("A5").is_none());
    }

    #[test]
    fn test_shipped_catalog_matches_standard() {
        let json = include_str!("../../../config/catalog.json");
        assert_eq!(SpecCatalog::from_json_str(json).unwrap(), SpecCatalog::standard());
    }

    #[test]
    fn test_rejects_empty_tables() {
        let json = r#"{"trim_sizes": [], "paper_types": [{"id": "p", "thickness_mm": 0.1}]}"#;
        assert!(matches!(
            SpecCatalog::from_json_str(json),
            Err(CatalogError::EmptyTable("trim sizes"))
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let trims = vec![
            TrimSize {
                id: "A5".into(),
                width_mm: 148.0,
                height_mm: 210.0,
            },
            TrimSize {
                id: "A5".into(),
                width_mm: 150.0,
                height_mm: 210.0,
            },
        ];
        let papers = SpecCatalog::standard().paper_types().to_vec();
        let err = SpecCatalog::new(trims, papers).unwrap_err();
        assert_eq!(err.to_string(), "duplicate trim size id 'A5'");
    }

    #[test]
    fn test_rejects_non_positive_thickness() {
        let trims = SpecCatalog::standard().trim_sizes().to_vec();
        let papers = vec![PaperType {
            id: "ghost".into(),
            name: String::new(),
            thickness_mm: 0.0,
        }];
        assert!(matches!(
            SpecCatalog::new(trims, papers),
            Err(CatalogError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SpecCatalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SpecCatalog::from_json_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
