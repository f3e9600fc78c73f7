//! First-page geometry extraction
//!
//! Reads the page count and the first page's MediaBox. The MediaBox is
//! looked up on the page first and then inherited through the page tree.

use lopdf::{Dictionary, Document, Object, ObjectId};
use shared_types::{GeometryError, PdfGeometry};
use tracing::debug;

/// Parent links followed before giving up on an inherited attribute
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A PDF rectangle `[llx, lly, urx, ury]` in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PageBox {
    pub fn width(&self) -> f64 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ury - self.lly).abs()
    }
}

/// Reduce PDF bytes to first-page width/height and page count
pub fn extract_geometry(bytes: &[u8]) -> Result<PdfGeometry, GeometryError> {
    if bytes.is_empty() {
        return Err(GeometryError::Empty);
    }

    let doc = Document::load_mem(bytes).map_err(|e| GeometryError::Malformed(e.to_string()))?;

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;
    let first_page_id = match pages.values().next() {
        Some(id) => *id,
        None => return Err(GeometryError::Empty),
    };

    let media_box = first_page_media_box(&doc, first_page_id)?;
    let geometry = PdfGeometry {
        width_pt: media_box.width(),
        height_pt: media_box.height(),
        page_count,
    };

    debug!(
        "Extracted geometry: {:.2}x{:.2}pt, {} page(s)",
        geometry.width_pt, geometry.height_pt, geometry.page_count
    );

    Ok(geometry)
}

/// Find the MediaBox of a page, inheriting from ancestors if necessary
fn first_page_media_box(doc: &Document, page_id: ObjectId) -> Result<PageBox, GeometryError> {
    let mut dict = doc
        .get_dictionary(page_id)
        .map_err(|e| GeometryError::Malformed(format!("first page: {}", e)))?;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let array = resolve(doc, media_box)?
                .as_array()
                .map_err(|_| GeometryError::InvalidBox("MediaBox is not an array".into()))?;
            return parse_box_array(doc, array);
        }

        match parent_of(doc, dict) {
            Some(parent) => dict = parent,
            None => break,
        }
    }

    Err(GeometryError::MissingMediaBox)
}

fn parent_of<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent_id).ok()
}

/// Follow an indirect reference, if any
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, GeometryError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| GeometryError::Malformed(e.to_string())),
        other => Ok(other),
    }
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box_array(doc: &Document, array: &[Object]) -> Result<PageBox, GeometryError> {
    if array.len() != 4 {
        return Err(GeometryError::InvalidBox(format!(
            "MediaBox must have 4 elements, found {}",
            array.len()
        )));
    }

    let mut coords = [0.0f64; 4];
    for (i, obj) in array.iter().enumerate() {
        coords[i] = match resolve(doc, obj)? {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => {
                return Err(GeometryError::InvalidBox(format!(
                    "MediaBox element {} is not a number",
                    i
                )))
            }
        };
        if !coords[i].is_finite() {
            return Err(GeometryError::InvalidBox(format!(
                "MediaBox element {} is not finite",
                i
            )));
        }
    }

    Ok(PageBox {
        llx: coords[0],
        lly: coords[1],
        urx: coords[2],
        ury: coords[3],
    })
}
