//! API handlers for the preflight server
//!
//! Provides REST endpoints for:
//! - Listing the supported trim sizes and paper stocks
//! - Validating an uploaded content/cover PDF pair

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use preflight_engine::{PaperType, TrimSize, ValidationRequest, DIMENSION_TOLERANCE_PT};
use shared_pdf::extract_geometry;
use shared_types::{GeometryError, PdfGeometry, ValidationOutcome};

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "preflight-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Supported specifications response
#[derive(Serialize)]
pub struct SpecsResponse {
    pub success: bool,
    pub trim_sizes: Vec<TrimSize>,
    pub paper_types: Vec<PaperType>,
    pub tolerance_pt: f64,
}

/// Handler: GET /api/specs
pub async fn handle_list_specs(State(state): State<AppState>) -> Json<SpecsResponse> {
    let catalog = state.engine.catalog();

    Json(SpecsResponse {
        success: true,
        trim_sizes: catalog.trim_sizes().to_vec(),
        paper_types: catalog.paper_types().to_vec(),
        tolerance_pt: DIMENSION_TOLERANCE_PT,
    })
}

/// Validation response: the outcome plus an overall verdict
#[derive(Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub passed: bool,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// Fields of the `POST /api/validate` multipart form
#[derive(Debug, Default)]
struct ValidateForm {
    content_pdf: Option<Bytes>,
    cover_pdf: Option<Bytes>,
    trim: Option<String>,
    bleed_mm: Option<String>,
    paper_type: Option<String>,
    content_pages: Option<String>,
}

impl ValidateForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, ServerError> {
        let mut form = ValidateForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "content_pdf" => form.content_pdf = Some(field.bytes().await?),
                "cover_pdf" => form.cover_pdf = Some(field.bytes().await?),
                "trim" => form.trim = Some(field.text().await?),
                "bleed_mm" => form.bleed_mm = Some(field.text().await?),
                "paper_type" => form.paper_type = Some(field.text().await?),
                "content_pages" => form.content_pages = Some(field.text().await?),
                other => debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| ServerError::InvalidRequest(format!("Missing form field '{}'", field)))
}

/// Parse the bleed margin; must be a finite, non-negative number of mm
fn parse_bleed(raw: &str) -> Result<f64, ServerError> {
    let bleed: f64 = raw.trim().parse().map_err(|_| {
        ServerError::InvalidRequest(format!("Invalid bleed_mm '{}': expected a number", raw))
    })?;

    if !bleed.is_finite() || bleed < 0.0 {
        return Err(ServerError::InvalidRequest(format!(
            "Invalid bleed_mm '{}': must be zero or positive",
            raw
        )));
    }

    Ok(bleed)
}

/// Parse the optional declared page count. Blank, zero and negative values
/// mean "use the PDF's page count".
pub(crate) fn parse_declared_pages(raw: Option<&str>) -> Result<Option<u32>, ServerError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let pages: i64 = raw.parse().map_err(|_| {
        ServerError::InvalidRequest(format!(
            "Invalid content_pages '{}': expected a whole number",
            raw
        ))
    })?;

    if pages <= 0 {
        return Ok(None);
    }

    u32::try_from(pages).map(Some).map_err(|_| {
        ServerError::InvalidRequest(format!("Invalid content_pages '{}': too large", raw))
    })
}

/// Extract both documents concurrently on the blocking pool
async fn extract_pair(
    content: Bytes,
    cover: Bytes,
    timeout_ms: u64,
) -> Result<
    (
        Result<PdfGeometry, GeometryError>,
        Result<PdfGeometry, GeometryError>,
    ),
    ServerError,
> {
    let content_task = tokio::task::spawn_blocking(move || extract_geometry(&content));
    let cover_task = tokio::task::spawn_blocking(move || extract_geometry(&cover));

    let (content, cover) = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        tokio::join!(content_task, cover_task)
    })
    .await
    .map_err(|_| {
        // spawn_blocking tasks cannot be cancelled; the parses run to completion
        warn!(
            "PDF extraction exceeded {}ms; abandoning request while parsing finishes in the background",
            timeout_ms
        );
        ServerError::Timeout(timeout_ms)
    })?;

    // a panicking parser is reported like any other unreadable file
    let content = content.unwrap_or_else(|e| Err(GeometryError::Malformed(e.to_string())));
    let cover = cover.unwrap_or_else(|e| Err(GeometryError::Malformed(e.to_string())));

    for (label, result) in [("content", &content), ("cover", &cover)] {
        if let Err(err) = result {
            warn!("Could not read {} PDF: {}", label, err);
        }
    }

    Ok((content, cover))
}

/// Handler: POST /api/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ValidateResponse>, ServerError> {
    let form = ValidateForm::read(&mut multipart).await?;

    let content_pdf = required(form.content_pdf, "content_pdf")?;
    let cover_pdf = required(form.cover_pdf, "cover_pdf")?;
    let trim = required(form.trim, "trim")?.trim().to_string();
    let paper_type = required(form.paper_type, "paper_type")?.trim().to_string();
    let bleed_mm = parse_bleed(&required(form.bleed_mm, "bleed_mm")?)?;
    let declared_pages = parse_declared_pages(form.content_pages.as_deref())?;

    info!(
        "Validate request: trim={}, bleed={}mm, paper={}, declared_pages={:?}, content={}B, cover={}B",
        trim,
        bleed_mm,
        paper_type,
        declared_pages,
        content_pdf.len(),
        cover_pdf.len()
    );

    let (content_geometry, cover_geometry) =
        extract_pair(content_pdf, cover_pdf, state.timeout_ms).await?;

    let request = ValidationRequest {
        trim,
        bleed_mm,
        paper_type,
        declared_pages,
        content_geometry,
        cover_geometry,
    };
    let outcome = state.engine.validate(&request);

    info!(
        "Validation finished: {} error(s), {} warning(s), {} check(s)",
        outcome.errors.len(),
        outcome.warnings.len(),
        outcome.checks.len()
    );

    Ok(Json(ValidateResponse {
        success: true,
        passed: outcome.passed(),
        outcome,
    }))
}
