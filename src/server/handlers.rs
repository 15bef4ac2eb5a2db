//! HTTP request handlers for the barcode API.
//!
//! # Endpoints
//!
//! - `GET /` - Service description
//! - `GET /health` - Health check endpoint
//! - `POST /generate-qr` - Render a QR code as PNG
//! - `POST /generate-barcode` - Render a linear barcode as PNG

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{ApiError, EncodeError, ValidationError};
use crate::symbol::RenderService;

use super::extract::ApiJson;
use super::requests::{BarcodeRequest, QrCodeRequest};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the render service.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub render_service: Arc<RenderService>,
}

impl AppState {
    pub fn new(render_service: RenderService) -> Self {
        Self {
            render_service: Arc::new(render_service),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,

    /// Error kind (e.g., "invalid_request", "invalid_data")
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Service description returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,

    /// Path to "METHOD - description"
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ApiError to HTTP response.
///
/// - 4xx errors are logged at WARN level (client errors)
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),

            ApiError::Qr(EncodeError::ImageTooLarge { .. })
            | ApiError::Barcode {
                error: EncodeError::ImageTooLarge { .. },
                ..
            } => (StatusCode::BAD_REQUEST, "invalid_request"),

            ApiError::Barcode {
                error: EncodeError::InvalidData(_),
                ..
            } => (StatusCode::BAD_REQUEST, "invalid_data"),

            ApiError::Qr(_) | ApiError::Barcode { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "encoding_error")
            }

            ApiError::Busy => (StatusCode::SERVICE_UNAVAILABLE, "busy"),
            ApiError::Timeout(_) => (StatusCode::SERVICE_UNAVAILABLE, "timeout"),
            ApiError::Task(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = match &self {
            ApiError::Barcode {
                barcode_type,
                error: EncodeError::InvalidData(cause),
            } => format!(
                "Invalid data for barcode type '{}': {}. Please check data format and length.",
                barcode_type, cause
            ),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        (status, Json(ErrorResponse::new(error_type, message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle the root request.
///
/// # Endpoint
///
/// `GET /`
///
/// # Response
///
/// `200 OK` with a fixed JSON document naming the service and its endpoints.
pub async fn root_handler() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("/generate-qr", "POST - Generate a QR Code"),
        ("/generate-barcode", "POST - Generate a Barcode"),
        ("/health", "GET - Health check"),
    ]);

    Json(RootResponse {
        message: "Welcome to the Barcode/QR Code Generator API!",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle QR code requests.
///
/// # Endpoint
///
/// `POST /generate-qr`
///
/// # Response
///
/// - `200 OK`: PNG image with `Content-Disposition: inline; filename="..."`
/// - `400 Bad Request`: Malformed body or out-of-range parameter
/// - `500 Internal Server Error`: Data too long for a QR symbol, bad colour
/// - `503 Service Unavailable`: Too many concurrent renders, or timeout
pub async fn generate_qr_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QrCodeRequest>,
) -> Result<Response, ApiError> {
    let job = request.into_job()?;

    let png = state.render_service.render_qr(job.spec).await?;
    info!(filename = %job.filename, bytes = png.len(), "Generated QR code");

    image_response(png, &job.filename)
}

/// Handle barcode requests.
///
/// # Endpoint
///
/// `POST /generate-barcode`
///
/// # Response
///
/// - `200 OK`: PNG image with `Content-Disposition: inline; filename="..."`
/// - `400 Bad Request`: Unsupported type, invalid data, bad option
/// - `500 Internal Server Error`: Rendering failed
/// - `503 Service Unavailable`: Too many concurrent renders, or timeout
pub async fn generate_barcode_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BarcodeRequest>,
) -> Result<Response, ApiError> {
    let job = request.into_job()?;

    let png = state
        .render_service
        .render_barcode(job.barcode_type, job.data, job.layout)
        .await?;
    info!(
        barcode_type = %job.barcode_type,
        filename = %job.filename,
        bytes = png.len(),
        "Generated barcode"
    );

    image_response(png, &job.filename)
}

/// Build the `200 OK` PNG response.
///
/// The filename is placed in the header as given.
pub fn image_response(png: Bytes, filename: &str) -> Result<Response, ApiError> {
    let disposition =
        HeaderValue::from_bytes(format!("inline; filename=\"{}\"", filename).as_bytes())
            .map_err(|_| ValidationError::InvalidFilename(filename.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    )
        .into_response())
}
