use std::time::Duration;

use thiserror::Error;
use validator::ValidationErrors;

use crate::symbol::BarcodeType;

/// Client errors detected before any encoder runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The JSON body could not be deserialized into the request type
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// A field broke one of its declared constraints
    #[error("Field '{field}' {message}")]
    Constraint { field: String, message: String },

    /// The barcode type is not one of the supported symbologies
    #[error("Unsupported barcode type: '{value}'. Supported types: {supported}")]
    UnsupportedBarcodeType { value: String, supported: String },

    /// The filename cannot be carried in a Content-Disposition header
    #[error("Field 'filename' must not contain control characters, got {0:?}")]
    InvalidFilename(String),
}

impl ValidationError {
    /// The first failed constraint of a validator run, fields in name order.
    ///
    /// `prefix` is prepended to the field name so nested objects report
    /// paths like `options.dpi`.
    pub fn from_violations(errors: &ValidationErrors, prefix: &str) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .find_map(|(field, errs)| errs.first().map(|err| (field, err)))
            .map(|(field, err)| ValidationError::Constraint {
                field: format!("{}{}", prefix, field),
                message: describe_violation(err),
            })
            .unwrap_or_else(|| ValidationError::MalformedBody(errors.to_string()))
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        Self::from_violations(&errors, "")
    }
}

fn describe_violation(err: &validator::ValidationError) -> String {
    let param = |name: &str| err.params.get(name).map(param_text);

    match (err.code.as_ref(), param("min"), param("max"), param("value")) {
        ("range", Some(min), Some(max), Some(value)) => {
            format!("must be between {} and {}, got {}", min, max, value)
        }
        ("range", Some(min), None, Some(value)) => format!("must be at least {}, got {}", min, value),
        ("range", None, Some(max), Some(value)) => format!("must be at most {}, got {}", max, value),
        (code, ..) => match err.message {
            Some(ref message) => message.to_string(),
            None => format!("is invalid ({})", code),
        },
    }
}

fn param_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Errors returned by the QR and barcode encoders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Data violates the length, checksum or charset rules of the symbology
    #[error("{0}")]
    InvalidData(String),

    /// Data does not fit in any symbol the encoder may choose
    #[error("{0}")]
    Capacity(String),

    /// A colour specifier could not be parsed
    #[error("unknown color specifier: {0:?}")]
    Color(String),

    /// The rendered image would exceed the configured size limit
    #[error("rendered image would be {width}x{height} pixels, exceeding the {max} pixel limit")]
    ImageTooLarge { width: u64, height: u64, max: u32 },

    /// PNG encoding failed
    #[error("image encoding failed: {0}")]
    Image(String),
}

impl From<image::ImageError> for EncodeError {
    fn from(err: image::ImageError) -> Self {
        EncodeError::Image(err.to_string())
    }
}

impl From<barcoders::error::Error> for EncodeError {
    fn from(err: barcoders::error::Error) -> Self {
        EncodeError::InvalidData(err.to_string())
    }
}

/// Errors surfaced at the HTTP boundary.
///
/// Each variant maps to exactly one status code; see the `IntoResponse`
/// implementation in the server handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to generate QR Code: {0}")]
    Qr(EncodeError),

    #[error("Failed to generate barcode: {error}")]
    Barcode {
        barcode_type: BarcodeType,
        error: EncodeError,
    },

    /// All render permits are in use
    #[error("Server is busy rendering other images. Please retry.")]
    Busy,

    #[error("Image generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The blocking render task panicked or was cancelled
    #[error("Internal error: {0}")]
    Task(String),
}
