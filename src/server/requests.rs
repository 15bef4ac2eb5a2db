//! Request bodies and their validation.
//!
//! Each wire type deserializes leniently (defaults for every optional field),
//! declares its constraints with `validator`, and is then turned into the
//! typed job the render service consumes. Nothing reaches an encoder before
//! validation succeeds.

use std::borrow::Cow;

use serde::Deserialize;
use validator::Validate;

use crate::error::ValidationError;
use crate::symbol::{
    mm_to_px, pt_to_px, BarcodeLayout, BarcodeType, QrSpec, DEFAULT_DPI, DEFAULT_FONT_SIZE_PT,
    DEFAULT_MODULE_HEIGHT_MM, DEFAULT_MODULE_WIDTH_MM, DEFAULT_QUIET_ZONE_MM,
    DEFAULT_TEXT_DISTANCE_MM,
};

// =============================================================================
// QR Code Request
// =============================================================================

/// JSON body of `POST /generate-qr`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QrCodeRequest {
    /// Payload to encode (required, non-empty)
    #[validate(length(min = 1, message = "must not be empty"))]
    pub data: String,

    /// Filename suggested to the client
    #[serde(default = "default_qr_filename")]
    #[validate(custom(function = "check_filename"))]
    pub filename: String,

    /// Colour of the dark modules
    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    /// Background colour
    #[serde(default = "default_back_color")]
    pub back_color: String,

    /// Minimum QR version (1-40)
    #[serde(default = "default_version")]
    #[validate(range(min = 1, max = 40))]
    pub version: i64,

    /// Pixels per module
    #[serde(default = "default_box_size")]
    #[validate(range(min = 1, max = 65535))]
    pub box_size: i64,

    /// Quiet zone width in modules
    #[serde(default = "default_border")]
    #[validate(range(min = 0, max = 65535))]
    pub border: i64,
}

fn default_qr_filename() -> String {
    "qrcode.png".to_string()
}

fn default_fill_color() -> String {
    "black".to_string()
}

fn default_back_color() -> String {
    "white".to_string()
}

fn default_version() -> i64 {
    1
}

fn default_box_size() -> i64 {
    10
}

fn default_border() -> i64 {
    4
}

/// A validated QR request.
#[derive(Debug, Clone)]
pub struct QrJob {
    pub filename: String,
    pub spec: QrSpec,
}

impl QrCodeRequest {
    /// Check declared constraints and build the encoder parameters.
    pub fn into_job(self) -> Result<QrJob, ValidationError> {
        self.validate()?;

        // Ranges above keep these casts lossless
        Ok(QrJob {
            filename: self.filename,
            spec: QrSpec {
                data: self.data,
                fill_color: self.fill_color,
                back_color: self.back_color,
                version: self.version as i16,
                box_size: self.box_size as u32,
                border: self.border as u32,
            },
        })
    }
}

// =============================================================================
// Barcode Request
// =============================================================================

/// JSON body of `POST /generate-barcode`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BarcodeRequest {
    /// Symbology name, e.g. "ean13"
    pub barcode_type: String,

    /// Payload; its format depends on the symbology
    pub data: String,

    /// Filename suggested to the client
    #[serde(default = "default_barcode_filename")]
    #[validate(custom(function = "check_filename"))]
    pub filename: String,

    /// Rendering options
    #[serde(default)]
    pub options: Option<BarcodeOptions>,
}

fn default_barcode_filename() -> String {
    "barcode.png".to_string()
}

/// Rendering options accepted under `options`.
///
/// Sizes are physical, as for a printed label: millimetres and points at
/// `dpi` dots per inch. Keys outside this set are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BarcodeOptions {
    /// Width of one module in millimetres (default 0.2)
    #[validate(range(min = 0.01, max = 10.0))]
    pub module_width: Option<f64>,

    /// Bar height in millimetres (default 15.0)
    #[validate(range(min = 0.1, max = 500.0))]
    pub module_height: Option<f64>,

    /// Blank margin on each side in millimetres (default 6.5)
    #[validate(range(min = 0.0, max = 100.0))]
    pub quiet_zone: Option<f64>,

    /// Caption size in points (default 10)
    #[validate(range(min = 1, max = 100))]
    pub font_size: Option<u32>,

    /// Gap between bars and caption in millimetres (default 5.0)
    #[validate(range(min = 0.0, max = 100.0))]
    pub text_distance: Option<f64>,

    /// Output resolution in dots per inch (default 300)
    #[validate(range(min = 72, max = 1200))]
    pub dpi: Option<u32>,

    pub foreground: Option<String>,
    pub background: Option<String>,

    /// Caption text replacing the symbology's human-readable code
    pub text: Option<String>,

    /// Draw the caption (default: true)
    pub write_text: Option<bool>,

    /// Centre the caption (default: true)
    pub center_text: Option<bool>,
}

impl BarcodeOptions {
    /// Check ranges, fill in defaults and convert sizes to pixels.
    pub fn into_layout(self) -> Result<BarcodeLayout, ValidationError> {
        self.validate()
            .map_err(|errors| ValidationError::from_violations(&errors, "options."))?;

        let defaults = BarcodeLayout::default();
        let dpi = self.dpi.unwrap_or(DEFAULT_DPI);
        let mm = |value: Option<f64>, default: f64| mm_to_px(value.unwrap_or(default), dpi);

        Ok(BarcodeLayout {
            module_width: mm(self.module_width, DEFAULT_MODULE_WIDTH_MM).max(1),
            module_height: mm(self.module_height, DEFAULT_MODULE_HEIGHT_MM).max(1),
            quiet_zone: mm(self.quiet_zone, DEFAULT_QUIET_ZONE_MM),
            font_size: pt_to_px(self.font_size.unwrap_or(DEFAULT_FONT_SIZE_PT), dpi),
            text_distance: mm(self.text_distance, DEFAULT_TEXT_DISTANCE_MM),
            foreground: self.foreground.unwrap_or(defaults.foreground),
            background: self.background.unwrap_or(defaults.background),
            text: self.text,
            write_text: self.write_text.unwrap_or(defaults.write_text),
            center_text: self.center_text.unwrap_or(defaults.center_text),
        })
    }
}

/// A validated barcode request.
#[derive(Debug, Clone)]
pub struct BarcodeJob {
    pub filename: String,
    pub barcode_type: BarcodeType,
    pub data: String,
    pub layout: BarcodeLayout,
}

impl BarcodeRequest {
    /// Check the barcode type and options. Data rules are left to the encoder.
    pub fn into_job(self) -> Result<BarcodeJob, ValidationError> {
        let barcode_type: BarcodeType = self.barcode_type.parse()?;
        self.validate()?;
        let layout = self.options.unwrap_or_default().into_layout()?;

        Ok(BarcodeJob {
            filename: self.filename,
            barcode_type,
            data: self.data,
            layout,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn check_filename(filename: &str) -> Result<(), validator::ValidationError> {
    if filename.chars().any(char::is_control) {
        return Err(
            validator::ValidationError::new("control_characters").with_message(Cow::Owned(
                format!("must not contain control characters, got {:?}", filename),
            )),
        );
    }
    Ok(())
}
