//! QR code encoder.
//!
//! Symbols always use error correction level H. The requested version is a
//! lower bound: when the data does not fit, the smallest larger version that
//! holds it is used, up to version 40.

use bytes::Bytes;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

use super::color::parse_color;
use super::raster::{encode_png, render_matrix};
use super::DEFAULT_MAX_IMAGE_DIMENSION;
use crate::error::EncodeError;

/// Smallest QR version.
pub const MIN_QR_VERSION: i16 = 1;

/// Largest QR version.
pub const MAX_QR_VERSION: i16 = 40;

/// Validated parameters for one QR image.
#[derive(Debug, Clone)]
pub struct QrSpec {
    /// Payload to encode
    pub data: String,

    /// Colour of dark modules
    pub fill_color: String,

    /// Colour of light modules and the quiet zone
    pub back_color: String,

    /// Minimum symbol version (1-40)
    pub version: i16,

    /// Pixels per module
    pub box_size: u32,

    /// Quiet zone width in modules
    pub border: u32,
}

/// Renders QR symbols to PNG.
#[derive(Debug, Clone)]
pub struct QrEncoder {
    max_dimension: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_DIMENSION)
    }
}

impl QrEncoder {
    /// Create an encoder that refuses images wider than `max_dimension` pixels.
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Encode `spec` as a PNG image.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::Capacity`] when the data exceeds version 40-H capacity
    /// - [`EncodeError::Color`] when a colour cannot be parsed
    /// - [`EncodeError::ImageTooLarge`] when the image exceeds the size limit
    pub fn encode(&self, spec: &QrSpec) -> Result<Bytes, EncodeError> {
        let code = fit_symbol(spec.data.as_bytes(), spec.version)?;

        let fill = parse_color(&spec.fill_color)?;
        let back = parse_color(&spec.back_color)?;

        let width = code.width();
        let colors = code.to_colors();
        let canvas = render_matrix(
            width,
            |x, y| colors[y * width + x] == Color::Dark,
            spec.box_size,
            spec.border,
            fill,
            back,
            self.max_dimension,
        )?;

        encode_png(&canvas)
    }
}

/// Build the smallest symbol of at least `min_version` that holds `data`.
fn fit_symbol(data: &[u8], min_version: i16) -> Result<QrCode, EncodeError> {
    let to_error = |err: QrError| match err {
        QrError::DataTooLong => EncodeError::Capacity(format!(
            "{} for QR versions {}-{} at error correction level H",
            err, min_version, MAX_QR_VERSION
        )),
        other => EncodeError::InvalidData(other.to_string()),
    };

    let smallest = QrCode::with_error_correction_level(data, EcLevel::H).map_err(to_error)?;
    match smallest.version() {
        Version::Normal(v) if v < min_version => {
            QrCode::with_version(data, Version::Normal(min_version), EcLevel::H).map_err(to_error)
        }
        _ => Ok(smallest),
    }
}
