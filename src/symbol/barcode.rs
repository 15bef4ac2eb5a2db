//! Linear barcode encoder.
//!
//! EAN-13, EAN-8 and Code 39 bars come from `barcoders`; Code 128 comes from
//! [`super::code128`]. The GTIN family (UPC-A, JAN, ISBN, ISSN, GS1) is
//! normalised to EAN-13 here, and PZN to Code 39, before encoding.
//!
//! Layout sizes are given in millimetres and points at a resolution in dots
//! per inch, then converted to whole pixels before rasterising.

use std::fmt;
use std::str::FromStr;

use barcoders::sym::code39::Code39;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::ean8::EAN8;
use bytes::Bytes;

use super::code128;
use super::color::parse_color;
use super::raster::{encode_png, render_bars, BarStyle};
use super::DEFAULT_MAX_IMAGE_DIMENSION;
use crate::error::{EncodeError, ValidationError};

// =============================================================================
// Barcode Types
// =============================================================================

/// Supported symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeType {
    Ean8,
    Ean13,
    Upca,
    Jan,
    Isbn10,
    Isbn13,
    Issn,
    Code39,
    Code128,
    Pzn,
    Gs1,
}

impl BarcodeType {
    /// Every supported type, in the order reported to clients.
    pub const ALL: [BarcodeType; 11] = [
        BarcodeType::Ean8,
        BarcodeType::Ean13,
        BarcodeType::Upca,
        BarcodeType::Jan,
        BarcodeType::Isbn10,
        BarcodeType::Isbn13,
        BarcodeType::Issn,
        BarcodeType::Code39,
        BarcodeType::Code128,
        BarcodeType::Pzn,
        BarcodeType::Gs1,
    ];

    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            BarcodeType::Ean8 => "ean8",
            BarcodeType::Ean13 => "ean13",
            BarcodeType::Upca => "upca",
            BarcodeType::Jan => "jan",
            BarcodeType::Isbn10 => "isbn10",
            BarcodeType::Isbn13 => "isbn13",
            BarcodeType::Issn => "issn",
            BarcodeType::Code39 => "code39",
            BarcodeType::Code128 => "code128",
            BarcodeType::Pzn => "pzn",
            BarcodeType::Gs1 => "gs1",
        }
    }

    /// Comma-separated list of all wire names.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedBarcodeType {
                value: s.to_string(),
                supported: Self::supported_list(),
            })
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Default output resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Default module width in millimetres.
pub const DEFAULT_MODULE_WIDTH_MM: f64 = 0.2;

/// Default bar height in millimetres.
pub const DEFAULT_MODULE_HEIGHT_MM: f64 = 15.0;

/// Default quiet zone on each side in millimetres.
pub const DEFAULT_QUIET_ZONE_MM: f64 = 6.5;

/// Default gap between bars and caption in millimetres.
pub const DEFAULT_TEXT_DISTANCE_MM: f64 = 5.0;

/// Default caption size in points.
pub const DEFAULT_FONT_SIZE_PT: u32 = 10;

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres to whole pixels at `dpi`.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm * f64::from(dpi) / MM_PER_INCH).round() as u32
}

/// Points to whole pixels at `dpi`.
pub fn pt_to_px(pt: u32, dpi: u32) -> u32 {
    (f64::from(pt) * f64::from(dpi) / POINTS_PER_INCH).round() as u32
}

/// Validated rendering options for a barcode, with every size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeLayout {
    pub module_width: u32,
    pub module_height: u32,

    /// Blank margin on each side of the bars
    pub quiet_zone: u32,

    pub font_size: u32,
    pub text_distance: u32,
    pub foreground: String,
    pub background: String,

    /// Replaces the symbology's human-readable caption
    pub text: Option<String>,

    pub write_text: bool,
    pub center_text: bool,
}

impl Default for BarcodeLayout {
    fn default() -> Self {
        Self {
            module_width: mm_to_px(DEFAULT_MODULE_WIDTH_MM, DEFAULT_DPI).max(1),
            module_height: mm_to_px(DEFAULT_MODULE_HEIGHT_MM, DEFAULT_DPI).max(1),
            quiet_zone: mm_to_px(DEFAULT_QUIET_ZONE_MM, DEFAULT_DPI),
            font_size: pt_to_px(DEFAULT_FONT_SIZE_PT, DEFAULT_DPI),
            text_distance: mm_to_px(DEFAULT_TEXT_DISTANCE_MM, DEFAULT_DPI),
            foreground: "black".to_string(),
            background: "white".to_string(),
            text: None,
            write_text: true,
            center_text: true,
        }
    }
}

impl BarcodeLayout {
    fn style(&self, caption: String) -> Result<BarStyle, EncodeError> {
        let caption = if self.write_text {
            Some(self.text.clone().unwrap_or(caption))
        } else {
            None
        };

        Ok(BarStyle {
            module_width: self.module_width,
            module_height: self.module_height,
            quiet_zone: self.quiet_zone,
            font_size: self.font_size,
            text_distance: self.text_distance,
            foreground: parse_color(&self.foreground)?,
            background: parse_color(&self.background)?,
            caption,
            center_text: self.center_text,
        })
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Module row and caption produced for one barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    /// 1 = bar, 0 = space
    pub modules: Vec<u8>,

    /// Human-readable text, including computed check digits
    pub caption: String,
}

/// Renders linear barcodes to PNG.
#[derive(Debug, Clone)]
pub struct BarcodeEncoder {
    max_dimension: u32,
}

impl Default for BarcodeEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_DIMENSION)
    }
}

impl BarcodeEncoder {
    /// Create an encoder that refuses images larger than `max_dimension` pixels.
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Encode `data` as `barcode_type` and render it as a PNG image.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InvalidData`] when `data` breaks the symbology's rules
    /// - [`EncodeError::Color`] when a colour cannot be parsed
    /// - [`EncodeError::ImageTooLarge`] when the image exceeds the size limit
    pub fn encode(
        &self,
        barcode_type: BarcodeType,
        data: &str,
        layout: &BarcodeLayout,
    ) -> Result<Bytes, EncodeError> {
        let symbol = encode_symbol(barcode_type, data)?;
        let style = layout.style(symbol.caption)?;
        let canvas = render_bars(&symbol.modules, &style, self.max_dimension)?;
        encode_png(&canvas)
    }
}

/// Produce the module row for `data` in the given symbology.
pub fn encode_symbol(barcode_type: BarcodeType, data: &str) -> Result<EncodedSymbol, EncodeError> {
    match barcode_type {
        BarcodeType::Ean13 => ean13(&gtin_body(data, 12, "EAN-13")?),
        BarcodeType::Ean8 => ean8(&gtin_body(data, 7, "EAN-8")?),
        BarcodeType::Jan => {
            let body = gtin_body(data, 12, "JAN")?;
            let prefix: u32 = body[..3].parse().unwrap_or_default();
            if !(450..=459).contains(&prefix) && !(490..=499).contains(&prefix) {
                return Err(EncodeError::InvalidData(format!(
                    "JAN must start with 450-459 or 490-499, got {}",
                    &body[..3]
                )));
            }
            ean13(&body)
        }
        BarcodeType::Upca => {
            let body = gtin_body(data, 11, "UPC-A")?;
            let mut symbol = ean13(&format!("0{}", body))?;
            symbol.caption.remove(0);
            Ok(symbol)
        }
        // GS1 numbers are rendered as ISBN-13, matching the python-barcode alias
        BarcodeType::Isbn13 | BarcodeType::Gs1 => {
            let body = gtin_body(&data.replace('-', ""), 12, "ISBN-13")?;
            if !body.starts_with("978") && !body.starts_with("979") {
                return Err(EncodeError::InvalidData(
                    "ISBN-13 must start with 978 or 979".to_string(),
                ));
            }
            ean13(&body)
        }
        BarcodeType::Isbn10 => {
            let body = mod11_body(&data.replace('-', ""), 9, "ISBN-10", isbn10_check)?;
            ean13(&format!("978{}", body))
        }
        BarcodeType::Issn => {
            let body = mod11_body(&data.replace('-', ""), 7, "ISSN", issn_check)?;
            ean13(&format!("977{}00", body))
        }
        BarcodeType::Code39 => {
            let text = data.to_uppercase();
            if text.is_empty() {
                return Err(EncodeError::InvalidData(
                    "Code 39 data must not be empty".to_string(),
                ));
            }
            let modules = Code39::with_checksum(text.clone())?.encode();
            Ok(EncodedSymbol {
                modules,
                caption: text,
            })
        }
        BarcodeType::Pzn => {
            let body = digits_of_length(data, &[6, 7], "PZN")?;
            let check = pzn_check(&body[..6])?;
            if body.len() == 7 && body[6] != check {
                return Err(EncodeError::InvalidData(format!(
                    "PZN check digit should be {}",
                    check
                )));
            }
            let pzn: String = body[..6]
                .iter()
                .chain(std::iter::once(&check))
                .map(|d| char::from(b'0' + d))
                .collect();
            let modules = Code39::new(format!("PZN-{}", pzn))?.encode();
            Ok(EncodedSymbol {
                modules,
                caption: format!("PZN-{}", pzn),
            })
        }
        BarcodeType::Code128 => Ok(EncodedSymbol {
            modules: code128::encode(data)?,
            caption: data.to_string(),
        }),
    }
}

fn ean13(body: &str) -> Result<EncodedSymbol, EncodeError> {
    let modules = EAN13::new(body.to_string())?.encode();
    Ok(EncodedSymbol {
        modules,
        caption: with_check_digit(body),
    })
}

fn ean8(body: &str) -> Result<EncodedSymbol, EncodeError> {
    let modules = EAN8::new(body.to_string())?.encode();
    Ok(EncodedSymbol {
        modules,
        caption: with_check_digit(body),
    })
}

// =============================================================================
// Check Digits
// =============================================================================

/// GTIN mod-10 check digit: weights 3,1,3,... from the rightmost digit.
pub fn gtin_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn with_check_digit(body: &str) -> String {
    let digits: Vec<u8> = body.bytes().map(|b| b - b'0').collect();
    format!("{}{}", body, gtin_check_digit(&digits))
}

fn digits_of_length(data: &str, lengths: &[usize], name: &str) -> Result<Vec<u8>, EncodeError> {
    if let Some(bad) = data.chars().find(|c| !c.is_ascii_digit()) {
        return Err(EncodeError::InvalidData(format!(
            "{} accepts only digits, got {:?}",
            name, bad
        )));
    }
    if !lengths.contains(&data.len()) {
        let expected = lengths
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(EncodeError::InvalidData(format!(
            "{} must have {} digits, got {}",
            name,
            expected,
            data.len()
        )));
    }
    Ok(data.bytes().map(|b| b - b'0').collect())
}

/// Digits of a GTIN without its check digit, verifying it when present.
fn gtin_body(data: &str, body_len: usize, name: &str) -> Result<String, EncodeError> {
    let digits = digits_of_length(data, &[body_len, body_len + 1], name)?;
    let check = gtin_check_digit(&digits[..body_len]);
    if digits.len() > body_len && digits[body_len] != check {
        return Err(EncodeError::InvalidData(format!(
            "{} check digit should be {}, got {}",
            name, check, digits[body_len]
        )));
    }
    Ok(data[..body_len].to_string())
}

/// Body of a mod-11 code whose optional check character may be `X`.
fn mod11_body(
    data: &str,
    body_len: usize,
    name: &str,
    check: fn(&[u8]) -> u8,
) -> Result<String, EncodeError> {
    let (body, given) = if data.len() == body_len + 1 && data.is_char_boundary(body_len) {
        (&data[..body_len], data[body_len..].chars().next())
    } else {
        (data, None)
    };

    let digits = digits_of_length(body, &[body_len], name)?;
    if let Some(c) = given {
        let value = match c {
            'X' | 'x' => 10,
            '0'..='9' => c as u8 - b'0',
            other => {
                return Err(EncodeError::InvalidData(format!(
                    "{} check character must be a digit or X, got {:?}",
                    name, other
                )))
            }
        };
        let expected = check(&digits);
        if value != expected {
            return Err(EncodeError::InvalidData(format!(
                "{} check character should be {}",
                name,
                if expected == 10 {
                    'X'
                } else {
                    char::from(b'0' + expected)
                }
            )));
        }
    }
    Ok(body.to_string())
}

fn isbn10_check(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (10 - i as u32))
        .sum();
    ((11 - sum % 11) % 11) as u8
}

fn issn_check(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (8 - i as u32))
        .sum();
    ((11 - sum % 11) % 11) as u8
}

fn pzn_check(digits: &[u8]) -> Result<u8, EncodeError> {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (i as u32 + 2))
        .sum();
    match (sum % 11) as u8 {
        10 => Err(EncodeError::InvalidData(
            "PZN is not valid (check digit would be 10)".to_string(),
        )),
        check => Ok(check),
    }
}
