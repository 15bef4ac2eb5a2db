//! Symbol encoding and rendering.
//!
//! This module turns validated request parameters into PNG images.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              RenderService              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  QrEncoder   │  │ BarcodeEncoder  │  │
//! │  │  (qrcode)    │  │ (barcoders,     │  │
//! │  │              │  │  code128)       │  │
//! │  └──────┬───────┘  └────────┬────────┘  │
//! │         └────────┬──────────┘           │
//! │                  ▼                      │
//! │        raster (canvas → PNG)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`RenderService`]: runs encoders off the async runtime with a deadline
//!   and a concurrency limit
//! - [`QrEncoder`]: QR symbols at error correction level H
//! - [`BarcodeEncoder`]: EAN/UPC family, GS1, Code 39, Code 128 and PZN
//! - [`BarcodeLayout`]: validated bar sizes, colours and caption settings
//!
//! # Example
//!
//! ```
//! use barcode_api::symbol::{BarcodeEncoder, BarcodeLayout, BarcodeType};
//!
//! let png = BarcodeEncoder::default()
//!     .encode(BarcodeType::Ean13, "123456789012", &BarcodeLayout::default())
//!     .unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

mod barcode;
mod code128;
mod color;
mod font;
mod qr;
mod raster;
mod service;

/// Default upper bound for either side of a rendered image, in pixels.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 10_000;

pub use barcode::{
    encode_symbol, gtin_check_digit, mm_to_px, pt_to_px, BarcodeEncoder, BarcodeLayout,
    BarcodeType, EncodedSymbol, DEFAULT_DPI, DEFAULT_FONT_SIZE_PT, DEFAULT_MODULE_HEIGHT_MM,
    DEFAULT_MODULE_WIDTH_MM, DEFAULT_QUIET_ZONE_MM, DEFAULT_TEXT_DISTANCE_MM,
};
pub use color::parse_color;
pub use qr::{QrEncoder, QrSpec, MAX_QR_VERSION, MIN_QR_VERSION};
pub use service::{
    RenderLimits, RenderService, DEFAULT_MAX_CONCURRENT_RENDERS, DEFAULT_REQUEST_TIMEOUT,
};
