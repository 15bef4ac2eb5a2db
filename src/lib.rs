//! # Barcode API
//!
//! An HTTP service that renders QR codes and linear barcodes as PNG images.
//!
//! Clients POST a JSON description of the symbol and receive the image bytes
//! with a `Content-Disposition` header carrying the requested filename.
//!
//! ## Features
//!
//! - **QR codes**: error correction level H, automatic version growth, custom colours
//! - **Linear barcodes**: EAN-8, EAN-13, UPC-A, JAN, ISBN-10, ISBN-13, ISSN,
//!   GS1, Code 39, Code 128 and PZN, sized in millimetres at a chosen DPI,
//!   with an optional caption
//! - **Bounded rendering**: CPU work runs off the async runtime, with a
//!   concurrency limit, a per-request deadline and an image size guard
//!
//! ## Architecture
//!
//! - [`symbol`] - Encoders, rasterizer and the render service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`error`] - Error types and their HTTP mapping
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use barcode_api::{create_router, RenderService, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(RenderService::default(), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod symbol;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, EncodeError, ValidationError};
pub use server::{
    create_router, AppState, BarcodeOptions, BarcodeRequest, ErrorResponse, QrCodeRequest,
    RouterConfig,
};
pub use symbol::{
    BarcodeEncoder, BarcodeLayout, BarcodeType, QrEncoder, QrSpec, RenderLimits, RenderService,
};
