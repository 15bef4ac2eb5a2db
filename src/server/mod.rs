//! HTTP server layer for the barcode API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /generate-qr        POST /generate-barcode          │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  extract    │  │  requests   │  │       handlers          │  │
//! │  │ (JSON body) │─▶│ (validate)  │─▶│ (render, PNG response)  │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! │                        routes (router config)                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod extract;
pub mod handlers;
pub mod requests;
pub mod routes;

pub use extract::ApiJson;
pub use handlers::{
    generate_barcode_handler, generate_qr_handler, health_handler, image_response, root_handler,
    AppState, ErrorResponse, HealthResponse, RootResponse,
};
pub use requests::{BarcodeJob, BarcodeOptions, BarcodeRequest, QrCodeRequest, QrJob};
pub use routes::{create_router, RouterConfig};
