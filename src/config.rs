//! Configuration management for the barcode API.
//!
//! Settings come from command-line arguments via clap, fall back to
//! environment variables with the `BARCODE_API_` prefix, and otherwise take
//! the defaults below.
//!
//! # Environment Variables
//!
//! - `BARCODE_API_HOST` - Server bind address (default: 0.0.0.0)
//! - `BARCODE_API_PORT` - Server port (default: 8000)
//! - `BARCODE_API_REQUEST_TIMEOUT_SECS` - Render deadline (default: 30)
//! - `BARCODE_API_MAX_CONCURRENT_RENDERS` - Concurrent render limit (default: 64)
//! - `BARCODE_API_MAX_IMAGE_DIMENSION` - Largest image side in pixels (default: 10000)
//! - `BARCODE_API_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::time::Duration;

use clap::Parser;

use crate::symbol::{
    RenderLimits, DEFAULT_MAX_CONCURRENT_RENDERS, DEFAULT_MAX_IMAGE_DIMENSION,
    DEFAULT_REQUEST_TIMEOUT,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// PNG dimensions are stored as u32 but decoders commonly cap at u16.
const MAX_IMAGE_DIMENSION_LIMIT: u32 = 65_535;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Barcode API - Generates QR codes and barcodes as PNG images over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "barcode-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BARCODE_API_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BARCODE_API_PORT")]
    pub port: u16,

    // =========================================================================
    // Render Limits
    // =========================================================================
    /// Seconds a single render may take before the request fails with 503.
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        env = "BARCODE_API_REQUEST_TIMEOUT_SECS"
    )]
    pub request_timeout_secs: u64,

    /// Number of renders allowed to run at once; further requests get 503.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONCURRENT_RENDERS,
        env = "BARCODE_API_MAX_CONCURRENT_RENDERS"
    )]
    pub max_concurrent_renders: usize,

    /// Largest width or height of a rendered image, in pixels.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_IMAGE_DIMENSION,
        env = "BARCODE_API_MAX_IMAGE_DIMENSION"
    )]
    pub max_image_dimension: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "BARCODE_API_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }

        if self.max_concurrent_renders == 0 {
            return Err("max_concurrent_renders must be greater than 0".to_string());
        }

        if self.max_image_dimension == 0 || self.max_image_dimension > MAX_IMAGE_DIMENSION_LIMIT {
            return Err(format!(
                "max_image_dimension must be between 1 and {}",
                MAX_IMAGE_DIMENSION_LIMIT
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Render limits for the [`RenderService`](crate::symbol::RenderService).
    pub fn render_limits(&self) -> RenderLimits {
        RenderLimits {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_concurrent_renders: self.max_concurrent_renders,
            max_image_dimension: self.max_image_dimension,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
