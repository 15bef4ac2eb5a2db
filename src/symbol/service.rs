//! Render service for orchestrating image generation.
//!
//! Encoding is CPU-bound, so every render runs on the blocking thread pool.
//! A semaphore bounds how many renders run at once and each render is given
//! a deadline.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RenderService                       │
//! │  1. Acquire permit (or fail fast: Busy)                  │
//! │  2. spawn_blocking(encoder)                              │
//! │  3. Await with timeout (Timeout)                         │
//! │           │                          │                   │
//! │           ▼                          ▼                   │
//! │    ┌─────────────┐          ┌────────────────┐           │
//! │    │  QrEncoder  │          │ BarcodeEncoder │           │
//! │    └─────────────┘          └────────────────┘           │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Semaphore;
use tracing::debug;

use super::barcode::{BarcodeEncoder, BarcodeLayout, BarcodeType};
use super::qr::{QrEncoder, QrSpec};
use super::DEFAULT_MAX_IMAGE_DIMENSION;
use crate::error::ApiError;

/// Default render deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of renders allowed at once.
pub const DEFAULT_MAX_CONCURRENT_RENDERS: usize = 64;

/// Resource limits applied to every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub request_timeout: Duration,
    pub max_concurrent_renders: usize,
    pub max_image_dimension: u32,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrent_renders: DEFAULT_MAX_CONCURRENT_RENDERS,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
        }
    }
}

/// Entry point for QR and barcode rendering.
pub struct RenderService {
    qr: QrEncoder,
    barcode: BarcodeEncoder,
    permits: Arc<Semaphore>,
    request_timeout: Duration,
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new(RenderLimits::default())
    }
}

impl RenderService {
    pub fn new(limits: RenderLimits) -> Self {
        Self {
            qr: QrEncoder::new(limits.max_image_dimension),
            barcode: BarcodeEncoder::new(limits.max_image_dimension),
            permits: Arc::new(Semaphore::new(limits.max_concurrent_renders)),
            request_timeout: limits.request_timeout,
        }
    }

    /// Number of renders that may start right now.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Render a QR code to PNG.
    pub async fn render_qr(&self, spec: QrSpec) -> Result<Bytes, ApiError> {
        let encoder = self.qr.clone();
        debug!(version = spec.version, box_size = spec.box_size, "Rendering QR code");
        self.run(move || encoder.encode(&spec))
            .await?
            .map_err(ApiError::Qr)
    }

    /// Render a barcode to PNG.
    pub async fn render_barcode(
        &self,
        barcode_type: BarcodeType,
        data: String,
        layout: BarcodeLayout,
    ) -> Result<Bytes, ApiError> {
        let encoder = self.barcode.clone();
        debug!(barcode_type = %barcode_type, "Rendering barcode");
        self.run(move || encoder.encode(barcode_type, &data, &layout))
            .await?
            .map_err(|error| ApiError::Barcode {
                barcode_type,
                error,
            })
    }

    async fn run<F, T>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| ApiError::Busy)?;

        // Held until the blocking task returns, even after a timeout.
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        });

        match tokio::time::timeout(self.request_timeout, handle).await {
            Err(_) => Err(ApiError::Timeout(self.request_timeout)),
            Ok(Err(join_err)) if join_err.is_panic() => {
                Err(ApiError::Task("render task panicked".to_string()))
            }
            Ok(Err(join_err)) => Err(ApiError::Task(format!(
                "render task failed: {}",
                join_err
            ))),
            Ok(Ok(value)) => Ok(value),
        }
    }
}
