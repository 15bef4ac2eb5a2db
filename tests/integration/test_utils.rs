//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use image::RgbaImage;
use tower::ServiceExt;

use barcode_api::{create_router, RenderLimits, RenderService, RouterConfig};

/// Router with default limits and tracing off.
pub fn test_router() -> Router {
    router_with_limits(RenderLimits::default())
}

pub fn router_with_limits(limits: RenderLimits) -> Router {
    create_router(
        RenderService::new(limits),
        RouterConfig::new().with_tracing(false),
    )
}

/// Status, headers and body of a finished response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .expect("header should be present")
            .to_str()
            .expect("header should be visible ASCII")
    }
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

pub async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> TestResponse {
    post_raw(router, uri, body.to_string()).await
}

pub async fn post_raw(router: Router, uri: &str, body: impl Into<Body>) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(router, request).await
}

pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(b"\x89PNG\r\n\x1a\n")
}

pub fn decode_png(data: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .expect("body should be a PNG")
        .to_rgba8()
}

/// Decode the single QR code in a PNG.
pub fn decode_qr(data: &[u8]) -> String {
    let luma = image::load_from_memory(data).unwrap().to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_meta, content) = grids[0].decode().expect("QR code should decode");
    content
}

/// Read the module row back from a captionless barcode image.
///
/// Samples the centre of each module on the top pixel row. Sizes are in
/// pixels.
pub fn read_modules(img: &RgbaImage, module_width: u32, quiet_zone: u32) -> Vec<u8> {
    let modules = (img.width() - 2 * quiet_zone) / module_width;
    (0..modules)
        .map(|i| {
            let x = quiet_zone + i * module_width + module_width / 2;
            let pixel = img.get_pixel(x, 0).0;
            u8::from(pixel[0] < 128)
        })
        .collect()
}
