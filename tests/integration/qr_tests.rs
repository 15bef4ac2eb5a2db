//! QR code endpoint tests.
//!
//! Images are decoded with rqrr to check that the payload survives the
//! encode and rasterise steps unchanged.

use axum::http::{header, StatusCode};
use serde_json::json;

use super::test_utils::{decode_png, decode_qr, is_png, post_json, test_router};

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_qr_defaults() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "https://example.com"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "inline; filename=\"qrcode.png\""
    );
    assert!(is_png(&response.body));
    assert_eq!(decode_qr(&response.body), "https://example.com");
}

#[tokio::test]
async fn test_qr_round_trip_various_payloads() {
    let payloads = [
        "A".to_string(),
        "0123456789".to_string(),
        "HELLO WORLD 123".to_string(),
        "mailto:someone@example.com?subject=Hi".to_string(),
        "x".repeat(500),
    ];

    for payload in payloads {
        let response = post_json(
            test_router(),
            "/generate-qr",
            json!({"data": payload, "box_size": 4}),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK, "payload {:?}", payload);
        assert_eq!(decode_qr(&response.body), payload);
    }
}

#[tokio::test]
async fn test_qr_version_one_image_size() {
    let response = post_json(test_router(), "/generate-qr", json!({"data": "hi"})).await;
    let img = decode_png(&response.body);
    // (21 modules + 2 * 4 border) * 10 px
    assert_eq!(img.dimensions(), (290, 290));
}

#[tokio::test]
async fn test_qr_requested_version_is_minimum() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "version": 10, "box_size": 2, "border": 2}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let img = decode_png(&response.body);
    // Version 10 is 57 modules
    assert_eq!(img.dimensions(), ((57 + 4) * 2, (57 + 4) * 2));
    assert_eq!(decode_qr(&response.body), "hi");
}

#[tokio::test]
async fn test_qr_colors() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "fill_color": "#ff0000", "back_color": "rgb(0, 0, 255)"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let img = decode_png(&response.body);
    // Quiet zone takes the back colour, finder corner the fill colour
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(40, 40).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn test_qr_custom_filename() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "filename": "ticket 42.png"}),
    )
    .await;
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "inline; filename=\"ticket 42.png\""
    );
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_qr_data_too_long() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "a".repeat(5000)}),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert_eq!(body["error"], "encoding_error");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate QR Code: "));
}

#[tokio::test]
async fn test_qr_unknown_color() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "fill_color": "blurple"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["detail"]
        .as_str()
        .unwrap()
        .contains("blurple"));
}

#[tokio::test]
async fn test_qr_invalid_parameters() {
    let cases = [
        json!({"data": "hi", "version": 41}),
        json!({"data": "hi", "version": 0}),
        json!({"data": "hi", "box_size": 0}),
        json!({"data": "hi", "border": -1}),
        json!({"data": ""}),
        json!({"version": 3}),
        json!({"data": 12}),
        json!({"data": "hi", "version": "two"}),
    ];

    for case in cases {
        let response = post_json(test_router(), "/generate-qr", case.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {}", case);
        assert_eq!(response.json()["error"], "invalid_request");
    }
}

#[tokio::test]
async fn test_qr_version_out_of_range_message() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "version": 41}),
    )
    .await;
    assert_eq!(
        response.json()["detail"],
        "Field 'version' must be between 1 and 40, got 41"
    );
}

#[tokio::test]
async fn test_qr_image_too_large() {
    let response = post_json(
        test_router(),
        "/generate-qr",
        json!({"data": "hi", "box_size": 1000}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "invalid_request");
}
