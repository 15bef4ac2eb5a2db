//! Barcode endpoint tests.
//!
//! Captionless images are read back module by module and compared with the
//! symbology encoder's output.

use axum::http::{header, StatusCode};
use serde_json::json;

use barcode_api::symbol::{
    encode_symbol, mm_to_px, BarcodeType, DEFAULT_DPI, DEFAULT_MODULE_HEIGHT_MM,
    DEFAULT_QUIET_ZONE_MM,
};

use super::test_utils::{decode_png, is_png, post_json, read_modules, test_router};

/// One valid payload per supported symbology.
const VALID_SAMPLES: [(&str, &str); 11] = [
    ("ean8", "1234567"),
    ("ean13", "123456789012"),
    ("upca", "03600029145"),
    ("jan", "490123456789"),
    ("isbn10", "0-306-40615-2"),
    ("isbn13", "978030640615"),
    ("issn", "0317-8471"),
    ("code39", "HELLO-123"),
    ("code128", "Hello World 123"),
    ("pzn", "123456"),
    ("gs1", "978316148410"),
];

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_ean13_success() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "ean13", "data": "123456789012"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "inline; filename=\"barcode.png\""
    );
    assert!(is_png(&response.body));

    let img = decode_png(&response.body);
    // Caption sits below the bars
    assert!(img.height() > mm_to_px(DEFAULT_MODULE_HEIGHT_MM, DEFAULT_DPI));
}

#[tokio::test]
async fn test_every_symbology_renders_its_modules() {
    for (barcode_type, data) in VALID_SAMPLES {
        let response = post_json(
            test_router(),
            "/generate-barcode",
            json!({
                "barcode_type": barcode_type,
                "data": data,
                // 254 dpi makes 0.1mm one pixel
                "options": {"write_text": false, "dpi": 254, "module_width": 0.2, "quiet_zone": 0.5}
            }),
        )
        .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "{} {:?}: {:?}",
            barcode_type,
            data,
            String::from_utf8_lossy(&response.body)
        );

        let expected = encode_symbol(barcode_type.parse::<BarcodeType>().unwrap(), data)
            .unwrap()
            .modules;
        let img = decode_png(&response.body);
        assert_eq!(img.height(), 150);
        assert_eq!(read_modules(&img, 2, 5), expected, "{}", barcode_type);
    }
}

#[tokio::test]
async fn test_layout_options() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({
            "barcode_type": "code128",
            "data": "ABC",
            "options": {
                "dpi": 254,
                "module_width": 0.3,
                "module_height": 4.0,
                "quiet_zone": 0,
                "write_text": false,
                "foreground": "#008000",
                "background": "yellow"
            }
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let modules = encode_symbol(BarcodeType::Code128, "ABC").unwrap().modules;
    let img = decode_png(&response.body);
    assert_eq!(img.dimensions(), (modules.len() as u32 * 3, 40));
    // Code 128 starts with a bar and ends with the stop pattern's final bar
    assert_eq!(img.get_pixel(0, 0).0, [0, 128, 0, 255]);
    assert_eq!(img.get_pixel(img.width() - 1, 39).0, [0, 128, 0, 255]);
    // The third module of every start symbol is a space
    assert_eq!(img.get_pixel(2 * 3 + 1, 0).0, [255, 255, 0, 255]);
}

#[tokio::test]
async fn test_custom_caption() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({
            "barcode_type": "code128",
            "data": "1",
            "options": {"text": "A MUCH LONGER CAPTION THAN THE BARS", "font_size": 14}
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let img = decode_png(&response.body);
    let modules = encode_symbol(BarcodeType::Code128, "1").unwrap().modules.len() as u32;
    let bars_width = modules * 2 + 2 * mm_to_px(DEFAULT_QUIET_ZONE_MM, DEFAULT_DPI);
    // The canvas widens to fit the caption
    assert!(img.width() > bars_width);
}

#[tokio::test]
async fn test_dpi_scales_physical_sizes() {
    let modules = encode_symbol(BarcodeType::Ean8, "1234567").unwrap().modules.len() as u32;

    for (dpi, module_px, height_px) in [(300, 3, 30), (600, 6, 60)] {
        let response = post_json(
            test_router(),
            "/generate-barcode",
            json!({
                "barcode_type": "ean8",
                "data": "1234567",
                "options": {
                    "dpi": dpi,
                    "module_width": 0.254,
                    "module_height": 2.54,
                    "quiet_zone": 0.0,
                    "write_text": false
                }
            }),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK, "dpi {}", dpi);

        let img = decode_png(&response.body);
        assert_eq!(img.dimensions(), (modules * module_px, height_px), "dpi {}", dpi);
    }
}

#[tokio::test]
async fn test_gs1_matches_isbn13() {
    let mut images = Vec::new();
    for barcode_type in ["gs1", "isbn13"] {
        let response = post_json(
            test_router(),
            "/generate-barcode",
            json!({"barcode_type": barcode_type, "data": "9783161484100"}),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        images.push(response.body);
    }
    assert_eq!(images[0], images[1]);
}

#[tokio::test]
async fn test_filename_passthrough() {
    let filename = r#"report "Q3"; final.png"#;
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "code39", "data": "ABC", "filename": filename}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        format!("inline; filename=\"{}\"", filename)
    );
}

#[tokio::test]
async fn test_non_ascii_filename_passthrough() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "code39", "data": "ABC", "filename": "étiquette.png"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let value = response.headers.get(header::CONTENT_DISPOSITION).unwrap();
    assert_eq!(value.as_bytes(), "inline; filename=\"étiquette.png\"".as_bytes());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unsupported_barcode_type() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "datamatrix", "data": "123"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "invalid_request");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Unsupported barcode type: 'datamatrix'. Supported types: "));
    for (barcode_type, _) in VALID_SAMPLES {
        assert!(detail.contains(barcode_type), "missing {}", barcode_type);
    }
}

#[tokio::test]
async fn test_barcode_type_is_case_sensitive() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "EAN13", "data": "123456789012"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ean13_too_short() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "ean13", "data": "12345"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "invalid_data");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Invalid data for barcode type 'ean13': "));
    assert!(detail.ends_with(". Please check data format and length."));
}

#[tokio::test]
async fn test_invalid_data_per_symbology() {
    let cases = [
        ("ean13", "1234567890123"),
        ("ean13", "12345678901a"),
        ("ean8", "123"),
        ("upca", "0360002914"),
        ("jan", "123456789012"),
        ("isbn13", "123456789012"),
        ("isbn10", "0-306-40615-3"),
        ("issn", "0317-8472"),
        ("code39", "lower~case"),
        ("code128", ""),
        ("code128", "naïve"),
        ("pzn", "12345"),
        ("gs1", ""),
        ("gs1", "(01)09501101530003"),
    ];

    for (barcode_type, data) in cases {
        let response = post_json(
            test_router(),
            "/generate-barcode",
            json!({"barcode_type": barcode_type, "data": data}),
        )
        .await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "{} {:?}",
            barcode_type,
            data
        );
        assert_eq!(response.json()["error"], "invalid_data");
    }
}

#[tokio::test]
async fn test_unknown_option_rejected() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "ean13", "data": "123456789012", "options": {"foo": 1}}),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "invalid_request");
    assert!(body["detail"].as_str().unwrap().contains("foo"));
}

#[tokio::test]
async fn test_option_out_of_range() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "ean13", "data": "123456789012", "options": {"module_width": 50.5}}),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["detail"],
        "Field 'options.module_width' must be between 0.01 and 10.0, got 50.5"
    );
}

#[tokio::test]
async fn test_unknown_barcode_color() {
    let response = post_json(
        test_router(),
        "/generate-barcode",
        json!({"barcode_type": "ean13", "data": "123456789012", "options": {"foreground": "nope"}}),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert_eq!(body["error"], "encoding_error");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate barcode: "));
}

#[tokio::test]
async fn test_missing_barcode_fields() {
    for body in [json!({"data": "123"}), json!({"barcode_type": "ean13"})] {
        let response = post_json(test_router(), "/generate-barcode", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["error"], "invalid_request");
    }
}
