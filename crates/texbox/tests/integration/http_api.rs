use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use texbox::server::{Envelope, EnvelopeStatus, router};
use tower::ServiceExt;

use crate::{fixture_source, test_config};

fn post(path: &str, content_type: &str, accept: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post(path)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len());
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_post_raw_source_returns_pdf() {
    let app = router(test_config());

    let response = app
        .oneshot(post("/pdflatex", "text/plain", None, fixture_source("hello.tex")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_post_json_with_files_returns_envelope() {
    let app = router(test_config());
    let request = serde_json::json!({
        "tex_source": String::from_utf8(fixture_source("with_chapter.tex")).unwrap(),
        "files": {
            "chapters/intro.tex": STANDARD.encode(fixture_source("chapters/intro.tex")),
        },
    });

    let response = app
        .oneshot(post(
            "/xelatex",
            "application/json",
            Some("application/json"),
            request.to_string().into_bytes(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let envelope: Envelope = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope.status, EnvelopeStatus::Success);
    let pdf = STANDARD.decode(envelope.pdf.unwrap()).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_post_broken_source_returns_log() {
    let app = router(test_config());

    let response = app
        .oneshot(post(
            "/",
            "text/plain",
            None,
            fixture_source("undefined_control.tex"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let envelope: Envelope = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope.status, EnvelopeStatus::Error);
    assert!(
        envelope
            .compiler_output
            .unwrap()
            .contains("Undefined control sequence")
    );
}
