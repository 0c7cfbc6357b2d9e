//! Vision backend and the product-details flows

mod common;

use common::{config_for, delta, sse_body, TempImage};
use lumimate_client::prompts::PLACEHOLDER_FINDINGS;
use lumimate_client::workflow::{self, ProductFindings};
use lumimate_client::{ChatClient, Error, ImageInput, VisionClient};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn vision_backend_uploads_image_as_multipart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze-product/")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="image"; filename="cereal.jpg""#.to_string()),
            Matcher::Regex("JPEGBYTES".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "text": ["CRUNCHY", "375 g"],
                "labels": ["Breakfast cereal"],
                "web_entities": ["Corn flakes"]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let vision = VisionClient::new(&config_for(&server.url())).unwrap();
    let image = ImageInput::from_bytes("cereal.jpg", b"JPEGBYTES".to_vec());
    let findings = vision.analyze(&image).await.unwrap();
    mock.assert_async().await;

    assert_eq!(
        findings.to_prompt(),
        "Extracted text: ['CRUNCHY', '375 g']\nLabels: ['Breakfast cereal']\nWeb info: ['Corn flakes']"
    );
}

#[tokio::test]
async fn vision_backend_missing_keys_are_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze-product/")
        .with_status(200)
        .with_body(r#"{"labels": ["Can"]}"#)
        .create_async()
        .await;

    let vision = VisionClient::new(&config_for(&server.url())).unwrap();
    let image = ImageInput::from_bytes("can.jpg", b"x".to_vec());
    let findings = vision.analyze(&image).await.unwrap();
    assert_eq!(findings.text, json!([]));
    assert_eq!(findings.web_entities, json!([]));
    assert_eq!(findings.labels, json!(["Can"]));
}

#[tokio::test]
async fn null_findings_field_still_reaches_the_chat_step() {
    let mut server = Server::new_async().await;
    let _vision_mock = server
        .mock("POST", "/analyze-product/")
        .with_status(200)
        .with_body(r#"{"text": null, "labels": ["Can"]}"#)
        .create_async()
        .await;
    let chat_mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex(
            r#""text":"Extracted text: None\\nLabels: \['Can'\]\\nWeb info: \[\]""#.to_string(),
        ))
        .with_status(200)
        .with_body(sse_body(&[delta("A tin can."), "data: [DONE]".to_string()]))
        .create_async()
        .await;

    let cfg = config_for(&server.url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"x");
    let mut out = Vec::new();

    let decoded = workflow::run_product(ProductFindings::Backend, &vision, &chat, image.path(), &mut out)
        .await
        .expect("flow succeeds");
    chat_mock.assert_async().await;
    assert_eq!(decoded.content, "A tin can.");
    assert!(String::from_utf8(out).unwrap().contains("Step 2"));
}

#[tokio::test]
async fn non_json_vision_reply_is_a_backend_failure() {
    let mut server = Server::new_async().await;
    let _vision_mock = server
        .mock("POST", "/analyze-product/")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;
    let chat_mock = server
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let cfg = config_for(&server.url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"x");
    let mut out = Vec::new();

    let result = workflow::run_product(ProductFindings::Backend, &vision, &chat, image.path(), &mut out).await;
    chat_mock.assert_async().await;

    assert!(result.is_none());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Error calling vision backend: Network transport error: Invalid response body:"));
}

#[tokio::test]
async fn unreachable_vision_backend_is_reported() {
    let cfg = config_for(&common::closed_port_url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"x");
    let mut out = Vec::new();

    let result = workflow::run_product(ProductFindings::Backend, &vision, &chat, image.path(), &mut out).await;

    assert!(result.is_none());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Error calling vision backend: Network transport error: HTTP error:"));
    assert!(!printed.contains("Step 2"));
}

#[tokio::test]
async fn vision_backend_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze-product/")
        .with_status(502)
        .with_body("upstream down")
        .create_async()
        .await;

    let vision = VisionClient::new(&config_for(&server.url())).unwrap();
    let image = ImageInput::from_bytes("can.jpg", b"x".to_vec());
    let err = vision.analyze(&image).await.unwrap_err();
    assert!(matches!(err, Error::Remote { status: 502, .. }));
}

#[tokio::test]
async fn two_step_flow_feeds_findings_into_chat() {
    let mut server = Server::new_async().await;
    let vision_mock = server
        .mock("POST", "/analyze-product/")
        .with_status(200)
        .with_body(r#"{"text": ["OAT"], "labels": ["Milk"], "web_entities": []}"#)
        .create_async()
        .await;
    let chat_mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""text":"Extracted text: \['OAT'\]\\nLabels: \['Milk'\]\\nWeb info: \[\]""#.to_string()),
            Matcher::Regex("extracted findings".to_string()),
        ]))
        .with_status(200)
        .with_body(sse_body(&[
            delta("This is oat milk, "),
            delta("one litre."),
            "data: [DONE]".to_string(),
        ]))
        .create_async()
        .await;

    let cfg = config_for(&server.url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"milk");
    let mut out = Vec::new();

    let decoded = workflow::run_product(ProductFindings::Backend, &vision, &chat, image.path(), &mut out)
        .await
        .expect("flow succeeds");
    vision_mock.assert_async().await;
    chat_mock.assert_async().await;

    assert_eq!(decoded.content, "This is oat milk, one litre.");
    let printed = String::from_utf8(out).unwrap();
    let step1 = printed.find("Step 1: Analyzing image").unwrap();
    let step2 = printed.find("Step 2: Generating product summary").unwrap();
    assert!(step1 < step2);
    assert!(printed.contains("\nFindings: Extracted text: ['OAT']\nLabels: ['Milk']\nWeb info: []\n"));
    assert!(printed.ends_with("Complete product description:\nThis is oat milk, one litre.\n"));
}

#[tokio::test]
async fn vision_failure_stops_before_chat() {
    let mut server = Server::new_async().await;
    let _vision_mock = server
        .mock("POST", "/analyze-product/")
        .with_status(500)
        .create_async()
        .await;
    let chat_mock = server
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let cfg = config_for(&server.url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"x");
    let mut out = Vec::new();

    let result = workflow::run_product(ProductFindings::Backend, &vision, &chat, image.path(), &mut out).await;
    chat_mock.assert_async().await;

    assert!(result.is_none());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Error calling vision backend: Remote error: HTTP 500"));
    assert!(!printed.contains("Step 2"));
}

#[tokio::test]
async fn placeholder_and_provided_findings_skip_the_backend() {
    let mut server = Server::new_async().await;
    let vision_mock = server
        .mock("POST", "/analyze-product/")
        .expect(0)
        .create_async()
        .await;
    let chat_mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(sse_body(&[delta("A box."), "data: [DONE]".to_string()]))
        .expect(2)
        .create_async()
        .await;

    let cfg = config_for(&server.url());
    let chat = ChatClient::new(&cfg).unwrap();
    let vision = VisionClient::new(&cfg).unwrap();
    let image = TempImage::new("jpg", b"x");

    let mut out = Vec::new();
    workflow::run_product(ProductFindings::Placeholder, &vision, &chat, image.path(), &mut out)
        .await
        .unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains(&format!("Findings: {}", PLACEHOLDER_FINDINGS)));

    let mut out = Vec::new();
    let mode = ProductFindings::from_flags(Some("Labels: ['Tea']".into()), false);
    workflow::run_product(mode, &vision, &chat, image.path(), &mut out)
        .await
        .unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Findings: Labels: ['Tea']"));

    vision_mock.assert_async().await;
    chat_mock.assert_async().await;
}
