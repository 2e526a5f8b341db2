use base64::{engine::general_purpose::STANDARD, Engine as _};
use dial_client::{
    models::{Attachment, ContentPart, CustomContent, Message, Role},
    BucketClient, ModelClient,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/openai/deployments/gpt-4o/chat/completions";

/// Matches requests whose body contains the given byte sequence.
struct BodyContains(Vec<u8>);

impl Match for BodyContains {
    fn matches(&self, request: &Request) -> bool {
        request
            .body
            .windows(self.0.len())
            .any(|window| window == self.0.as_slice())
    }
}

fn model_client(server: &MockServer) -> ModelClient {
    ModelClient::new(
        format!("{}/openai/deployments/{{model}}/chat/completions", server.uri()),
        "gpt-4o",
        "test-key",
    )
    .unwrap()
}

#[tokio::test]
async fn multimodal_request_keeps_part_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "An elephant."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::user_parts(vec![
        ContentPart::text("describe this"),
        ContentPart::image_url("https://x/y.jpg"),
    ]);
    let reply = model_client(&server)
        .get_completion(&[message], None)
        .await
        .unwrap();
    assert_eq!(reply.role, Role::Assistant);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let content = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0], json!({"type": "text", "text": "describe this"}));
    assert_eq!(
        content[1],
        json!({"type": "image_url", "image_url": {"url": "https://x/y.jpg"}})
    );
}

#[tokio::test]
async fn uploaded_bytes_download_unchanged() {
    let server = MockServer::start().await;
    let original: Vec<u8> = (0..1024u32).map(|i| (i * 7 % 251) as u8).collect();

    Mock::given(method("GET"))
        .and(path("/v1/bucket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bucket": "bkt"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/files/bkt/a.png"))
        .and(BodyContains(original.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "files/bkt/a.png"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/files/bkt/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(original.clone()))
        .mount(&server)
        .await;

    let bucket = BucketClient::new("test-key", server.uri()).unwrap();
    let reference = bucket.put("a.png", "image/png", &original).await.unwrap();
    assert_eq!(reference, "files/bkt/a.png");

    let downloaded = bucket.get(&reference).await.unwrap();
    assert_eq!(downloaded, original);
}

#[tokio::test]
async fn generated_inline_image_decodes_to_original_payload() {
    let server = MockServer::start().await;
    let image = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2, 3];
    let payload = STANDARD.encode(&image);

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "",
                "custom_content": {"attachments": [{
                    "title": "Image",
                    "type": "image/png",
                    "data": format!("data:image/png;base64,{}", payload),
                    "revised_prompt": "ignored"
                }]}
            }}]
        })))
        .mount(&server)
        .await;

    let reply = model_client(&server)
        .get_completion(&[Message::user("Sunny day in Malaga")], None)
        .await
        .unwrap();
    let attachments = reply.attachments();
    assert_eq!(attachments.len(), 1);

    let bytes = attachments[0].decode_data().unwrap().unwrap();
    assert_eq!(bytes, image);
    assert_eq!(STANDARD.encode(&bytes), payload);

    let bucket = BucketClient::new("test-key", server.uri()).unwrap();
    assert_eq!(bucket.resolve_attachment(&attachments[0]).await.unwrap(), image);
}

#[tokio::test]
async fn uploaded_attachment_travels_in_custom_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/bucket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bucket": "bkt"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/files/bkt/banner.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "files/bkt/banner.png"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A banner."}}]
        })))
        .mount(&server)
        .await;

    let bucket = BucketClient::new("test-key", server.uri()).unwrap();
    let attachment = bucket
        .put_attachment("banner.png", "image/png", b"not really a png")
        .await
        .unwrap();
    assert_eq!(
        attachment,
        Attachment::builder()
            .title("banner.png")
            .mime_type("image/png")
            .url("files/bkt/banner.png")
            .build()
    );

    let message = Message::user("What do you see on this picture?")
        .with_custom_content(CustomContent::new(vec![attachment]));
    let reply = model_client(&server)
        .get_completion(&[message], None)
        .await
        .unwrap();
    assert_eq!(reply.text(), "A banner.");

    let requests = server.received_requests().await.unwrap();
    let completion = requests
        .iter()
        .find(|request| request.url.path() == COMPLETIONS_PATH)
        .unwrap();
    let body: Value = serde_json::from_slice(&completion.body).unwrap();
    assert_eq!(
        body["messages"][0]["custom_content"]["attachments"][0]["url"],
        "files/bkt/banner.png"
    );
    assert_eq!(body["messages"][0]["content"], "What do you see on this picture?");
}
