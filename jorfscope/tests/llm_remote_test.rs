use mockito::Matcher;
use serde_json::json;

use jorfscope::llm::remote::RemoteLlmProvider;
use jorfscope::llm::{LlmProvider, LlmRequest};

fn request(system: &str, prompt: &str) -> LlmRequest {
    LlmRequest {
        system: system.to_string(),
        prompt: prompt.to_string(),
        max_tokens: Some(100),
        temperature: Some(0.7),
        timeout_seconds: Some(10),
    }
}

#[tokio::test]
async fn test_remote_provider_with_mock() {
    let mut server = mockito::Server::new_async().await;

    // Mock successful OpenAI response; the request must carry the system
    // message before the user message
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "gpt-3.5-turbo"})),
            Matcher::Regex(r#""role":"system""#.to_string()),
            Matcher::Regex(r#""role":"user""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "model": "gpt-3.5-turbo",
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "🔹 Décret notable publié ce jour."
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 5,
                    "total_tokens": 15
                }
            }"#,
        )
        .create_async()
        .await;

    let provider = RemoteLlmProvider::new(server.url(), "fake-api-key", "gpt-3.5-turbo");

    let result = provider
        .generate(request("Tu es un expert.", "Résume ces articles."))
        .await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert_eq!(response.content, "🔹 Décret notable publié ce jour.");
    assert_eq!(response.usage.prompt_tokens, 10);
    assert_eq!(response.usage.completion_tokens, 5);
    assert_eq!(response.usage.total_tokens, 15);
    assert_eq!(response.model, "gpt-3.5-turbo");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_provider_skips_empty_system_message() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(r#""role":"user""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "model": "gpt-3.5-turbo",
                "choices": [{"message": {"role": "assistant", "content": "ok"}}],
                "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
            }"#,
        )
        .create_async()
        .await;

    let provider = RemoteLlmProvider::new(server.url(), "fake-api-key", "gpt-3.5-turbo");

    let response = provider
        .generate(request("", "Résume."))
        .await
        .expect("generate");

    assert_eq!(response.content, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_provider_error_handling() {
    let mut server = mockito::Server::new_async().await;

    // Mock API error (quota) — must surface as an Err, not a panic
    let mock = server
        .mock("POST", "/")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "Rate limit exceeded"}}"#)
        .create_async()
        .await;

    let provider = RemoteLlmProvider::new(server.url(), "fake-api-key", "gpt-3.5-turbo");

    let result = provider.generate(request("sys", "prompt")).await;

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("429"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_provider_timeout() {
    let mut server = mockito::Server::new_async().await;

    // Mock slow response
    let _mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(b"too late")
        })
        .create_async()
        .await;

    let provider = RemoteLlmProvider::new(server.url(), "fake-api-key", "gpt-3.5-turbo");

    let mut req = request("sys", "prompt");
    req.timeout_seconds = Some(1);

    let result = provider.generate(req).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("timed out"));
}
