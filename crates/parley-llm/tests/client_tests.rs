use mockito::Matcher;
use parley_llm::{
    AnthropicClient, ChatClient, ChatOptions, ChatRequest, ClientFactory, Message, OpenAIClient,
    ProviderConfig,
};

fn request(model: &str) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![Message::system("answer from context"), Message::human("Who is flying to London?")],
    )
    .with_options(ChatOptions::new().temperature(0.7).max_tokens(256))
}

#[tokio::test]
async fn test_openai_chat_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 256,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-1",
                "model": "gpt-3.5-turbo",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "  Layla is.  "},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
            }"#,
        )
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key").unwrap().with_base_url(server.url());
    let response = client.chat(request("gpt-3.5-turbo")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), Some("Layla is."));
    assert_eq!(response.usage.unwrap().total_tokens, 13);
}

#[tokio::test]
async fn test_groq_error_names_provider() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let client = ClientFactory::create_chat_client(
        ProviderConfig::groq("test-key").with_base_url(server.url()),
    )
    .unwrap();
    let err = client.chat(request("llama-3.3-70b-versatile")).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Groq API error"));
    assert!(message.contains("rate limited"));
}

#[tokio::test]
async fn test_anthropic_chat_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "claude-3-haiku-20240307",
            "system": "answer from context",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "msg_1",
                "model": "claude-3-haiku-20240307",
                "content": [{"type": "text", "text": "Layla, next Friday."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 20, "output_tokens": 5}
            }"#,
        )
        .create_async()
        .await;

    let client = AnthropicClient::new("test-key").unwrap().with_base_url(server.url());
    let response = client.chat(request("claude-3-haiku-20240307")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), Some("Layla, next Friday."));
    assert_eq!(response.finish_reason.as_deref(), Some("end_turn"));
    assert_eq!(response.usage.unwrap().total_tokens, 25);
}

#[tokio::test]
async fn test_anthropic_unknown_model_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/messages")
        .with_status(404)
        .with_body(r#"{"type":"error","error":{"type":"not_found_error","message":"model: claude-3-5-sonnet"}}"#)
        .create_async()
        .await;

    let client = AnthropicClient::new("test-key").unwrap().with_base_url(server.url());
    let err = client.chat(request("claude-3-5-sonnet")).await.unwrap_err();

    assert!(err.to_string().contains("404"));
}
