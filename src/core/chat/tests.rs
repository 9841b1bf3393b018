use super::*;
use crate::auth::Credential;
use crate::core::app::SessionContext;
use crate::core::settings::default_settings;
use crate::utils::test_utils::{rejected, scripted_console, ScriptedClient};
use std::fs;
use tempfile::TempDir;

fn context_with_key(key: Option<&str>) -> SessionContext {
    SessionContext::new(
        default_settings(),
        Credential::new(key.map(str::to_string)),
        ".",
    )
}

#[test]
fn sentinels_are_case_insensitive() {
    assert_eq!(ChatInput::parse("x"), ChatInput::Exit);
    assert_eq!(ChatInput::parse("X"), ChatInput::Exit);
    assert_eq!(ChatInput::parse("f"), ChatInput::FromFile);
    assert_eq!(ChatInput::parse("F"), ChatInput::FromFile);
    assert_eq!(
        ChatInput::parse("fx"),
        ChatInput::Query("fx".to_string())
    );
    assert_eq!(ChatInput::parse(""), ChatInput::Query(String::new()));
}

#[test]
fn query_file_requires_object_with_string_query() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let write = |name: &str, contents: &str| {
        let path = temp_dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    };

    let good = write("good.json", r#"{"query": "hello there", "extra": 1}"#);
    assert_eq!(load_query_file(&good).unwrap(), "hello there");

    let missing = write("missing.json", r#"{"question": "hello"}"#);
    assert!(matches!(
        load_query_file(&missing),
        Err(QueryFileError::MissingQuery { .. })
    ));

    let number = write("number.json", r#"{"query": 5}"#);
    assert!(matches!(
        load_query_file(&number),
        Err(QueryFileError::MissingQuery { .. })
    ));

    let array = write("array.json", r#"["hello"]"#);
    assert!(matches!(
        load_query_file(&array),
        Err(QueryFileError::NotAnObject { .. })
    ));

    let broken = write("broken.json", r#"{"query": "#);
    assert!(matches!(
        load_query_file(&broken),
        Err(QueryFileError::Parse { .. })
    ));

    assert!(matches!(
        load_query_file(&temp_dir.path().join("absent.json")),
        Err(QueryFileError::Read { .. })
    ));
}

#[tokio::test]
async fn successful_query_is_recorded_and_printed() {
    let mut context = context_with_key(Some("sk-test"));
    let mut console = scripted_console(&["hello", "x"]);
    let client = ScriptedClient::replying("\n\nHi there!  \n");

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert_eq!(context.history.len(), 1);
    let record = &context.history.records()[0];
    assert_eq!(record.query, "hello");
    assert_eq!(record.response, "\n\nHi there!");
    assert_eq!(record.copilot_response, "");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.prompt, "user: hello");
    assert_eq!(requests[0].0.model, "text-davinci-002");
    assert_eq!(requests[0].0.max_tokens, 60);
    assert_eq!(requests[0].1, "sk-test");

    let transcript = console.transcript();
    assert!(transcript.contains("Chatting with GPT-3 (text-davinci-002)"));
    assert!(transcript.contains("\n\n\nHi there!\n"));
}

#[tokio::test]
async fn copilot_mode_tags_responses() {
    let mut context = context_with_key(Some("sk-test"));
    let mut console = scripted_console(&["write a haiku", "X"]);
    let client = ScriptedClient::replying("Leaves fall");

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Copilot)
        .run()
        .await
        .unwrap();

    let record = &context.history.records()[0];
    assert_eq!(record.response, "Leaves fall");
    assert_eq!(record.copilot_response, "Leaves fall");
    assert!(console.transcript().contains("Copilot with GPT-3"));
}

#[tokio::test]
async fn failed_request_resets_key_and_drops_query() {
    let mut context = context_with_key(Some("sk-old"));
    let mut console = scripted_console(&["hello", "sk-new", "x"]);
    let client = ScriptedClient::new(vec![Err(rejected(401, "Incorrect API key provided"))]);

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert!(context.history.is_empty());
    assert_eq!(context.credential.api_key(), Some("sk-new"));
    assert_eq!(client.requests().len(), 1);

    let transcript = console.transcript();
    assert!(transcript.contains("OpenAI API Error: Incorrect API key provided (HTTP 401)"));
    assert!(transcript.contains("API Key not found."));
}

#[tokio::test]
async fn next_query_uses_reacquired_key() {
    let mut context = context_with_key(Some("sk-old"));
    let mut console = scripted_console(&["first", "sk-new", "second", "x"]);
    let client = ScriptedClient::new(vec![
        Err(rejected(500, "server error")),
        Ok("answer".to_string()),
    ]);

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    let requests = client.requests();
    assert_eq!(requests[0].1, "sk-old");
    assert_eq!(requests[1].1, "sk-new");
    assert_eq!(context.history.len(), 1);
    assert_eq!(context.history.records()[0].query, "second");
}

#[tokio::test]
async fn missing_key_is_requested_before_chatting() {
    let mut context = context_with_key(None);
    let mut console = scripted_console(&["sk-typed", "x"]);
    let client = ScriptedClient::new(Vec::new());

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert_eq!(context.credential.api_key(), Some("sk-typed"));
    let transcript = console.transcript();
    let key_prompt = transcript.find("Please enter your OpenAI API Key").unwrap();
    let header = transcript.find("Chatting with").unwrap();
    assert!(key_prompt < header);
}

#[tokio::test]
async fn query_file_is_submitted() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("query.json");
    fs::write(&path, r#"{"query": "from disk"}"#).unwrap();
    let path = path.to_string_lossy().into_owned();

    let mut context = context_with_key(Some("sk-test"));
    let mut console = scripted_console(&["f", path.as_str(), "x"]);
    let client = ScriptedClient::replying("ok");

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert_eq!(context.history.records()[0].query, "from disk");
    assert_eq!(client.requests()[0].0.prompt, "user: from disk");
}

#[tokio::test]
async fn bad_query_file_returns_to_prompt() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("query.json");
    fs::write(&path, r#"{"prompt": "no query here"}"#).unwrap();
    let path = path.to_string_lossy().into_owned();

    let mut context = context_with_key(Some("sk-test"));
    let mut console = scripted_console(&["f", path.as_str(), "x"]);
    let client = ScriptedClient::new(Vec::new());

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert!(context.history.is_empty());
    assert!(client.requests().is_empty());
    let transcript = console.transcript();
    assert!(transcript.contains("Invalid JSON query. Please try again."));
    assert_eq!(
        transcript
            .matches("Enter your query ('f' to submit by file or 'x' to exit):")
            .count(),
        2
    );
}

#[tokio::test]
async fn edited_settings_shape_the_request() {
    let mut context = context_with_key(Some("sk-test"));
    context.settings.insert("Model", "GPT-4");
    let mut console = scripted_console(&["hi", "x"]);
    let client = ScriptedClient::replying("hey");

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert_eq!(client.requests()[0].0.model, "text-davinci-004");
}

#[tokio::test]
async fn closed_input_ends_session() {
    let mut context = context_with_key(Some("sk-test"));
    let mut console = scripted_console(&["hello"]);
    let client = ScriptedClient::replying("hi");

    let result = ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await;

    assert!(matches!(result, Err(UiError::InputClosed)));
    assert_eq!(context.history.len(), 1);
}

#[tokio::test]
async fn settings_error_drops_query_and_keeps_key() {
    let mut context = context_with_key(Some("sk-test"));
    let mut query_settings = context.settings.subtree("Query Settings").unwrap().clone();
    query_settings.insert("Max Tokens", -5_i64);
    context.settings.insert("Query Settings", query_settings);
    let mut console = scripted_console(&["hello", "x"]);
    let client = ScriptedClient::replying("unused");

    ChatSession::new(&mut context, &mut console, &client, ChatMode::Standard)
        .run()
        .await
        .unwrap();

    assert!(client.requests().is_empty());
    assert!(context.history.is_empty());
    assert_eq!(context.credential.api_key(), Some("sk-test"));

    let transcript = console.transcript();
    assert!(transcript.contains(
        "Settings error: setting 'Query Settings/Max Tokens' is out of range: -5"
    ));
    assert!(!transcript.contains("API Key not found."));
    assert_eq!(
        transcript
            .matches("Enter your query ('f' to submit by file or 'x' to exit):")
            .count(),
        2
    );
}
