//! Shared OpenAI-compatible provider chat client.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Model-provider settings used by the agent.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider key: `openrouter` or `openai_compatible`.
    pub provider: String,
    /// Base URL for chat completions. Required for `openai_compatible`.
    pub api_base_url: Option<String>,
    pub api_key: String,
    /// Model answering the learner.
    pub model: String,
    /// Model behind the `deep_thinking` tool.
    pub deep_thinking_model: String,
}

/// One chat-completions call.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    /// OpenAI-format messages (`{"role": ..., "content": ...}`).
    pub messages: &'a [Value],
    /// OpenAI-format tool definitions offered to the model.
    pub tools: Option<&'a [Value]>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments, as sent by the provider.
    pub arguments: String,
}

impl ToolCall {
    /// The call as it appears in an assistant message.
    pub fn to_message_value(&self) -> Value {
        json!({
            "id": self.id,
            "type": "function",
            "function": { "name": self.name, "arguments": self.arguments }
        })
    }
}

/// The assistant turn returned by the provider.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    /// Trimmed assistant content; `None` when absent or blank.
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

fn chat_endpoint(llm: &LlmConfig) -> Result<String, ApiError> {
    let base_url = match llm.provider.as_str() {
        "openrouter" => llm
            .api_base_url
            .clone()
            .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string()),
        "openai_compatible" => llm.api_base_url.clone().ok_or_else(|| {
            ApiError::BadRequest(
                "openai_compatible provider requires TUTOR_LLM_BASE_URL".to_string(),
            )
        })?,
        other => {
            return Err(ApiError::BadRequest(format!(
                "unsupported provider '{}': use openrouter or openai_compatible",
                other
            )))
        }
    };
    Ok(format!("{}/chat/completions", base_url.trim_end_matches('/')))
}

/// Sends one chat-completions request and returns the assistant turn.
pub async fn run_chat(
    client: &reqwest::Client,
    llm: &LlmConfig,
    request: ChatRequest<'_>,
) -> Result<ChatReply, ApiError> {
    let endpoint = chat_endpoint(llm)?;

    let mut body = json!({
        "model": request.model,
        "messages": request.messages,
    });
    if let Some(tools) = request.tools.filter(|t| !t.is_empty()) {
        body["tools"] = json!(tools);
    }
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    let mut req = client
        .post(endpoint)
        .header("Authorization", format!("Bearer {}", llm.api_key))
        .header("Content-Type", "application/json")
        .json(&body);

    if llm.provider == "openrouter" {
        req = req
            .header("HTTP-Referer", "http://localhost:3000")
            .header("X-Title", "tutor backend");
    }

    let response = req
        .send()
        .await
        .map_err(|err| ApiError::Upstream(format!("provider request failed: {}", err)))?;

    let status = response.status();
    let body_text = response.text().await.map_err(|err| {
        ApiError::Upstream(format!("provider response read failed: {}", err))
    })?;

    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "provider request failed ({}): {}",
            status, body_text
        )));
    }

    parse_chat_response(&body_text)
}

/// Extracts the first choice of a chat-completions response body.
pub fn parse_chat_response(body_text: &str) -> Result<ChatReply, ApiError> {
    let parsed: OpenAiCompatibleChatResponse = serde_json::from_str(body_text).map_err(|err| {
        ApiError::Upstream(format!("provider response parse failed: {}", err))
    })?;

    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| ApiError::Upstream("provider response has no choices".to_string()))?;

    let content = message
        .content
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments.unwrap_or_default(),
        })
        .collect();

    Ok(ChatReply {
        content,
        tool_calls,
    })
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChatResponse {
    choices: Vec<OpenAiCompatibleChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChoice {
    message: OpenAiCompatibleMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiCompatibleToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleToolCall {
    #[serde(default)]
    id: String,
    function: OpenAiCompatibleFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleFunction {
    name: String,
    arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(provider: &str, base: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_base_url: base.map(str::to_string),
            api_key: "sk-test".to_string(),
            model: "m".to_string(),
            deep_thinking_model: "d".to_string(),
        }
    }

    #[test]
    fn endpoint_per_provider() {
        assert_eq!(
            chat_endpoint(&llm("openrouter", None)).unwrap(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint(&llm("openai_compatible", Some("http://local/v1/"))).unwrap(),
            "http://local/v1/chat/completions"
        );
        assert!(chat_endpoint(&llm("openai_compatible", None)).is_err());
        assert!(chat_endpoint(&llm("carrier-pigeon", None)).is_err());
    }

    #[test]
    fn parses_content_reply() {
        let reply = parse_chat_response(
            r#"{"choices":[{"message":{"role":"assistant","content":"  <text>Why?</text> "}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.content.as_deref(), Some("<text>Why?</text>"));
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn parses_tool_calls() {
        let reply = parse_chat_response(
            r#"{"choices":[{"message":{"content":null,"tool_calls":[
                {"id":"call_1","type":"function","function":{"name":"deep_thinking","arguments":"{\"question\":\"Why 1848?\"}"}}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.content, None);
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "deep_thinking");
        assert_eq!(
            reply.tool_calls[0].to_message_value()["function"]["arguments"],
            "{\"question\":\"Why 1848?\"}"
        );
    }

    #[test]
    fn empty_choices_are_upstream_errors() {
        let err = parse_chat_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
        let err = parse_chat_response("not json").unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
