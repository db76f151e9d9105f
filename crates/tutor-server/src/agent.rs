//! Educational agent backed by an external LLM.
//!
//! [`TutorAgent::respond`] turns the conversation's text blocks into chat
//! messages, prepends the tutoring instructions (plus the learner's onboarding
//! answers when known), and converts the model's tagged output back into a
//! [`Block`]. The model may call the `deep_thinking` tool once per turn; the
//! tool is a second, slower chat call that drafts a reflection path.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use tutor_core::catalog::LearnerProfile;
use tutor_core::transcript::parse_transcript;
use tutor_core::Block;

use crate::error::ApiError;
use crate::llm_provider::{run_chat, ChatRequest, LlmConfig, ToolCall};

pub const SYSTEM_PROMPT: &str = "\
As an Educational Agent, provide ONE optimal response to the student's input:

1. For CHEMISTRY/MATH (if formulas/equations):
   Generate image with embedded caption using:
   <image>[base64]|Caption: [Reflective question]</image>
   Example: \"<image>iVBOR...|Caption: How does this molecular shape affect reactivity?</image>\"

2. For HUMANITIES/LOGIC:
   <text>[Single thought-provoking question]</text>
   Example: \"<text>What would be the strongest counter-argument to this claim?</text>\"

Rules:
- Only return 1 tag per response
- Images must contain integrated text
- Maximum 15-word captions
- For visuals: Always highlight 1 key learning point
- No useless informations or formatting : only text or image that is relevant to the student";

pub const DEEP_THINKING_TOOL: &str = "deep_thinking";

const AGENT_TEMPERATURE: f64 = 0.3;
const AGENT_MAX_TOKENS: u32 = 5000;
const DEEP_THINKING_TEMPERATURE: f64 = 0.3;
const DEEP_THINKING_MAX_TOKENS: u32 = 1000;

static IMAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<image>(.*?)</image>").expect("image tag pattern is valid"));
static TEXT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text>(.*?)</text>").expect("text tag pattern is valid"));

/// The LLM-backed tutor. Disabled when no provider is configured.
pub struct TutorAgent {
    llm: Option<LlmConfig>,
    client: reqwest::Client,
}

impl TutorAgent {
    pub fn new(llm: Option<LlmConfig>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::InternalError(format!("http client setup failed: {}", err)))?;
        Ok(TutorAgent { llm, client })
    }

    /// An agent that always fails, so callers fall back to demo answers.
    pub fn disabled() -> Self {
        TutorAgent {
            llm: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Answers the conversation formed by `blocks` (already in order).
    pub async fn respond(
        &self,
        blocks: &[Block],
        profile: Option<&LearnerProfile>,
    ) -> Result<Block, ApiError> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| ApiError::Upstream("agent is not configured (no API key)".to_string()))?;

        let mut messages = vec![json!({
            "role": "system",
            "content": system_prompt(profile),
        })];
        messages.extend(conversation_messages(blocks));
        if messages.len() == 1 {
            return Err(ApiError::BadRequest("conversation is empty".to_string()));
        }

        let tools = [deep_thinking_tool()];
        let first = run_chat(
            &self.client,
            llm,
            ChatRequest {
                model: &llm.model,
                messages: &messages,
                tools: Some(&tools),
                temperature: Some(AGENT_TEMPERATURE),
                max_tokens: Some(AGENT_MAX_TOKENS),
            },
        )
        .await?;

        let content = match first
            .tool_calls
            .iter()
            .find(|call| call.name == DEEP_THINKING_TOOL)
        {
            Some(call) => {
                tracing::debug!(tool = DEEP_THINKING_TOOL, "agent requested a tool call");
                let reflection = self.deep_thinking(llm, call).await?;
                messages.push(json!({
                    "role": "assistant",
                    "content": first.content,
                    "tool_calls": [call.to_message_value()],
                }));
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": reflection,
                }));
                run_chat(
                    &self.client,
                    llm,
                    ChatRequest {
                        model: &llm.model,
                        messages: &messages,
                        tools: None,
                        temperature: Some(AGENT_TEMPERATURE),
                        max_tokens: Some(AGENT_MAX_TOKENS),
                    },
                )
                .await?
                .content
            }
            None => first.content,
        };

        let content = content.ok_or_else(|| {
            ApiError::Upstream("provider response missing assistant content".to_string())
        })?;
        Ok(parse_agent_output(&content))
    }

    /// Runs the `deep_thinking` tool for one call.
    async fn deep_thinking(&self, llm: &LlmConfig, call: &ToolCall) -> Result<String, ApiError> {
        let question = deep_thinking_question(&call.arguments)?;
        let messages = [json!({
            "role": "user",
            "content": format!(
                "You are a deep thinking assistant. Suggest a reflection path and give examples for the following question: {}",
                question
            ),
        })];
        run_chat(
            &self.client,
            llm,
            ChatRequest {
                model: &llm.deep_thinking_model,
                messages: &messages,
                tools: None,
                temperature: Some(DEEP_THINKING_TEMPERATURE),
                max_tokens: Some(DEEP_THINKING_MAX_TOKENS),
            },
        )
        .await?
        .content
        .ok_or_else(|| ApiError::Upstream("deep thinking returned no content".to_string()))
    }
}

/// Tutoring instructions, followed by the learner's onboarding answers.
pub fn system_prompt(profile: Option<&LearnerProfile>) -> String {
    let mut prompt = SYSTEM_PROMPT.to_string();
    let questions = profile.map(|p| p.fixed_questions()).unwrap_or_default();
    if !questions.is_empty() {
        prompt.push_str("\n\nWhat the student told us during onboarding:\n");
        for q in questions {
            prompt.push_str(&format!("- {} {}\n", q.question, q.answer));
        }
    }
    prompt
}

/// Chat messages for the conversation's blocks.
///
/// Each block may hold several role-annotated turns. `user` stays `user`,
/// `assistant`/`agent` become `assistant`, any other role is kept visible as
/// a `[role]` prefix on a user message.
pub fn conversation_messages(blocks: &[Block]) -> Vec<Value> {
    blocks
        .iter()
        .flat_map(|block| parse_transcript(&block.text))
        .map(|turn| match turn.role.as_str() {
            "user" => json!({ "role": "user", "content": turn.message }),
            "assistant" | "agent" => json!({ "role": "assistant", "content": turn.message }),
            other => json!({
                "role": "user",
                "content": format!("[{}] {}", other, turn.message),
            }),
        })
        .collect()
}

/// Converts tagged model output into a block.
///
/// `<image>DATA|Caption: ...</image>` becomes a `media_image` block (bare
/// base64 gets a PNG data URI prefix); `<text>...</text>` and untagged output
/// become `cours` blocks.
pub fn parse_agent_output(content: &str) -> Block {
    if let Some(inner) = IMAGE_TAG.captures(content).and_then(|c| c.get(1)) {
        let inner = inner.as_str();
        let (data, caption) = match inner.split_once('|') {
            Some((data, caption)) => (data.trim(), caption.trim()),
            None => (inner.trim(), ""),
        };
        if !data.is_empty() {
            let uri = if data.starts_with("data:") {
                data.to_string()
            } else {
                format!("data:image/png;base64,{}", data)
            };
            return Block::media_image(uri);
        }
        let caption = caption.strip_prefix("Caption:").unwrap_or(caption).trim();
        return Block::cours(caption);
    }

    if let Some(inner) = TEXT_TAG.captures(content).and_then(|c| c.get(1)) {
        return Block::cours(inner.as_str().trim());
    }

    Block::cours(content.trim())
}

fn deep_thinking_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": DEEP_THINKING_TOOL,
            "description": "Suggests a reflection path and examples for humanities questions.",
            "parameters": {
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The humanities question or topic"
                    }
                },
                "required": ["question"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct DeepThinkingArgs {
    question: String,
}

fn deep_thinking_question(arguments: &str) -> Result<String, ApiError> {
    serde_json::from_str::<DeepThinkingArgs>(arguments)
        .map(|args| args.question)
        .map_err(|err| {
            ApiError::Upstream(format!("invalid {} arguments: {}", DEEP_THINKING_TOOL, err))
        })
}
