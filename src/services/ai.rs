use crate::config::Config;
use anyhow::{anyhow, Result};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs, Role,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

const MAX_RETRIES: u64 = 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Free text in, free text out. Nothing about the reply's shape is guaranteed.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

#[derive(Clone)]
pub struct AiService {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u16,
}

impl AiService {
    pub fn new(config: &Config) -> Self {
        let openai = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
        Self {
            client: Client::with_config(openai),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

fn to_request_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
    let message = match turn.role {
        ChatRole::System => ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
            role: Role::System,
            content: turn.content.clone(),
            name: None,
        }),
        ChatRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            role: Role::User,
            content: ChatCompletionRequestUserMessageContent::Text(turn.content.clone()),
            name: None,
        }),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .role(Role::Assistant)
            .content(turn.content.clone())
            .build()?
            .into(),
    };
    Ok(message)
}

fn reply_text(content: Option<String>) -> Result<String> {
    content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| anyhow!("OpenAI returned an empty reply"))
}

#[async_trait]
impl TextGenerator for AiService {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        let messages = turns
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut retries = 0;
        loop {
            let request = CreateChatCompletionRequestArgs::default()
                .model(self.model.as_str())
                .messages(messages.clone())
                .temperature(self.temperature)
                .max_tokens(self.max_tokens)
                .build()?;

            match self.client.chat().create(request).await {
                Ok(resp) => {
                    let content = resp.choices.first().and_then(|c| c.message.content.clone());
                    return reply_text(content);
                }
                Err(err) => {
                    retries += 1;
                    if retries > MAX_RETRIES {
                        return Err(anyhow!("OpenAI error: {err}"));
                    }
                    tracing::warn!("OpenAI request failed (attempt {}): {}", retries, err);
                    sleep(Duration::from_millis(500 * retries)).await;
                }
            }
        }
    }
}
