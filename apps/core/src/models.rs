use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Default OpenAI-compatible chat-completions endpoint (OpenRouter).
pub const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Default model served through the completion endpoint.
pub const DEFAULT_MODEL_ID: &str = "mistralai/mistral-7b-instruct";

/// Represents the configuration for the remote completion model.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ModelConfig {
    /// Full URL of the chat-completions endpoint.
    #[validate(url)]
    pub endpoint: String,
    /// The identifier for the model to be used (API identifier).
    #[validate(length(min = 1))]
    pub model_id: String,
    /// Controls the creativity of the model's responses. Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    /// Upper bound on generated tokens. Replies are meant to be 2-4 sentences.
    #[validate(range(min = 1, max = 4096))]
    pub max_tokens: u32,
    /// Hard ceiling for one completion call, in seconds.
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
    /// Bearer token for the endpoint. Never serialized.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: 0.7,
            max_tokens: 180,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(label)
    }
}

/// Represents a single role-tagged message sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The text content of the message.
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A usable reply from the completion service. `content` is never blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    /// Model that actually served the request, when the endpoint reports it.
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_config_is_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 180);
    }

    #[test]
    fn test_model_config_rejects_bad_values() {
        let config = ModelConfig {
            temperature: 3.5,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            endpoint: "not a url".to_string(),
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::system("rules")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "rules");
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = ModelConfig {
            api_key: Some("sk-secret".to_string()),
            ..ModelConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
