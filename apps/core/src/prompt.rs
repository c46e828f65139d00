//! Prompt assembly for the completion service.
//!
//! Output order is fixed: rules, optional background context, then the user's
//! text verbatim.

use crate::brain::Style;
use crate::knowledge::ScoredEntry;
use crate::models::Message;

pub const SYSTEM_RULES: &str = "You are Saathi, a calm and empathetic mental wellness companion for students.
Rules:
- Be warm and non-judgmental.
- Acknowledge and validate the user's feelings before anything else.
- Reply in 2 to 4 short sentences.
- Do not diagnose, and do not give medical or clinical advice.
- Do not repeat the same phrases you used before; keep it natural.
- You may end with one gentle, open question.";

pub const CODE_MIXED_ADDENDUM: &str = "The user writes in Hinglish (Hindi in Latin script mixed with English). Reply in the same casual Hinglish register.";

pub const CONTEXT_HEADER: &str = "Background context for you only. Use it subtly to inform your reply; never quote it or copy it verbatim:";

/// Builds the ordered message list for one generated turn.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    rules: String,
    code_mixed_addendum: String,
    context_header: String,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            rules: SYSTEM_RULES.to_string(),
            code_mixed_addendum: CODE_MIXED_ADDENDUM.to_string(),
            context_header: CONTEXT_HEADER.to_string(),
        }
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assemble(&self, text: &str, retrieved: &[ScoredEntry<'_>], style: Style) -> Vec<Message> {
        let mut messages = Vec::with_capacity(3);

        let rules = match style {
            Style::Primary => self.rules.clone(),
            Style::CodeMixed => format!("{}\n\n{}", self.rules, self.code_mixed_addendum),
        };
        messages.push(Message::system(rules));

        if !retrieved.is_empty() {
            let bullets = retrieved
                .iter()
                .map(|hit| format!("- {}", hit.text()))
                .collect::<Vec<_>>()
                .join("\n");
            messages.push(Message::system(format!("{}\n{}", self.context_header, bullets)));
        }

        messages.push(Message::user(text));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{EmbeddedEntry, KnowledgeEntry};
    use crate::models::Role;

    fn entry(id: &str, text: &str) -> EmbeddedEntry {
        EmbeddedEntry {
            entry: KnowledgeEntry::new(id, "stress_academic", text),
            vector: vec![1.0],
        }
    }

    #[test]
    fn test_without_context() {
        let messages = PromptAssembler::new().assemble("I feel lost", &[], Style::Primary);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(!messages[0].content.contains(CODE_MIXED_ADDENDUM));
        assert_eq!(messages[1], Message::user("I feel lost"));
    }

    #[test]
    fn test_with_context_and_code_mixed() {
        let a = entry("a", "Stress narrows attention.");
        let b = entry("b", "Short breaks help.");
        let hits = vec![
            ScoredEntry { entry: &a, score: 0.9 },
            ScoredEntry { entry: &b, score: 0.4 },
        ];

        let messages = PromptAssembler::new().assemble("yaar exam ka tension", &hits, Style::CodeMixed);

        assert_eq!(messages.len(), 3);
        assert!(messages[0].content.ends_with(CODE_MIXED_ADDENDUM));
        assert_eq!(messages[1].role, Role::System);
        assert!(messages[1]
            .content
            .ends_with("- Stress narrows attention.\n- Short breaks help."));
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, "yaar exam ka tension");
    }
}
