use serde::{Deserialize, Serialize};
use ulcerwatch_schema::{ChatMessage, ChatRole};

/// Prefix used when seeding the system instruction as a remembered prior
/// exchange (the target API has no dedicated system role).
pub const INSTRUCTION_PREFIX: &str = "Instructions for you to follow in this conversation: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One provider-ready conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub parts: Vec<TurnPart>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![TurnPart { text: text.into() }],
        }
    }
}

/// Formats a transcript into the ordered turn sequence for a single
/// completion call.
///
/// System messages never appear at their original position: the last one
/// encountered becomes the effective instruction (falling back to
/// `default_instruction`). When an instruction exists, it is primed as two
/// synthetic leading turns, `(model, ".")` then `(user, prefix + instruction)`,
/// so the request still begins with strictly alternating non-system roles.
/// Remaining messages map `Assistant` to the model role and everything else
/// to the user role; content is passed through untouched.
pub fn format_transcript(
    messages: &[ChatMessage],
    default_instruction: Option<&str>,
) -> Vec<ChatTurn> {
    let mut instruction: Option<&str> = None;
    let mut turns = Vec::with_capacity(messages.len() + 2);

    for message in messages {
        match message.role {
            ChatRole::System => instruction = Some(message.content.as_str()),
            ChatRole::Assistant => turns.push(ChatTurn::model(message.content.clone())),
            ChatRole::User => turns.push(ChatTurn::user(message.content.clone())),
        }
    }

    if let Some(instruction) = instruction.or(default_instruction) {
        turns.insert(0, ChatTurn::user(format!("{INSTRUCTION_PREFIX}{instruction}")));
        turns.insert(0, ChatTurn::model("."));
    }

    turns
}
