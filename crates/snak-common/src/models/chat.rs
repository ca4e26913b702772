use crate::models::account::AccountSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatRequest {
    pub name: String,
    #[serde(default)]
    pub initial_participant_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddParticipantsRequest {
    pub participant_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCreated {
    pub chat_id: i64,
}

/// Response of POST /chats/{id}/participants: how many ids were actually
/// added (already-present ids count zero) and the new set size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsAdded {
    pub status: String,
    pub count: usize,
    pub total: usize,
}

/// Message as returned by chat reads. The sender login is resolved at read
/// time and omitted when the sender's account no longer resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub sender_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_login: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Full chat read: participants resolved against the account service,
/// unresolvable ones omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatView {
    pub chat_id: i64,
    pub name: String,
    pub creator_id: i64,
    pub participants: Vec<AccountSnapshot>,
    pub messages: Vec<MessageView>,
}

/// Compact chat listing entry for GET /users/me/chats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub name: String,
    pub creator_id: i64,
    pub participant_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}
