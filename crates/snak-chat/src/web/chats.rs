use crate::client::AccountLookupError;
use crate::state::AppState;
use crate::validate::{validate_participants, Validation};
use crate::web::middleware::BearerToken;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use snak_common::models::chat::{
    AddParticipantsRequest, ChatCreated, ChatSummary, ChatView, CreateChatRequest, MessageView,
    ParticipantsAdded, SendMessageRequest,
};
use snak_db::{ChatRepo, ChatRow, MessageRepo};
use std::collections::HashMap;
use std::sync::Arc;

/// Map an account lookup failure onto the HTTP taxonomy: 401 for rejected
/// credentials, 404 for an id that does not resolve, 502 when the account
/// service cannot answer at all (retryable, unlike the other two).
fn lookup_failure(e: AccountLookupError) -> Response {
    match e {
        AccountLookupError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Could not validate credentials"})),
        )
            .into_response(),
        AccountLookupError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("User with ID {} not found", id)})),
        )
            .into_response(),
        AccountLookupError::Unavailable(reason) => {
            tracing::error!("Account service unavailable: {}", reason);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "Account service unavailable"})),
            )
                .into_response()
        }
    }
}

fn chat_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Chat not found"})),
    )
        .into_response()
}

fn storage_failure(e: anyhow::Error) -> Response {
    tracing::error!("Storage error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error"})),
    )
        .into_response()
}

/// POST /chats - Create a chat. Participants are validated against the
/// account service before anything is written; a single unresolvable id
/// aborts with no chat persisted and no chat id consumed.
#[tracing::instrument(skip(state, token, req))]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Json(req): Json<CreateChatRequest>,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    let valid_ids =
        match validate_participants(&state.accounts, &token.0, &req.initial_participant_ids).await
        {
            Ok(Validation::AllValid(ids)) => ids,
            Ok(Validation::Invalid(id)) => {
                return lookup_failure(AccountLookupError::NotFound(id))
            }
            Err(e) => return lookup_failure(e),
        };

    // Creator first, then the validated ids minus the creator
    let mut participants = vec![caller.id];
    participants.extend(valid_ids.into_iter().filter(|&id| id != caller.id));

    match ChatRepo::create(&state.pool, &req.name, caller.id, &participants).await {
        Ok(chat_id) => (StatusCode::CREATED, Json(ChatCreated { chat_id })).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// POST /chats/{id}/participants - Creator-only set-union merge. Ids
/// already present add zero to the reported count.
#[tracing::instrument(skip(state, token, req))]
pub async fn add_participants(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Path(chat_id): Path<i64>,
    Json(req): Json<AddParticipantsRequest>,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    let chat = match ChatRepo::get(&state.pool, chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => return chat_not_found(),
        Err(e) => return storage_failure(e),
    };

    if chat.creator_id != caller.id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Only chat creator can add participants"})),
        )
            .into_response();
    }

    let valid_ids =
        match validate_participants(&state.accounts, &token.0, &req.participant_ids).await {
            Ok(Validation::AllValid(ids)) => ids,
            Ok(Validation::Invalid(id)) => {
                return lookup_failure(AccountLookupError::NotFound(id))
            }
            Err(e) => return lookup_failure(e),
        };

    let to_add: Vec<i64> = valid_ids
        .into_iter()
        .filter(|id| !chat.participants.contains(id))
        .collect();

    let participants = match ChatRepo::add_participants(&state.pool, chat_id, &to_add).await {
        Ok(Some(participants)) => participants,
        Ok(None) => return chat_not_found(),
        Err(e) => return storage_failure(e),
    };

    Json(ParticipantsAdded {
        status: "participants added".to_string(),
        count: to_add.len(),
        total: participants.len(),
    })
    .into_response()
}

/// POST /chats/{id}/messages - Participant-only append
#[tracing::instrument(skip(state, token, req))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Path(chat_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    let chat = match ChatRepo::get(&state.pool, chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => return chat_not_found(),
        Err(e) => return storage_failure(e),
    };

    if !chat.participants.contains(&caller.id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "You're not a participant of this chat"})),
        )
            .into_response();
    }

    match MessageRepo::append(&state.pool, chat_id, caller.id, &req.text).await {
        Ok(_) => Json(json!({"status": "message sent"})).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// GET /chats/{id} - Full chat read. Every participant id is resolved
/// against the account service; ids that no longer resolve are omitted
/// from the participant list instead of failing the read, so a chat stays
/// readable after a member's account is deleted.
#[tracing::instrument(skip(state, token))]
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Path(chat_id): Path<i64>,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    let chat = match ChatRepo::get(&state.pool, chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => return chat_not_found(),
        Err(e) => return storage_failure(e),
    };

    if !chat.participants.contains(&caller.id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access denied"})),
        )
            .into_response();
    }

    let mut participants = Vec::with_capacity(chat.participants.len());
    for &id in &chat.participants {
        match state.accounts.get_account(&token.0, id).await {
            Ok(snapshot) => participants.push(snapshot),
            Err(e) => {
                tracing::warn!("Omitting unresolvable participant {}: {}", id, e);
            }
        }
    }

    let messages = match MessageRepo::list_for_chat(&state.pool, chat_id).await {
        Ok(messages) => messages,
        Err(e) => return storage_failure(e),
    };

    let logins: HashMap<i64, String> = participants
        .iter()
        .map(|p| (p.id, p.login.clone()))
        .collect();

    let messages: Vec<MessageView> = messages
        .iter()
        .map(|m| MessageView {
            sender_id: m.sender_id,
            sender_login: logins.get(&m.sender_id).cloned(),
            text: m.text.clone(),
            timestamp: m.timestamp,
        })
        .collect();

    Json(ChatView {
        chat_id: chat.chat_id,
        name: chat.name,
        creator_id: chat.creator_id,
        participants,
        messages,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default = "default_message_limit")]
    pub limit: i64,
}

fn default_message_limit() -> i64 {
    50
}

/// GET /chats/{id}/messages?limit= - Newest-first message page, ids only
/// (no participant resolution on this path)
#[tracing::instrument(skip(state, token))]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Path(chat_id): Path<i64>,
    Query(query): Query<ListMessagesQuery>,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    let chat = match ChatRepo::get(&state.pool, chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => return chat_not_found(),
        Err(e) => return storage_failure(e),
    };

    if !chat.participants.contains(&caller.id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access denied"})),
        )
            .into_response();
    }

    match MessageRepo::list_recent(&state.pool, chat_id, query.limit).await {
        Ok(messages) => {
            let body: Vec<MessageView> = messages
                .iter()
                .map(|m| MessageView {
                    sender_id: m.sender_id,
                    sender_login: None,
                    text: m.text.clone(),
                    timestamp: m.timestamp,
                })
                .collect();
            Json(body).into_response()
        }
        Err(e) => storage_failure(e),
    }
}

/// GET /users/me/chats - Chats the caller participates in
#[tracing::instrument(skip(state, token))]
pub async fn my_chats(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
) -> impl IntoResponse {
    let caller = match state.accounts.resolve_caller(&token.0).await {
        Ok(caller) => caller,
        Err(e) => return lookup_failure(e),
    };

    match ChatRepo::list_for_user(&state.pool, caller.id).await {
        Ok(chats) => {
            let body: Vec<ChatSummary> = chats.into_iter().map(chat_summary).collect();
            Json(body).into_response()
        }
        Err(e) => storage_failure(e),
    }
}

fn chat_summary(chat: ChatRow) -> ChatSummary {
    ChatSummary {
        chat_id: chat.chat_id,
        name: chat.name,
        creator_id: chat.creator_id,
        participant_ids: chat.participants,
        created_at: chat.created_at,
    }
}
