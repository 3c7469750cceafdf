use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use chrono::Utc;
use serde::Deserialize;

use blackbox_core::RecordId;
use blackbox_messaging::{DASHBOARD_MESSAGE_LIMIT, Message, MessageId, NewMessage, most_recent};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_message).get(list_messages))
        .route("/:id", delete(delete_message))
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    /// Maximum number of messages to return, newest first. Defaults to the
    /// dashboard inbox size.
    pub limit: Option<usize>,
}

pub async fn create_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateMessageRequest>,
) -> axum::response::Response {
    let new = NewMessage {
        sender_name: body.sender_name,
        content: body.content,
    };

    let message = match Message::create(MessageId::new(RecordId::new()), new, Utc::now()) {
        Ok(message) => message,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.messages.create(user.user_id(), message.clone()).await {
        return errors::repository_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::message_to_json(&message))).into_response()
}

pub async fn list_messages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<ListMessagesQuery>,
) -> axum::response::Response {
    let messages = match services.messages.list(user.user_id()).await {
        Ok(messages) => messages,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let limit = query.limit.unwrap_or(DASHBOARD_MESSAGE_LIMIT);
    let items: Vec<_> = most_recent(messages, limit)
        .iter()
        .map(dto::message_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn delete_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "message") {
        Ok(id) => MessageId::new(id),
        Err(resp) => return resp,
    };

    match services.messages.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
