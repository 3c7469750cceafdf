use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use blackbox_contacts::{Contact, ContactId, ContactPatch, NewContact, page_count, page_slice};
use blackbox_core::RecordId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_contact).get(list_contacts))
        .route(
            "/:id",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
}

#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    /// Case-insensitive substring matched against name/company/email/phone.
    pub q: Option<String>,
    /// 1-based page number, defaults to 1.
    pub page: Option<usize>,
}

pub async fn create_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateContactRequest>,
) -> axum::response::Response {
    let new = NewContact {
        name: body.name,
        phone: body.phone,
        email: body.email,
        company: body.company,
        ranking: body.ranking,
    };

    let contact = match Contact::create(ContactId::new(RecordId::new()), new, Utc::now()) {
        Ok(contact) => contact,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.contacts.create(user.user_id(), contact.clone()).await {
        return errors::repository_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::contact_to_json(&contact))).into_response()
}

pub async fn list_contacts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<ListContactsQuery>,
) -> axum::response::Response {
    let contacts = match services.contacts.list(user.user_id()).await {
        Ok(contacts) => contacts,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let needle = query.q.unwrap_or_default();
    let filtered: Vec<_> = contacts
        .into_iter()
        .filter(|c| c.matches_query(&needle))
        .collect();

    let page = query.page.unwrap_or(1);
    let items: Vec<_> = page_slice(&filtered, page)
        .iter()
        .map(dto::contact_to_json)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": items,
            "page": page,
            "total_pages": page_count(filtered.len()),
            "total": filtered.len(),
        })),
    )
        .into_response()
}

pub async fn get_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "contact") {
        Ok(id) => ContactId::new(id),
        Err(resp) => return resp,
    };

    match services.contacts.get(user.user_id(), id).await {
        Ok(Some(contact)) => {
            (StatusCode::OK, Json(dto::contact_to_json(&contact))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "contact not found"),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateContactRequest>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "contact") {
        Ok(id) => ContactId::new(id),
        Err(resp) => return resp,
    };

    let mut contact = match services.contacts.get(user.user_id(), id).await {
        Ok(Some(contact)) => contact,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "contact not found");
        }
        Err(e) => return errors::repository_error_to_response(e),
    };

    let patch = ContactPatch {
        name: body.name,
        phone: body.phone,
        email: body.email,
        company: body.company,
        ranking: body.ranking,
    };
    if let Err(e) = contact.apply_patch(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.contacts.update(user.user_id(), contact.clone()).await {
        return errors::repository_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::contact_to_json(&contact))).into_response()
}

pub async fn delete_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "contact") {
        Ok(id) => ContactId::new(id),
        Err(resp) => return resp,
    };

    match services.contacts.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
