use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use blackbox_contacts::{Contact, ContactId};
use blackbox_core::RecordId;
use blackbox_invoicing::{Invoice, InvoiceStatus};
use blackbox_pipeline::{Deal, DealBoard, DealId, DealPatch, NewDeal};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_deal).get(list_deals))
        .route("/board", get(deal_board))
        .route("/:id", get(get_deal).patch(update_deal).delete(delete_deal))
}

/// Status of the most recently created invoice linked to `deal_id`, if any.
/// Invoice listings come back newest first.
fn latest_invoice_status(invoices: &[Invoice], deal_id: DealId) -> Option<InvoiceStatus> {
    invoices
        .iter()
        .find(|inv| inv.deal_id == Some(deal_id))
        .map(|inv| inv.status)
}

fn contact_for<'a>(contacts: &'a [Contact], id: Option<ContactId>) -> Option<&'a Contact> {
    let id = id?;
    contacts.iter().find(|c| c.id == id)
}

async fn deal_response(
    services: &AppServices,
    user: UserContext,
    deal: &Deal,
    status: StatusCode,
) -> axum::response::Response {
    let contact = match deal.contact_id {
        Some(id) => match services.contacts.get(user.user_id(), id).await {
            Ok(contact) => contact,
            Err(e) => return errors::repository_error_to_response(e),
        },
        None => None,
    };
    let invoices = match services.invoices.list(user.user_id()).await {
        Ok(invoices) => invoices,
        Err(e) => return errors::repository_error_to_response(e),
    };

    (
        status,
        Json(dto::deal_to_json(
            deal,
            contact.as_ref(),
            latest_invoice_status(&invoices, deal.id),
        )),
    )
        .into_response()
}

pub async fn create_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateDealRequest>,
) -> axum::response::Response {
    let contact_id = match parse_optional_contact(body.contact_id.as_deref()) {
        Ok(contact_id) => contact_id,
        Err(resp) => return resp,
    };

    // A linked contact must exist (and belong to the caller).
    if let Some(id) = contact_id {
        match services.contacts.get(user.user_id(), id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return errors::json_error(StatusCode::NOT_FOUND, "not_found", "contact not found");
            }
            Err(e) => return errors::repository_error_to_response(e),
        }
    }

    let new = NewDeal {
        description: body.description,
        contact_id,
        status: body.status,
        notes: body.notes,
        amount: body.amount,
    };
    let deal = Deal::create(DealId::new(RecordId::new()), new, Utc::now());

    if let Err(e) = services.deals.create(user.user_id(), deal.clone()).await {
        return errors::repository_error_to_response(e);
    }

    deal_response(&services, user, &deal, StatusCode::CREATED).await
}

pub async fn list_deals(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    let deals = match services.deals.list(user.user_id()).await {
        Ok(deals) => deals,
        Err(e) => return errors::repository_error_to_response(e),
    };
    let contacts = match services.contacts.list(user.user_id()).await {
        Ok(contacts) => contacts,
        Err(e) => return errors::repository_error_to_response(e),
    };
    let invoices = match services.invoices.list(user.user_id()).await {
        Ok(invoices) => invoices,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let items: Vec<_> = deals
        .iter()
        .map(|deal| {
            dto::deal_to_json(
                deal,
                contact_for(&contacts, deal.contact_id),
                latest_invoice_status(&invoices, deal.id),
            )
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn deal_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    let deals = match services.deals.list(user.user_id()).await {
        Ok(deals) => deals,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let board = DealBoard::from_deals(deals);
    (StatusCode::OK, Json(board)).into_response()
}

pub async fn get_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "deal") {
        Ok(id) => DealId::new(id),
        Err(resp) => return resp,
    };

    match services.deals.get(user.user_id(), id).await {
        Ok(Some(deal)) => deal_response(&services, user, &deal, StatusCode::OK).await,
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateDealRequest>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "deal") {
        Ok(id) => DealId::new(id),
        Err(resp) => return resp,
    };
    let contact_id = match parse_optional_contact(body.contact_id.as_deref()) {
        Ok(contact_id) => contact_id,
        Err(resp) => return resp,
    };

    let mut deal = match services.deals.get(user.user_id(), id).await {
        Ok(Some(deal)) => deal,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found");
        }
        Err(e) => return errors::repository_error_to_response(e),
    };

    if let Some(id) = contact_id {
        match services.contacts.get(user.user_id(), id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return errors::json_error(StatusCode::NOT_FOUND, "not_found", "contact not found");
            }
            Err(e) => return errors::repository_error_to_response(e),
        }
    }

    let patch = DealPatch {
        description: body.description,
        contact_id,
        status: body.status,
        notes: body.notes,
        amount: body.amount,
    };
    if let Err(e) = deal.apply_patch(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.deals.update(user.user_id(), deal.clone()).await {
        return errors::repository_error_to_response(e);
    }

    deal_response(&services, user, &deal, StatusCode::OK).await
}

pub async fn delete_deal(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "deal") {
        Ok(id) => DealId::new(id),
        Err(resp) => return resp,
    };

    match services.deals.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

fn parse_optional_contact(
    raw: Option<&str>,
) -> Result<Option<ContactId>, axum::response::Response> {
    match raw {
        Some(raw) => errors::parse_record_id(raw, "contact").map(|id| Some(ContactId::new(id))),
        None => Ok(None),
    }
}
