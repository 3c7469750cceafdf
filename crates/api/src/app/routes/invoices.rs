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

use blackbox_contacts::ContactId;
use blackbox_core::RecordId;
use blackbox_invoicing::{
    Invoice, InvoiceId, InvoicePatch, NewInvoice, PageLayout, document_file_name, paginate,
    share_links,
};
use blackbox_pipeline::DealId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route(
            "/:id",
            get(get_invoice).patch(update_invoice).delete(delete_invoice),
        )
        .route("/:id/share", get(share_invoice))
        .route("/:id/document", get(invoice_document))
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<dto::CreateInvoiceRequest>,
) -> axum::response::Response {
    let contact_id = match parse_optional_id(body.contact_id.as_deref(), "contact") {
        Ok(id) => id.map(ContactId::new),
        Err(resp) => return resp,
    };
    let deal_id = match parse_optional_id(body.deal_id.as_deref(), "deal") {
        Ok(id) => id.map(DealId::new),
        Err(resp) => return resp,
    };

    // Pre-fill amount and description from the linked deal when the caller
    // supplied only the deal.
    let deal = match deal_id {
        Some(id) => match services.deals.get(user.user_id(), id).await {
            Ok(Some(deal)) => Some(deal),
            Ok(None) => {
                return errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found");
            }
            Err(e) => return errors::repository_error_to_response(e),
        },
        None => None,
    };

    let amount = match body.amount.or_else(|| deal.as_ref().map(|d| d.amount)) {
        Some(amount) => amount,
        None => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "amount is required when no deal is linked",
            );
        }
    };
    let description = body
        .description
        .or_else(|| deal.as_ref().and_then(|d| d.description.clone()));
    let contact_id = contact_id.or_else(|| deal.as_ref().and_then(|d| d.contact_id));

    let now = Utc::now();
    let new = NewInvoice {
        serial_number: body.serial_number,
        contact_id,
        deal_id,
        status: body.status,
        amount,
        invoice_date: body.invoice_date.unwrap_or_else(|| now.date_naive()),
        due_date: body.due_date,
        description,
    };

    let invoice = match Invoice::create(InvoiceId::new(RecordId::new()), new, now) {
        Ok(invoice) => invoice,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.invoices.create(user.user_id(), invoice.clone()).await {
        return errors::repository_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::invoice_to_json(&invoice))).into_response()
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    match services.invoices.list(user.user_id()).await {
        Ok(invoices) => {
            let items: Vec<_> = invoices.iter().map(dto::invoice_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "invoice") {
        Ok(id) => InvoiceId::new(id),
        Err(resp) => return resp,
    };

    match services.invoices.get(user.user_id(), id).await {
        Ok(Some(invoice)) => {
            (StatusCode::OK, Json(dto::invoice_to_json(&invoice))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateInvoiceRequest>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "invoice") {
        Ok(id) => InvoiceId::new(id),
        Err(resp) => return resp,
    };
    let contact_id = match parse_optional_id(body.contact_id.as_deref(), "contact") {
        Ok(id) => id.map(ContactId::new),
        Err(resp) => return resp,
    };
    let deal_id = match parse_optional_id(body.deal_id.as_deref(), "deal") {
        Ok(id) => id.map(DealId::new),
        Err(resp) => return resp,
    };

    let mut invoice = match services.invoices.get(user.user_id(), id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found");
        }
        Err(e) => return errors::repository_error_to_response(e),
    };

    let patch = InvoicePatch {
        serial_number: body.serial_number,
        contact_id,
        deal_id,
        status: body.status,
        amount: body.amount,
        invoice_date: body.invoice_date,
        due_date: body.due_date,
        description: body.description,
    };
    if let Err(e) = invoice.apply_patch(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.invoices.update(user.user_id(), invoice.clone()).await {
        return errors::repository_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::invoice_to_json(&invoice))).into_response()
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "invoice") {
        Ok(id) => InvoiceId::new(id),
        Err(resp) => return resp,
    };

    match services.invoices.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn share_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "invoice") {
        Ok(id) => InvoiceId::new(id),
        Err(resp) => return resp,
    };

    match services.invoices.get(user.user_id(), id).await {
        Ok(Some(invoice)) => {
            let links = share_links(services.share_origin(), invoice.id);
            (StatusCode::OK, Json(links)).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::repository_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub raster_width: u32,
    pub raster_height: u32,
}

/// Page plan for the invoice document export: which vertical band of the
/// captured raster lands on which page. The client captures the raster and
/// feeds the plan to its PDF encoder.
pub async fn invoice_document(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id, "invoice") {
        Ok(id) => InvoiceId::new(id),
        Err(resp) => return resp,
    };

    let invoice = match services.invoices.get(user.user_id(), id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found");
        }
        Err(e) => return errors::repository_error_to_response(e),
    };

    let layout = PageLayout::default();
    let slices = paginate(query.raster_width, query.raster_height, layout);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "file_name": document_file_name(&invoice.serial_number),
            "page_count": slices.len(),
            "page_width_mm": layout.page_width_mm,
            "page_height_mm": layout.page_height_mm,
            "slices": slices,
        })),
    )
        .into_response()
}

fn parse_optional_id(
    raw: Option<&str>,
    what: &'static str,
) -> Result<Option<RecordId>, axum::response::Response> {
    match raw {
        Some(raw) => errors::parse_record_id(raw, what).map(Some),
        None => Ok(None),
    }
}
