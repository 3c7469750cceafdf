//! Public share links for invoices.

use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceId;

/// The pair of links offered by the share dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLinks {
    pub invoice_url: String,
    pub whatsapp_url: String,
}

/// Public link to the invoice view: `<origin>/invoice/<id>`.
pub fn invoice_link(origin: &str, id: InvoiceId) -> String {
    format!("{}/invoice/{}", origin.trim_end_matches('/'), id)
}

/// WhatsApp prefill URL wrapping the share link. Only the message prefix is
/// percent-encoded; the link itself is substituted verbatim.
pub fn whatsapp_share_url(origin: &str, id: InvoiceId) -> String {
    format!(
        "https://wa.me/?text=Invoice%20Link:%20{}",
        invoice_link(origin, id)
    )
}

pub fn share_links(origin: &str, id: InvoiceId) -> ShareLinks {
    ShareLinks {
        invoice_url: invoice_link(origin, id),
        whatsapp_url: whatsapp_share_url(origin, id),
    }
}
