//! Invoicing domain module.
//!
//! Invoice records, public share links and the paged document export,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). The raster capture and page encoding live behind the
//! [`document::DocumentEncoder`] seam.

pub mod document;
pub mod invoice;
pub mod share;

pub use document::{
    DocumentEncoder, EncodeError, ExportedDocument, InvoiceRaster, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
    PageLayout, PageSlice, document_file_name, export_document, paginate,
};
pub use invoice::{Invoice, InvoiceId, InvoicePatch, InvoiceStatus, NewInvoice, invoice_serial};
pub use share::{ShareLinks, invoice_link, share_links, whatsapp_share_url};
