//! Invoice Rendering Adapter
//!
//! Implements the `InvoiceRenderer` port: composes the invoice PDF for an
//! approved request and persists it under the invoice directory, named by
//! invoice number.
//!
//! # Image policy
//!
//! The consignment image is best-effort. A remote URL is downloaded with a
//! bounded time budget into a temp file that is deleted when rendering
//! finishes, success or failure; if the download fails or no URL was
//! supplied, local paths keyed by request id and submitter phone are
//! tried; with no image at all the document carries a textual placeholder
//! instead of failing the render.

pub mod layout;
pub mod renderer;

pub use renderer::{CompanyInfo, PdfInvoiceRenderer, RenderConfig};
