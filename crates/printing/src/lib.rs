//! Printable documents for packing lists.
//!
//! A packing-list snapshot becomes either a label document (one 100x150mm
//! page per box) or a manifest (A4 cover page with per-style totals, then
//! box details ten to a page). Rendering is a pure function of the
//! snapshot; printing loads the result into an isolated surface and tears
//! the surface down afterwards.

pub mod aggregate;
pub mod error;
pub mod html;
pub mod label;
pub mod layout;
pub mod manifest;
pub mod normalize;
pub mod paginate;
pub mod qr;
pub mod surface;

use serde::Serialize;
use tracing::instrument;

use lomartex_core::JobId;
use lomartex_packing::PackingList;

pub use error::{MissingField, PrintError, SurfaceError};
pub use layout::{Layout, UnknownLayout};
pub use normalize::Shipment;
pub use surface::{
    CapturedPrint, MemorySurfaces, PrintCommand, PrintSurface, SpoolDirectory, SurfaceGuard,
    SurfaceProvider,
};

/// A complete, standalone HTML document ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub layout: Layout,
    pub title: String,
    pub html: String,
    pub page_count: usize,
}

/// Outcome of a successful print job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintReceipt {
    pub job_id: JobId,
    pub layout: Layout,
    pub title: String,
    pub page_count: usize,
    /// Spooled file, when the surface keeps one.
    pub location: Option<String>,
}

/// Render `packing_list` in the given layout.
///
/// Mandatory fields are checked first, then the QR identifier is encoded;
/// either failure aborts before any markup is produced.
#[instrument(level = "debug", skip(packing_list), fields(code = packing_list.map(|p| p.code.as_str())))]
pub fn render(layout: Layout, packing_list: Option<&PackingList>) -> Result<RenderedDocument, PrintError> {
    let shipment = Shipment::from_packing_list(packing_list)?;
    let qr = qr::encode_identifier(shipment.code)?;

    let (body, page_count) = match layout {
        Layout::Label => (label::render_labels(&shipment, &qr), shipment.box_count()),
        Layout::Manifest => (
            manifest::render_manifest(&shipment, &qr),
            paginate::manifest_page_count(shipment.box_count()),
        ),
    };

    let title = format!("{} - {}", layout.title_prefix(), shipment.code);
    let html = html::document(layout, &title, &body);
    Ok(RenderedDocument {
        layout,
        title,
        html,
        page_count,
    })
}

/// Render, then print through a fresh surface from `provider`.
///
/// Nothing is acquired unless rendering succeeds. The surface is torn down
/// whether or not printing succeeds.
#[instrument(skip(packing_list, provider), fields(code = packing_list.map(|p| p.code.as_str())))]
pub fn print_document<P>(
    layout: Layout,
    packing_list: Option<&PackingList>,
    provider: &P,
) -> Result<PrintReceipt, PrintError>
where
    P: SurfaceProvider + ?Sized,
{
    let document = render(layout, packing_list)?;
    let job_id = JobId::new();

    let mut guard = SurfaceGuard::new(job_id, provider.acquire(job_id, &document.title)?);
    let surface = guard.surface()?;
    surface.load(&document)?;
    surface.print()?;
    let location = surface.location();
    guard.release()?;

    tracing::info!(%job_id, pages = document.page_count, "print job completed");
    Ok(PrintReceipt {
        job_id,
        layout,
        title: document.title,
        page_count: document.page_count,
        location,
    })
}
