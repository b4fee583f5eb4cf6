//! Manifest layout: A4 cover page followed by paginated box details.

use crate::aggregate::StyleSummary;
use crate::html::{dimensions, escape, lines, number};
use crate::label::HEADER;
use crate::normalize::{BoxLine, Shipment};
use crate::paginate::{detail_pages, manifest_page_count};
use crate::qr::QrImage;

/// Cover-page tracking text when boxes carry different numbers.
pub const MULTIPLE_TRACKING: &str = "Multiple numbers (see box details)";

/// Tracking line for the cover summary, from the distinct-count rule.
pub fn cover_tracking<'a>(shipment: &Shipment<'a>) -> &'a str {
    match shipment.distinct_tracking.as_slice() {
        [] => "N/A",
        [only] => *only,
        _ => MULTIPLE_TRACKING,
    }
}

/// Cover page plus detail pages. Every page carries a `Page X of N` footer.
pub fn render_manifest(shipment: &Shipment<'_>, qr: &QrImage) -> String {
    let total_pages = manifest_page_count(shipment.box_count());
    let summary = StyleSummary::from_boxes(&shipment.boxes);

    let mut out = String::new();
    cover_page(&mut out, shipment, &summary, qr);
    page_footer(&mut out, 1, total_pages);

    let show_tracking = shipment.has_multiple_tracking();
    for (idx, page) in detail_pages(&shipment.boxes).enumerate() {
        detail_page(&mut out, shipment, page, show_tracking);
        page_footer(&mut out, idx + 2, total_pages);
    }
    out
}

fn cover_page(out: &mut String, shipment: &Shipment<'_>, summary: &StyleSummary<'_>, qr: &QrImage) {
    out.push_str(&format!(
        "<div class=\"manifest-page\">\n<div class=\"manifest-header\">\n<img src=\"{}\" class=\"qr-code\" alt=\"QR Code\" />\n<h1>{HEADER}</h1>\n<div class=\"manifest-code\">{}</div>\n",
        qr.data_uri,
        escape(shipment.code),
    ));
    if let Some(po) = shipment.po {
        out.push_str(&format!("<div class=\"manifest-po\">PO: {}</div>\n", escape(po)));
    }
    out.push_str("</div>\n");

    let to = &shipment.destination;
    out.push_str(&format!(
        "<table>\n<tr>\n<td style=\"width: 50%\">\n<strong>Client Information</strong><br>\n{}<br>\n{}<br>\n{}, {}<br>\n{}<br>\n{}\n</td>\n",
        escape(to.name),
        escape(to.street),
        escape(to.city),
        escape(to.state),
        escape(to.postal_code),
        escape(to.country),
    ));
    out.push_str(&format!(
        "<td style=\"width: 50%\">\n<strong>Summary</strong><br>\nTotal Boxes: {}<br>\nTotal Items: {}<br>\nCarrier: {}<br>\nTracking: {}\n</td>\n</tr>\n</table>\n",
        shipment.box_count(),
        summary.total,
        escape(&shipment.carrier),
        escape(cover_tracking(shipment)),
    ));

    out.push_str(
        "<strong>Box Summary</strong>\n<table>\n<thead>\n<tr><th>Style</th><th>Description</th><th>Color</th><th class=\"sizes-cell\">Sizes</th><th>Total</th></tr>\n</thead>\n<tbody>\n",
    );
    for row in &summary.rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"sizes-cell\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape(row.style),
            escape(row.description),
            escape(row.color),
            escape(&row.sizes_text()),
            row.total,
        ));
    }
    out.push_str(&format!(
        "<tr class=\"total-row\"><td colspan=\"4\">Total Items</td><td class=\"num\">{}</td></tr>\n</tbody>\n</table>\n",
        summary.total,
    ));
}

fn detail_page(out: &mut String, shipment: &Shipment<'_>, page: &[BoxLine<'_>], show_tracking: bool) {
    out.push_str(
        "<div class=\"manifest-page\">\n<strong>Box Details</strong>\n<table>\n<thead>\n<tr><th>Box</th><th>Style</th><th>Color</th><th class=\"sizes-cell\">Sizes</th><th>Total</th><th>Measurements</th>",
    );
    if show_tracking {
        out.push_str("<th>Tracking</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for b in page {
        let sizes: Vec<String> = b.models.iter().map(|m| escape(&m.sizes_text())).collect();
        out.push_str(&format!(
            "<tr><td>{}/{}</td><td>{}</td><td>{}</td><td class=\"sizes-cell\">{}</td><td class=\"num\">{}</td><td>{}<br>{}kg</td>",
            b.number,
            shipment.box_count(),
            lines(b.models.iter().map(|m| m.reference)),
            lines(b.models.iter().map(|m| m.color)),
            sizes.join("<br>"),
            b.total(),
            dimensions(&b.dimensions),
            number(b.gross_weight),
        ));
        if show_tracking {
            out.push_str(&format!("<td>{}</td>", escape(b.tracking.unwrap_or("N/A"))));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Closes the current page.
fn page_footer(out: &mut String, page: usize, total: usize) {
    out.push_str(&format!(
        "<div class=\"page-footer\">Page {page} of {total}</div>\n</div>\n"
    ));
}
