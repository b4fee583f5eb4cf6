//! Label layout: one 100x150mm page per box.

use crate::aggregate::StyleSummary;
use crate::html::{dimensions, escape, number};
use crate::normalize::{BoxLine, Destination, Shipment};
use crate::qr::QrImage;

/// Brand line printed at the top of every page.
pub const HEADER: &str = "LOMARTEX";

/// Page markup for every box, in input order.
pub fn render_labels(shipment: &Shipment<'_>, qr: &QrImage) -> String {
    let mut out = String::new();
    for b in &shipment.boxes {
        render_label(&mut out, shipment, b, qr);
    }
    out
}

fn render_label(out: &mut String, shipment: &Shipment<'_>, b: &BoxLine<'_>, qr: &QrImage) {
    out.push_str(&format!(
        "<div class=\"box-label\">\n<img src=\"{}\" class=\"qr-code\" alt=\"QR Code\" />\n<div class=\"label-header\">{HEADER}</div>\n<div class=\"label-code\">{}</div>\n",
        qr.data_uri,
        escape(shipment.code),
    ));
    if let Some(po) = shipment.po {
        out.push_str(&format!("<div class=\"label-po\"><strong>PO:</strong> {}</div>\n", escape(po)));
    }

    out.push_str(&format!(
        "<div style=\"margin-bottom: 3mm\">\n<div class=\"label-info\">\n<strong>Box:</strong> {}/{}<br>\n<strong>Weight:</strong> {}kg<br>\n<strong>Dimensions:</strong> {}<br>\n<strong>Tracking:</strong> {}\n</div>\n",
        b.number,
        shipment.box_count(),
        number(b.gross_weight),
        dimensions(&b.dimensions),
        escape(b.tracking.unwrap_or("N/A")),
    ));
    destination_block(out, &shipment.destination);
    out.push_str("<div class=\"clear\"></div>\n</div>\n");

    let summary = StyleSummary::for_box(b);
    out.push_str(
        "<table>\n<thead>\n<tr><th>Style</th><th>Color</th><th>Sizes</th><th>Total</th></tr>\n</thead>\n<tbody>\n",
    );
    for row in &summary.rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"sizes-cell\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape(row.style),
            escape(row.color),
            escape(&row.sizes_text()),
            row.total,
        ));
    }
    out.push_str(&format!(
        "<tr class=\"total-row\"><td colspan=\"3\">Total Items</td><td class=\"num\">{}</td></tr>\n</tbody>\n</table>\n</div>\n",
        summary.total,
    ));
}

fn destination_block(out: &mut String, to: &Destination<'_>) {
    out.push_str(&format!(
        "<div class=\"label-destination\">\n<strong>To:</strong><br>\n{}<br>\n{}<br>\n{}, {}<br>\n{}<br>\n{}\n</div>\n",
        escape(to.name),
        escape(to.street),
        escape(to.city),
        escape(to.state),
        escape(to.postal_code),
        escape(to.country),
    ));
}
