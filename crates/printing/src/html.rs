//! Markup helpers: escaping, number formatting, print styles and the
//! document shell.

use crate::layout::Layout;

/// Escape text for interpolation into element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shortest decimal form: `3` rather than `3.0`, `2.5` stays `2.5`.
pub fn number(value: f64) -> String {
    if value.is_finite() { format!("{value}") } else { "0".to_string() }
}

/// `L x W x H cm`.
pub fn dimensions(d: &lomartex_packing::Dimensions) -> String {
    format!(
        "{} x {} x {} cm",
        number(d.length),
        number(d.width),
        number(d.height)
    )
}

/// Escape each part and join with line breaks.
pub fn lines<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts.into_iter().map(escape).collect::<Vec<_>>().join("<br>")
}

/// Print stylesheet for a layout.
pub fn print_styles(layout: Layout) -> String {
    let paper = layout.paper();
    format!(
        r#"
    @page {{
      size: {width} {height};
      margin: {margin};
    }}
    body {{
      margin: 0;
      padding: 0;
      font-family: Arial, sans-serif;
      font-size: {body_font};
    }}
    @media print {{
      body {{
        width: {width};
        height: {height};
      }}
      .no-print {{
        display: none !important;
      }}
    }}
    table {{
      width: 100%;
      border-collapse: collapse;
      margin-bottom: 1rem;
      page-break-inside: avoid;
    }}
    th, td {{
      border: 1px solid #ddd;
      padding: 4px;
      text-align: left;
      vertical-align: top;
      font-size: {cell_font};
    }}
    th {{
      background-color: #f8f9fa;
    }}
    .num {{
      text-align: right;
    }}
    .box-label {{
      page-break-after: always;
      border: 1px solid #000;
      padding: 5mm;
      height: 150mm;
      box-sizing: border-box;
      position: relative;
    }}
    .box-label:last-child {{
      page-break-after: avoid;
    }}
    .label-header {{
      text-align: center;
      font-size: 12pt;
      font-weight: bold;
      margin-bottom: 3mm;
      border-bottom: 1px solid #000;
    }}
    .label-code {{
      font-size: 10pt;
      margin-bottom: 3mm;
    }}
    .label-info {{
      float: left;
      width: 60%;
    }}
    .label-destination {{
      float: right;
      width: 40%;
    }}
    .clear {{
      clear: both;
    }}
    .manifest-page {{
      page-break-after: always;
      position: relative;
      min-height: 270mm;
      padding-bottom: 10mm;
      box-sizing: border-box;
    }}
    .manifest-page:last-child {{
      page-break-after: avoid;
    }}
    .manifest-header {{
      text-align: center;
      margin-bottom: 5mm;
      position: relative;
    }}
    .manifest-header h1 {{
      font-size: 18pt;
      margin: 0;
    }}
    .manifest-code {{
      font-size: 12pt;
      margin-top: 2mm;
    }}
    .page-footer {{
      position: absolute;
      bottom: 0;
      width: 100%;
      text-align: center;
      font-size: 8pt;
    }}
    .total-row {{
      font-weight: bold;
      background-color: #f8f9fa;
    }}
    .sizes-cell {{
      font-size: {sizes_font};
    }}
    .qr-code {{
      position: absolute;
      top: 5mm;
      right: 5mm;
      width: 20mm;
      height: 20mm;
    }}
    .manifest-header .qr-code {{
      top: 0;
      right: 0;
    }}
  "#,
        width = paper.width,
        height = paper.height,
        margin = paper.margin,
        body_font = paper.body_font,
        cell_font = paper.cell_font,
        sizes_font = paper.sizes_font,
    )
}

/// Wrap rendered page markup into a standalone HTML document.
pub fn document(layout: Layout, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        print_styles(layout),
        body
    )
}
