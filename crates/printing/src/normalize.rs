//! Entry-boundary normalization.
//!
//! `Shipment::from_packing_list` runs the mandatory checks and then fills
//! every optional field with its printed default exactly once, so the
//! aggregation and layout code never deals with absent data.

use lomartex_packing::{Dimensions, PackingList, ShippingBox};

use crate::error::{MissingField, PrintError};

/// Destination block printed on labels and the manifest cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination<'a> {
    pub name: &'a str,
    pub street: &'a str,
    pub postal_code: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
}

/// One model within a box, with sizes resolved to display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLine<'a> {
    pub reference: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    /// `(display label, quantity)` in input order; zero quantities removed.
    pub sizes: Vec<(&'a str, u64)>,
}

impl ModelLine<'_> {
    pub fn total(&self) -> u64 {
        self.sizes.iter().map(|(_, qty)| qty).sum()
    }

    /// `label:qty` pairs joined by a space, e.g. `M:5 L:2`.
    pub fn sizes_text(&self) -> String {
        self.sizes
            .iter()
            .map(|(label, qty)| format!("{label}:{qty}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A box as printed.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLine<'a> {
    /// 1-based number shown as `number/total`.
    pub number: u32,
    pub gross_weight: f64,
    pub dimensions: Dimensions,
    /// Tracking number at this box's index position.
    pub tracking: Option<&'a str>,
    pub models: Vec<ModelLine<'a>>,
}

impl BoxLine<'_> {
    pub fn total(&self) -> u64 {
        self.models.iter().map(ModelLine::total).sum()
    }
}

/// Fully-populated, read-only view of a packing list ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment<'a> {
    pub code: &'a str,
    pub po: Option<&'a str>,
    pub destination: Destination<'a>,
    pub carrier: String,
    pub boxes: Vec<BoxLine<'a>>,
    /// Distinct non-blank tracking numbers across the whole list.
    pub distinct_tracking: Vec<&'a str>,
}

impl<'a> Shipment<'a> {
    /// Check the four mandatory fields, then normalize.
    pub fn from_packing_list(packing_list: Option<&'a PackingList>) -> Result<Self, PrintError> {
        let list = check_mandatory(packing_list)?;

        let destination = match list.client.address.as_ref() {
            Some(a) => Destination {
                name: list.client.name.as_str(),
                street: a.street.as_str(),
                postal_code: a.postal_code.as_str(),
                city: a.city.as_str(),
                state: a.state.as_str(),
                country: a.country.as_str(),
            },
            None => Destination {
                name: list.client.name.as_str(),
                street: "",
                postal_code: "",
                city: "",
                state: "",
                country: "",
            },
        };

        let boxes = list
            .boxes
            .iter()
            .enumerate()
            .map(|(idx, b)| box_line(list, idx, b))
            .collect();

        Ok(Shipment {
            code: list.code.trim(),
            po: list.po.as_deref().map(str::trim).filter(|p| !p.is_empty()),
            destination,
            carrier: list.carrier_display(),
            boxes,
            distinct_tracking: list.distinct_tracking_numbers(),
        })
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Whether more than one distinct tracking number exists.
    pub fn has_multiple_tracking(&self) -> bool {
        self.distinct_tracking.len() > 1
    }

    pub fn total_items(&self) -> u64 {
        self.boxes.iter().map(BoxLine::total).sum()
    }
}

fn check_mandatory(packing_list: Option<&PackingList>) -> Result<&PackingList, PrintError> {
    let list = packing_list.ok_or(PrintError::Validation(MissingField::PackingList))?;
    if list.boxes.is_empty() {
        return Err(PrintError::Validation(MissingField::Boxes));
    }
    if list.client.name.trim().is_empty() || list.client.address.is_none() {
        return Err(PrintError::Validation(MissingField::Client));
    }
    if list.code.trim().is_empty() {
        return Err(PrintError::Validation(MissingField::Code));
    }
    Ok(list)
}

fn box_line<'a>(list: &'a PackingList, idx: usize, b: &'a ShippingBox) -> BoxLine<'a> {
    let models = b
        .models
        .iter()
        .map(|m| ModelLine {
            reference: m.model_reference.as_str(),
            description: m.model_description.as_str(),
            color: m.color.as_str(),
            sizes: m
                .size_quantities
                .iter()
                .filter(|sq| sq.quantity > 0)
                .map(|sq| (b.size_label(&sq.size), u64::from(sq.quantity)))
                .collect(),
        })
        .collect();

    BoxLine {
        number: if b.box_number == 0 { (idx + 1) as u32 } else { b.box_number },
        gross_weight: b.gross_weight,
        dimensions: b.dimensions,
        tracking: list.tracking_for_index(idx),
        models,
    }
}
