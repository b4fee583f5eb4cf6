use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lomartex_clients::Client;
use lomartex_core::{DomainError, DomainResult, Entity};

/// Shipping carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    #[default]
    #[serde(rename = "DHL")]
    Dhl,
    #[serde(rename = "FedEx")]
    FedEx,
    #[serde(rename = "UPS")]
    Ups,
    #[serde(rename = "TORRESTIR")]
    Torrestir,
    Other,
}

impl Carrier {
    pub const ALL: [Carrier; 5] = [
        Carrier::Dhl,
        Carrier::FedEx,
        Carrier::Ups,
        Carrier::Torrestir,
        Carrier::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Dhl => "DHL",
            Carrier::FedEx => "FedEx",
            Carrier::Ups => "UPS",
            Carrier::Torrestir => "TORRESTIR",
            Carrier::Other => "Other",
        }
    }

    /// Carrier name as printed, with the free-text name appended when present.
    pub fn display(&self, custom: Option<&str>) -> String {
        match custom.map(str::trim).filter(|c| !c.is_empty()) {
            Some(custom) => format!("{} - {}", self.as_str(), custom),
            None => self.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for Carrier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Carrier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Carrier::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown carrier: {s}")))
    }
}

/// Units of one size within one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub size: String,
    #[serde(default)]
    pub quantity: u32,
}

/// A style/color variant packed in a box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxModel {
    pub id: String,
    pub model_reference: String,
    pub model_description: String,
    pub color: String,
    pub size_quantities: Vec<SizeQuantity>,
}

impl BoxModel {
    pub fn new(
        reference: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            model_reference: reference.into(),
            model_description: description.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    /// Set the quantity for a size, keeping at most one entry per size.
    ///
    /// A zero quantity removes the entry.
    pub fn set_quantity(&mut self, size: &str, quantity: u32) {
        let existing = self.size_quantities.iter().position(|sq| sq.size == size);
        match (existing, quantity) {
            (Some(idx), 0) => {
                self.size_quantities.remove(idx);
            }
            (Some(idx), q) => self.size_quantities[idx].quantity = q,
            (None, 0) => {}
            (None, q) => self.size_quantities.push(SizeQuantity {
                size: size.to_string(),
                quantity: q,
            }),
        }
    }

    pub fn with_quantity(mut self, size: &str, quantity: u32) -> Self {
        self.set_quantity(size, quantity);
        self
    }

    pub fn total_quantity(&self) -> u64 {
        self.size_quantities.iter().map(|sq| u64::from(sq.quantity)).sum()
    }

    fn check_unique_sizes(&self) -> DomainResult<()> {
        for (i, sq) in self.size_quantities.iter().enumerate() {
            if self.size_quantities[..i].iter().any(|prev| prev.size == sq.size) {
                return Err(DomainError::invariant(format!(
                    "size {} appears more than once in model {}",
                    sq.size, self.model_reference
                )));
            }
        }
        Ok(())
    }
}

/// Box measurements in centimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// A physical shipping unit.
///
/// Named `ShippingBox` to stay clear of `std::boxed::Box`; serialized with the
/// same field names the form layer uses for a box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingBox {
    pub id: String,
    /// 1-based position within the packing list; 0 while unassigned.
    pub box_number: u32,
    pub dimensions: Dimensions,
    pub net_weight: f64,
    pub gross_weight: f64,
    pub models: Vec<BoxModel>,
    pub size_descriptions: Option<BTreeMap<String, String>>,
}

impl ShippingBox {
    /// Display label for a size code: the box's custom description when one
    /// is set, otherwise the raw code.
    pub fn size_label<'a>(&'a self, size: &'a str) -> &'a str {
        self.size_descriptions
            .as_ref()
            .and_then(|d| d.get(size))
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or(size)
    }

    pub fn total_quantity(&self) -> u64 {
        self.models.iter().map(BoxModel::total_quantity).sum()
    }
}

/// Packing list: a shipment manifest grouping boxes bound for one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackingList {
    pub code: String,
    pub client: Client,
    pub boxes: Vec<ShippingBox>,
    /// One shared value, or one value per box aligned by index.
    pub tracking_numbers: Vec<String>,
    pub carrier: Carrier,
    pub custom_carrier: Option<String>,
    pub po: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PackingList {
    /// Tracking number for the box at `index` (0-based), if any.
    pub fn tracking_for_index(&self, index: usize) -> Option<&str> {
        self.tracking_numbers
            .get(index)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Distinct non-blank tracking numbers, in first-seen order.
    pub fn distinct_tracking_numbers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for t in self.tracking_numbers.iter().map(|t| t.trim()) {
            if !t.is_empty() && !seen.contains(&t) {
                seen.push(t);
            }
        }
        seen
    }

    pub fn carrier_display(&self) -> String {
        self.carrier.display(self.custom_carrier.as_deref())
    }

    pub fn total_quantity(&self) -> u64 {
        self.boxes.iter().map(ShippingBox::total_quantity).sum()
    }

    /// Structural invariants every stored packing list must satisfy.
    pub fn check_invariants(&self) -> DomainResult<()> {
        for b in &self.boxes {
            for m in &b.models {
                m.check_unique_sizes()?;
            }
        }
        Ok(())
    }
}

impl Entity for PackingList {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}
