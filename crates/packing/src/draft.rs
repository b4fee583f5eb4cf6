//! Form submission → packing-list record assembly.

use serde::{Deserialize, Serialize};

use lomartex_clients::Client;
use lomartex_core::{DomainError, DomainResult};

use crate::code::PackingListCode;
use crate::packing_list::{Carrier, PackingList, ShippingBox};

/// How the entry form supplied tracking numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum TrackingInput {
    /// One number used for every box.
    Shared(String),
    /// One number per box, aligned by index.
    PerBox(Vec<String>),
}

impl Default for TrackingInput {
    fn default() -> Self {
        TrackingInput::PerBox(Vec::new())
    }
}

/// Packing list as submitted by the entry form, before assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackingListDraft {
    pub client: Client,
    pub boxes: Vec<ShippingBox>,
    pub tracking: TrackingInput,
    pub carrier: Carrier,
    pub custom_carrier: Option<String>,
    pub po: Option<String>,
}

impl PackingListDraft {
    /// Submit-time checks: a client with a name and an address, and at least one box.
    pub fn validate(&self) -> DomainResult<()> {
        if self.client.name.trim().is_empty() || self.client.address.is_none() {
            return Err(DomainError::validation("client name and address are required"));
        }
        if self.boxes.is_empty() {
            return Err(DomainError::validation("at least one box is required"));
        }
        Ok(())
    }

    /// Assemble the record stored under `code`.
    ///
    /// A shared tracking number is fanned out to one copy per box, unnumbered
    /// boxes get their 1-based position, and the custom carrier name is only
    /// kept for `Carrier::Other`.
    pub fn into_packing_list(self, code: PackingListCode) -> DomainResult<PackingList> {
        self.validate()?;

        let box_count = self.boxes.len();
        let tracking_numbers = match self.tracking {
            TrackingInput::Shared(number) => vec![number.trim().to_string(); box_count],
            TrackingInput::PerBox(numbers) => numbers.into_iter().map(|n| n.trim().to_string()).collect(),
        };

        let boxes = self
            .boxes
            .into_iter()
            .enumerate()
            .map(|(idx, mut b)| {
                if b.box_number == 0 {
                    b.box_number = (idx + 1) as u32;
                }
                b
            })
            .collect();

        let custom_carrier = match self.carrier {
            Carrier::Other => non_blank(self.custom_carrier),
            _ => None,
        };

        let list = PackingList {
            code: code.into_string(),
            client: self.client,
            boxes,
            tracking_numbers,
            carrier: self.carrier,
            custom_carrier,
            po: non_blank(self.po),
            created_at: None,
            updated_at: None,
        };
        list.check_invariants()?;
        Ok(list)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
