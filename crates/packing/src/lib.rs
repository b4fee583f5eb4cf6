//! Packing-list domain module.
//!
//! Shipment packing lists (boxes of garment models bound for one client), the
//! `LOMPL…` code scheme, and the assembly rules the entry form applies before
//! a packing list is stored. Pure domain logic: no IO, no HTTP, no storage.

pub mod code;
pub mod draft;
pub mod packing_list;

pub use code::PackingListCode;
pub use draft::{PackingListDraft, TrackingInput};
pub use packing_list::{BoxModel, Carrier, Dimensions, PackingList, ShippingBox, SizeQuantity};
