//! Records with a stable identity.

/// A record keyed by an identifier that never changes once assigned.
///
/// Clients are keyed by `ClientId`, packing lists by their code.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
