#![forbid(unsafe_code)]

/// What happens to tokens still referencing a bucket when that bucket is
/// deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Move the bucket's tokens back to the virtual Applied stage.
    #[default]
    ReassignToApplied,
    /// Refuse to delete a bucket that still holds tokens.
    RejectWhileOccupied,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub orphan_policy: OrphanPolicy,
}
