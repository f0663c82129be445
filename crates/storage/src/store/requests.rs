#![forbid(unsafe_code)]

/// `id: None` creates a bucket appended at the end of the ranking;
/// `Some(id)` renames the bucket with that id, keeping its position. A
/// `Some(id)` that matches no stored bucket falls back to create with a
/// fresh sequence id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveBucketRequest {
    pub id: Option<u64>,
    pub title: String,
}

/// `bucket: None` files the token under the virtual Applied stage; an
/// explicit hint must name a live bucket (or 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyRequest {
    pub bucket: Option<u64>,
    pub job: u64,
    pub email: String,
}
