#![forbid(unsafe_code)]

mod store;

pub use store::{
    Advance, ApplyRequest, OrphanPolicy, PipelineStore, SaveBucketRequest, StoreConfig, StoreError,
};
