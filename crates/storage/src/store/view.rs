#![forbid(unsafe_code)]

use super::{PipelineStore, StoreError};
use bk_core::ids::TenantId;
use bk_core::view::{BucketTokens, PipelineView};

impl PipelineStore {
    /// Join buckets and tokens into one lane per bucket (virtual Applied
    /// first), every lane present even when empty. Read-only.
    pub fn render(&self, tenant: &TenantId) -> Result<PipelineView, StoreError> {
        let buckets = self.bucket_list(tenant)?;
        let tokens = self.token_list(tenant)?;

        let lanes = buckets
            .into_iter()
            .map(|bucket| {
                let tokens = tokens
                    .iter()
                    .filter(|token| token.bucket == bucket.id)
                    .cloned()
                    .collect();
                BucketTokens { bucket, tokens }
            })
            .collect();
        Ok(PipelineView { lanes })
    }
}
