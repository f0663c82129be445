#![forbid(unsafe_code)]

use super::records::{self, NS_BUCKETS, NS_TOKENS};
use super::{ApplyRequest, PipelineStore, StoreError, ensure_tenant, now_ms};
use bk_core::ids::TenantId;
use bk_core::model::{APPLIED_BUCKET_ID, Bucket, Token};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved(Token),
    /// The token sat in the last-positioned bucket and left the pipeline.
    Graduated,
}

impl PipelineStore {
    pub fn token_apply(
        &mut self,
        tenant: &TenantId,
        request: ApplyRequest,
    ) -> Result<Token, StoreError> {
        let ApplyRequest { bucket, job, email } = request;
        let email = email.trim().to_string();
        if email.is_empty() {
            return Err(StoreError::MissingEmail);
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        ensure_tenant(&tx, tenant, now_ms)?;

        let bucket = bucket.unwrap_or(APPLIED_BUCKET_ID);
        if bucket != APPLIED_BUCKET_ID
            && records::get::<Bucket>(&tx, tenant, NS_BUCKETS, bucket)?.is_none()
        {
            return Err(StoreError::UnknownId);
        }

        let token = Token {
            id: records::next_sequence(&tx, tenant, NS_TOKENS)?,
            bucket,
            job,
            email,
        };
        records::put(&tx, tenant, NS_TOKENS, token.id, &token)?;
        tx.commit()?;
        Ok(token)
    }

    /// Move a token to the bucket ranked one past its current stage, or
    /// graduate it out of the pipeline when no such bucket exists.
    pub fn token_advance(&mut self, tenant: &TenantId, id: u64) -> Result<Advance, StoreError> {
        let tx = self.conn.transaction()?;
        let Some(mut token) = records::get::<Token>(&tx, tenant, NS_TOKENS, id)? else {
            return Err(StoreError::UnknownId);
        };

        let buckets = records::list::<Bucket>(&tx, tenant, NS_BUCKETS)?;
        // The virtual Applied stage ranks at 0; a dangling reference does
        // too, so such a token re-enters at position 1.
        let position = buckets
            .iter()
            .find(|bucket| bucket.id == token.bucket)
            .map(|bucket| bucket.position)
            .unwrap_or(0);

        match buckets.iter().find(|bucket| bucket.position == position + 1) {
            Some(next) => {
                token.bucket = next.id;
                records::put(&tx, tenant, NS_TOKENS, token.id, &token)?;
                tx.commit()?;
                Ok(Advance::Moved(token))
            }
            None => {
                records::delete(&tx, tenant, NS_TOKENS, id)?;
                tx.commit()?;
                Ok(Advance::Graduated)
            }
        }
    }

    pub fn token_remove(&mut self, tenant: &TenantId, id: u64) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = records::delete(&tx, tenant, NS_TOKENS, id)?;
        tx.commit()?;
        Ok(deleted)
    }

    pub fn token_list(&self, tenant: &TenantId) -> Result<Vec<Token>, StoreError> {
        records::list(&self.conn, tenant, NS_TOKENS)
    }
}
