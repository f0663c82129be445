#![forbid(unsafe_code)]

use super::records::{self, NS_BUCKETS, NS_TOKENS};
use super::{OrphanPolicy, PipelineStore, SaveBucketRequest, StoreError, ensure_tenant, now_ms};
use bk_core::ids::TenantId;
use bk_core::model::{APPLIED_BUCKET_ID, Bucket, Token};

enum Shift {
    Left,
    Right,
}

impl PipelineStore {
    /// Create (`id: None`) or rename (`id: Some`) a bucket. Creation appends
    /// at `stored_count + 1`; rename keeps the position.
    pub fn bucket_save(
        &mut self,
        tenant: &TenantId,
        request: SaveBucketRequest,
    ) -> Result<Bucket, StoreError> {
        let SaveBucketRequest { id, title } = request;
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::MissingTitle);
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        ensure_tenant(&tx, tenant, now_ms)?;

        let existing = match id {
            Some(id) => records::get::<Bucket>(&tx, tenant, NS_BUCKETS, id)?,
            None => None,
        };
        let bucket = match existing {
            Some(mut bucket) => {
                bucket.title = title;
                bucket
            }
            None => {
                let stored = records::list::<Bucket>(&tx, tenant, NS_BUCKETS)?;
                Bucket {
                    id: records::next_sequence(&tx, tenant, NS_BUCKETS)?,
                    title,
                    position: stored.len() as u64 + 1,
                }
            }
        };
        records::put(&tx, tenant, NS_BUCKETS, bucket.id, &bucket)?;
        tx.commit()?;
        Ok(bucket)
    }

    /// Delete a bucket and close the gap it leaves: every bucket ranked after
    /// it moves down one position in the same transaction. Tokens still in
    /// the bucket are handled per the configured orphan policy.
    pub fn bucket_delete(&mut self, tenant: &TenantId, id: u64) -> Result<bool, StoreError> {
        let orphan_policy = self.config.orphan_policy;
        let tx = self.conn.transaction()?;
        let mut stored = records::list::<Bucket>(&tx, tenant, NS_BUCKETS)?;
        stored.sort_by_key(|bucket| bucket.position);
        let Some(removed) = stored.iter().find(|bucket| bucket.id == id).cloned() else {
            tracing::debug!(tenant = tenant.as_str(), id, "delete of absent bucket");
            return Ok(false);
        };

        let tokens = records::list::<Token>(&tx, tenant, NS_TOKENS)?;
        let occupants: Vec<Token> = tokens
            .into_iter()
            .filter(|token| token.bucket == id)
            .collect();
        if !occupants.is_empty() {
            match orphan_policy {
                OrphanPolicy::RejectWhileOccupied => {
                    return Err(StoreError::BucketOccupied {
                        tokens: occupants.len() as u64,
                    });
                }
                OrphanPolicy::ReassignToApplied => {
                    for mut token in occupants {
                        token.bucket = APPLIED_BUCKET_ID;
                        records::put(&tx, tenant, NS_TOKENS, token.id, &token)?;
                    }
                }
            }
        }

        records::delete(&tx, tenant, NS_BUCKETS, id)?;
        for bucket in stored
            .iter_mut()
            .filter(|bucket| bucket.position > removed.position)
        {
            bucket.position -= 1;
            records::put(&tx, tenant, NS_BUCKETS, bucket.id, bucket)?;
        }
        tx.commit()?;
        Ok(true)
    }

    pub fn bucket_move_right(&mut self, tenant: &TenantId, id: u64) -> Result<u64, StoreError> {
        self.bucket_shift(tenant, id, Shift::Right)
    }

    pub fn bucket_move_left(&mut self, tenant: &TenantId, id: u64) -> Result<u64, StoreError> {
        self.bucket_shift(tenant, id, Shift::Left)
    }

    fn bucket_shift(
        &mut self,
        tenant: &TenantId,
        id: u64,
        shift: Shift,
    ) -> Result<u64, StoreError> {
        let tx = self.conn.transaction()?;
        let mut stored = records::list::<Bucket>(&tx, tenant, NS_BUCKETS)?;
        stored.sort_by_key(|bucket| bucket.position);
        let Some(index) = stored.iter().position(|bucket| bucket.id == id) else {
            return Err(StoreError::UnknownId);
        };

        let neighbor = match shift {
            Shift::Right => {
                if index + 1 == stored.len() {
                    tracing::debug!(tenant = tenant.as_str(), id, "bucket already last");
                    return Ok(stored[index].position);
                }
                index + 1
            }
            Shift::Left => {
                if index == 0 {
                    tracing::debug!(tenant = tenant.as_str(), id, "bucket already first");
                    return Ok(stored[index].position);
                }
                index - 1
            }
        };

        let position = stored[index].position;
        stored[index].position = stored[neighbor].position;
        stored[neighbor].position = position;
        records::put(&tx, tenant, NS_BUCKETS, stored[index].id, &stored[index])?;
        records::put(&tx, tenant, NS_BUCKETS, stored[neighbor].id, &stored[neighbor])?;
        tx.commit()?;
        Ok(stored[index].position)
    }

    /// Stored buckets in ascending position order, with the virtual Applied
    /// stage always first.
    pub fn bucket_list(&self, tenant: &TenantId) -> Result<Vec<Bucket>, StoreError> {
        let mut stored = records::list::<Bucket>(&self.conn, tenant, NS_BUCKETS)?;
        stored.sort_by_key(|bucket| bucket.position);
        let mut buckets = Vec::with_capacity(stored.len() + 1);
        buckets.push(Bucket::applied());
        buckets.extend(stored);
        Ok(buckets)
    }
}
