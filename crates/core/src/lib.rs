#![forbid(unsafe_code)]

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct TenantId(String);

    impl TenantId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, TenantIdError> {
            let value = value.into();
            validate_tenant_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum TenantIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl std::fmt::Display for TenantIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "tenant id must not be empty"),
                Self::TooLong => write!(f, "tenant id must be at most 64 chars"),
                Self::InvalidFirstChar => {
                    write!(f, "tenant id must start with an ascii alphanumeric char")
                }
                Self::InvalidChar { ch, index } => {
                    write!(f, "tenant id has invalid char {ch:?} at index {index}")
                }
            }
        }
    }

    impl std::error::Error for TenantIdError {}

    fn validate_tenant_id(value: &str) -> Result<(), TenantIdError> {
        if value.is_empty() {
            return Err(TenantIdError::Empty);
        }
        if value.len() > 64 {
            return Err(TenantIdError::TooLong);
        }
        let Some(first) = value.chars().next() else {
            return Err(TenantIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(TenantIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                continue;
            }
            return Err(TenantIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod model {
    use serde::{Deserialize, Serialize};

    /// Id of the virtual intake stage. Never assigned by a bucket sequence.
    pub const APPLIED_BUCKET_ID: u64 = 0;

    /// A named pipeline stage. `position` is a 1-based dense rank among the
    /// tenant's stored buckets; records persisted before the field existed
    /// decode with position 0.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Bucket {
        pub id: u64,
        pub title: String,
        pub position: u64,
    }

    impl Bucket {
        /// The synthetic intake stage prepended to every listing; not persisted.
        pub fn applied() -> Self {
            Self {
                id: APPLIED_BUCKET_ID,
                title: "Applied".to_string(),
                position: 0,
            }
        }
    }

    /// A candidate sitting in exactly one bucket (0 = Applied).
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Token {
        pub id: u64,
        pub bucket: u64,
        pub job: u64,
        pub email: String,
    }
}

pub mod view {
    use crate::model::{Bucket, Token};
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct BucketTokens {
        pub bucket: Bucket,
        pub tokens: Vec<Token>,
    }

    /// Presentation-ready join of a tenant's buckets and tokens, one lane per
    /// bucket (virtual Applied first) in ascending position order.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct PipelineView {
        pub lanes: Vec<BucketTokens>,
    }
}
