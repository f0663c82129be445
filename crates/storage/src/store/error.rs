#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    MissingTitle,
    MissingEmail,
    UnknownId,
    TenantExists,
    BucketOccupied { tokens: u64 },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::MissingTitle => write!(f, "bucket title must not be empty"),
            Self::MissingEmail => write!(f, "token email must not be empty"),
            Self::UnknownId => write!(f, "unknown id"),
            Self::TenantExists => write!(f, "tenant already exists"),
            Self::BucketOccupied { tokens } => {
                write!(f, "bucket still holds {tokens} token(s)")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
