use std::path::PathBuf;

use super::domain::{PolicyState, UserState};

/// Storage abstraction over the user and policy records.
///
/// Loads never fail on an absent record: implementations hand back (and may
/// persist) the documented defaults instead.
pub trait StateRepository: Send + Sync {
    fn load_user(&self) -> Result<UserState, RepositoryError>;
    fn store_user(&self, state: &UserState) -> Result<(), RepositoryError>;
    fn load_policy(&self) -> Result<PolicyState, RepositoryError>;
    fn store_policy(&self, state: &PolicyState) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("state file {} unavailable: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
