use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{PolicyState, UserState};
use super::repository::{RepositoryError, StateRepository};

const USER_FILE_NAME: &str = "user.json";
const POLICY_FILE_NAME: &str = "policy.json";

/// JSON-file backed repository holding one file per record.
///
/// Absent or unreadable records are replaced with defaults on first access.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    dir: PathBuf,
}

impl JsonFileStateStore {
    /// Open the store and make sure both records exist on disk.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| RepositoryError::Io {
            path: dir.clone(),
            source,
        })?;

        let store = Self { dir };
        store.load_user()?;
        store.load_policy()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE_NAME)
    }

    fn policy_path(&self) -> PathBuf {
        self.dir.join(POLICY_FILE_NAME)
    }

    fn load_or_init<T>(&self, path: &Path) -> Result<T, RepositoryError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(record) => return Ok(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "corrupt state record, restoring defaults");
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "state record missing, writing defaults");
            }
            Err(source) => {
                return Err(RepositoryError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        let record = T::default();
        write_record(path, &record)?;
        Ok(record)
    }
}

impl StateRepository for JsonFileStateStore {
    fn load_user(&self) -> Result<UserState, RepositoryError> {
        self.load_or_init(&self.user_path())
    }

    fn store_user(&self, state: &UserState) -> Result<(), RepositoryError> {
        write_record(&self.user_path(), state)
    }

    fn load_policy(&self) -> Result<PolicyState, RepositoryError> {
        self.load_or_init(&self.policy_path())
    }

    fn store_policy(&self, state: &PolicyState) -> Result<(), RepositoryError> {
        write_record(&self.policy_path(), state)
    }
}

fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), RepositoryError> {
    let bytes = serde_json::to_vec_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |source| RepositoryError::Io {
        path: tmp.clone(),
        source,
    };

    {
        let mut file = File::create(&tmp).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }

    std::fs::rename(&tmp, path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
