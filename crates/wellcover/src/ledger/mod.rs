//! Persisted wellness state: meal log, diet settings, and policy figures.

pub mod domain;
pub mod file_store;
mod records;
pub mod repository;

pub use domain::{MealItem, MealLogEntry, PolicyState, UserState};
pub use file_store::JsonFileStateStore;
pub use repository::{RepositoryError, StateRepository};
