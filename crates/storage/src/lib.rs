#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    ActivityCounts, ActivityRepository, ActivityRow, InMemoryRepository, Storage, StorageError,
};
