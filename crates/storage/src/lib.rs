#![forbid(unsafe_code)]

pub mod file_store;
pub mod kv;
pub mod progress_store;

pub use file_store::FileStore;
pub use kv::{InMemoryStore, KeyValueStore, StorageError};
pub use progress_store::{PROBE_KEY, PROGRESS_KEY, ProgressStore, decode_progress};
