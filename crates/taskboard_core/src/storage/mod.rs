pub mod kv;
pub mod persisted;

pub use kv::{FileStore, KeyValueStore, MemoryStore, data_dir};
pub use persisted::{Persisted, read, write};
