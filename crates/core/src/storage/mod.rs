pub mod file_store;
pub mod format;
pub mod keys;
pub mod kv;
pub mod manager;
pub mod mirror;
