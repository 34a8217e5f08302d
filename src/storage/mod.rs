//! Storage implementations for the content host and the settings store

pub mod in_memory;
pub mod json_file;

pub use in_memory::{HostSnapshot, InMemoryHost, InMemorySettings};
pub use json_file::JsonFileSettings;
