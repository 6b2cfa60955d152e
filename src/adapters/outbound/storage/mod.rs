/// Storage adapters - KeyValueStore implementations
mod file_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
