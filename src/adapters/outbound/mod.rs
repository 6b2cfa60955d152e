/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod cache;
pub mod clock;
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
pub mod storage;
