/// Domain layer - graph and download-trend models plus the pure services
/// that build them. Nothing in here performs I/O.
pub mod domain;
pub mod policies;
pub mod services;
