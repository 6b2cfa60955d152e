/// Type alias for Result with anyhow::Error as the error type.
/// Domain errors from [`crate::shared::error::ScopeGraphError`] travel inside it
/// and can be recovered with `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
