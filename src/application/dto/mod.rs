/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod graph_request;
mod graph_response;
mod output_format;
mod skipped_package;
mod trends_request;
mod trends_response;

pub use graph_request::GraphRequest;
pub use graph_response::GraphResponse;
pub use output_format::OutputFormat;
pub use skipped_package::SkippedPackage;
pub use trends_request::{TrendsRequest, DEFAULT_DAYS};
pub use trends_response::TrendsResponse;
