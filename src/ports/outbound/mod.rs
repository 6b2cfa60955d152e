/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (registry, cache store, clock, console, etc.).
pub mod clock;
pub mod formatter;
pub mod key_value_store;
pub mod output_presenter;
pub mod package_registry;
pub mod progress_reporter;

pub use clock::Clock;
pub use formatter::{GraphFormatter, TrendsFormatter};
pub use key_value_store::KeyValueStore;
pub use output_presenter::OutputPresenter;
pub use package_registry::PackageRegistry;
pub use progress_reporter::ProgressReporter;
