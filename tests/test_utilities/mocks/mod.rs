/// Mock implementations for testing
mod fixed_clock;
mod mock_package_registry;
mod mock_progress_reporter;

pub use fixed_clock::FixedClock;
pub use mock_package_registry::MockPackageRegistry;
pub use mock_progress_reporter::MockProgressReporter;
