mod dependency_priority;

pub use dependency_priority::DependencyPriority;
