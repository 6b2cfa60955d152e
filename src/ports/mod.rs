/// Ports module defining the interfaces the application core depends on
///
/// Outbound ports (driven ports) abstract the registry, the persisted cache
/// store, time, progress output, formatting and output destinations.
pub mod outbound;
