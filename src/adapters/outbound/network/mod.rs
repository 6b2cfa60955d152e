/// Network adapters for the npm registry
mod caching_registry_client;
mod npm_registry_client;

pub use caching_registry_client::CachingPackageRegistry;
pub use npm_registry_client::{NpmRegistryClient, DEFAULT_DOWNLOADS_URL, DEFAULT_REGISTRY_URL};
