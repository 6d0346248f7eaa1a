pub mod snapshot;
pub use snapshot::SalesSnapshot;
pub mod loader;
pub use loader::load_snapshot;

#[cfg(test)]
pub(crate) mod fixtures;
