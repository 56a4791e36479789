//! REST resource abstraction
//!
//! Drives an arbitrary HTTP endpoint as a resource with a stable id.
//!
//! # Architecture
//!
//! - [`fetcher`] - request + decode + narrow + resolve id
//! - [`lifecycle`] - Create/Read/Update/Delete/Exists on top of the fetcher
//! - [`data_source`] - read-only variant that fetches on every read
//! - [`state`] - the record a host persists between invocations
//!
//! # Example
//!
//! ```no_run
//! use resty::config::{ProviderConfig, ResourceConfig};
//! use resty::resource::RestResource;
//!
//! async fn create() -> Result<(), resty::error::ResourceError> {
//!     let resource = RestResource::new(ProviderConfig::default());
//!     let state = resource.create(&ResourceConfig::new("https://api.example.com/items/1")).await?;
//!     println!("{} -> {}", state.id, state.response);
//!     Ok(())
//! }
//! ```

pub mod data_source;
pub mod fetcher;
pub mod lifecycle;
pub mod state;

pub use data_source::RestDataSource;
pub use fetcher::{interpret, Clock, Fetched, Fetcher};
pub use lifecycle::{plan, Plan, RestResource};
pub use state::ResourceState;
