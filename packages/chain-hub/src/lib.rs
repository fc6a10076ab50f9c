pub mod address;
pub mod assets;
pub mod bootstrap;
pub mod config;
pub mod connection;
pub mod denom;
pub mod error;
pub mod hub;
pub mod registry;
pub mod route;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

pub use bootstrap::RegistrationFailure;
pub use config::{ChainCapabilities, ForwardDefaults, HubConfig};
pub use error::{HubError, HubResult};
pub use hub::{ChainHub, ChainInfoSource, MemoryStore, StaticChainSource};
pub use store::{ChainAlias, HubStore, HubView};
pub use types::*;
