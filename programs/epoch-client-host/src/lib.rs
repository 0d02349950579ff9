#![doc = "Host glue for the epoch light client: stores client and consensus states, routes messages to the registered client type and freezes clients on misbehaviour"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    unused_crate_dependencies
)]

pub mod config;
pub mod contract;
pub mod error;
pub mod msg;
pub mod query;
pub mod registry;
pub mod state;
pub mod sudo;

pub use contract::ClientHost;
pub use error::HostError;
