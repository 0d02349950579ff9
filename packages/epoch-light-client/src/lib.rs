#![doc = "Light client for chains secured by epoch-rotating committees, with equivocation-based misbehaviour detection"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    unused_crate_dependencies
)]

/// Ensure that a condition is true, otherwise return an error.
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub mod client_state;
pub mod consensus_state;
pub mod decoder;
pub mod error;
pub mod header;
pub mod identifier;
pub mod misbehaviour;
pub mod quorum;
pub mod types;
pub mod update;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
