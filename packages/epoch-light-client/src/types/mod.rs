//! Types shared by the epoch light client

pub mod client_type;
pub mod height;
pub mod validator_set;
