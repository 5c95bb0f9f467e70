pub mod cache;
pub mod client;
pub mod lots;
pub mod query;
