pub mod charge;
pub mod peak;
pub mod snapshot;
