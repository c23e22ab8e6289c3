pub mod locality;
pub mod pinger;
pub mod probe;
pub mod types;
