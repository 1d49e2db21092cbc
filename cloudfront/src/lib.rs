pub mod client;
pub mod config;
pub mod error;
pub mod invalidator;
pub mod resource;
pub mod util;
