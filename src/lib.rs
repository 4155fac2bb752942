pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod ordering;
pub mod query;
pub mod remote;
pub mod seed;
pub mod shutdown;
pub mod store;
