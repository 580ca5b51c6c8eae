//! Core myGengo API client

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod response;
pub mod signer;
pub mod throttle;
