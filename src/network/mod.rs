//! Network layer - API calls executed in the Tokio async runtime

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::ApiClient;
