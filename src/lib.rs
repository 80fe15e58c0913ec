pub mod client;
pub mod error;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use error::ClientError;
