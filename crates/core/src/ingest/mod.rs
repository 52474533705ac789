pub mod error;
pub mod provider;

pub use error::UpstreamError;
pub use provider::{NasaClient, SpaceDataClient};
