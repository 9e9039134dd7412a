//! HTTP clients for the services Kagami talks to.

pub mod anilist;
pub mod anizip;

pub use anilist::AniListClient;
pub use anizip::AniZipClient;

use std::time::Duration;

use crate::error::ClientError;

const USER_AGENT: &str = concat!("kagami/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client settings.
fn http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}
