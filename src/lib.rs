//! Client for the local REST API of a Philips Hue bridge.
//!
//! A [`Bridge`] holds the bridge address and the credential (the "user ID" the
//! bridge issued when its link button was pressed). Both are resolved lazily:
//! the address through the public discovery service when it was not given,
//! and the credential from the caller or from [`Config`].
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! let bridge = huebridge::Bridge::for_ip([192u8, 168, 0, 4])
//!     .with_user("rVV05G0i52vQMMLn6BK3dpr0F3uDiqtDjPLPK2uj");
//! for light in bridge.get_all_lights().await.unwrap() {
//!     println!("{:>3} {}", light.id, light.name);
//! }
//! bridge.turn_on_light_with_color(4, 0.2, 0.9, 100, 200, 200).await.unwrap();
//! # })
//! ```

mod bridge;
mod collection;
mod config;
mod disco;
mod resource;
mod validate;

#[cfg(test)]
mod test_support;

pub use bridge::Bridge;
pub use config::Config;
pub use resource::*;

/// Errors returned by every bridge operation.
#[derive(Debug, thiserror::Error)]
pub enum HueError {
    /// A local precondition failed; no request was sent for the operation.
    #[error("{0}")]
    Validation(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
    /// The bridge answered with one or more `error` entries.
    #[error("bridge error {code}: {msg}")]
    BridgeError { code: usize, msg: String },
    #[error("Unable to delete group {id}: Can't delete group with a type of {group_type}")]
    GroupNotDeletable { id: u32, group_type: String },
    #[error("A network error occured: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Could not decode bridge response: {msg}")]
    DecodeError { msg: String },
    #[error("Bridge discovery failed: {msg}")]
    DiscoveryError { msg: String },
    #[error("No usable credential: {msg}")]
    CredentialError { msg: String },
    #[error("Invalid configuration: {0}")]
    Config(Box<figment::Error>),
}

impl HueError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        HueError::Validation(msg.into())
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        HueError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub(crate) fn decode_err(msg: impl Into<String>) -> Self {
        HueError::DecodeError { msg: msg.into() }
    }

    /// Returns `true` for [`HueError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, HueError::NotFound { .. })
    }
}

impl From<serde_json::Error> for HueError {
    fn from(err: serde_json::Error) -> Self {
        HueError::decode_err(err.to_string())
    }
}

impl From<figment::Error> for HueError {
    fn from(err: figment::Error) -> Self {
        HueError::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, HueError>;
