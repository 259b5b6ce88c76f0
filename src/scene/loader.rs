//! Asynchronous model loading seam
//!
//! Requests are fire-and-forget; completions are polled once per frame. Every
//! request carries the session generation it was made for, so a model that
//! arrives after the player has moved on can be recognised and dropped.

use serde::{Deserialize, Serialize};

/// Renderer-side handle of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelHandle(pub u32);

/// Identifies what a load was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    /// Session generation at request time
    pub generation: u64,
    /// Index into the course's decoration list
    pub decoration: usize,
}

/// A model that failed to load
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to load model '{asset}': {message}")]
pub struct LoadError {
    pub asset: String,
    pub message: String,
}

/// The external model loader
pub trait ModelLoader {
    /// Start loading `asset`; the result shows up in a later `drain_completed`
    fn request(&mut self, asset: &str, ticket: LoadTicket);

    /// Loads that finished since the last call, in completion order
    fn drain_completed(&mut self) -> Vec<(LoadTicket, Result<ModelHandle, LoadError>)>;
}
