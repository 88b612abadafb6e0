//! Episode document models.
//!
//! Field order is the serialized order, so changing it changes every
//! stored document on the next run.

use serde::{Deserialize, Serialize};

/// A season of the episode document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Free-text season label from the source.
    pub season_name: String,
    /// Parsed season index, `"1"` when the label carries none.
    pub season_number: String,
    pub season_episode: Vec<Episode>,
}

/// An episode and its stream servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_name: String,
    pub episode_server: Vec<Server>,
}

/// A playable stream entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub server_name: String,
    /// Always `embed`.
    pub server_type: String,
    pub server_link: String,
}
