//! RON configuration for stacks and scene music.
//!
//! ```ron
//! (
//!     music: Some("music/town.ogg"),
//!     priority: normal,
//!     transition_in: (fade_out_time: 2.0, fade_in_time: 2.0),
//!     transition_out: "quick_out",
//!     desired_volume: 0.8,
//! )
//! ```

use crate::asset::{MixerGroup, MusicAsset, MusicRegistry};
use crate::element::BasicMusicStackElement;
use crate::error::Result;
use crate::key::MusicStackPriority;
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stack-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicStackConfig {
    /// Mixer group every created player is routed to.
    pub output: Option<MixerGroup>,
}

impl MusicStackConfig {
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }
}

/// Serializable description of a [`BasicMusicStackElement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneMusicConfig {
    /// Content key of the music, `None` for silence.
    pub music: Option<String>,
    pub priority: MusicStackPriority,
    #[serde(deserialize_with = "crate::transition::preset_or_timings")]
    pub transition_in: Transition,
    #[serde(deserialize_with = "crate::transition::preset_or_timings")]
    pub transition_out: Transition,
    pub desired_volume: f32,
}

impl Default for SceneMusicConfig {
    fn default() -> Self {
        Self {
            music: None,
            priority: MusicStackPriority::Low,
            transition_in: Transition::CROSS_FADE,
            transition_out: Transition::CROSS_FADE,
            desired_volume: 1.0,
        }
    }
}

impl SceneMusicConfig {
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Build an element, turning the content key into an asset with `resolve`.
    ///
    /// `resolve` receives the key and the id the registry assigned to it, so
    /// every element built for the same key shares a player.
    pub fn into_element<F>(
        self,
        registry: &MusicRegistry,
        resolve: F,
    ) -> Result<BasicMusicStackElement>
    where
        F: FnOnce(&str, crate::asset::MusicId) -> Result<Arc<dyn MusicAsset>>,
    {
        let music = match self.music.as_deref() {
            Some(key) => Some(resolve(key, registry.id_for(key))?),
            None => None,
        };
        Ok(BasicMusicStackElement {
            music,
            priority: self.priority,
            transition_in: self.transition_in,
            transition_out: self.transition_out,
            desired_volume: self.desired_volume,
        })
    }
}
