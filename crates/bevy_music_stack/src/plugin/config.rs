use bevy::prelude::Resource;
use music_stack::{MixerGroup, MusicStackConfig};
use serde::Deserialize;

/// Configuration object used to enable/disable individual subsystems of the plugin.
#[derive(Debug, Clone, Resource, Deserialize)]
#[serde(default)]
pub struct MusicStackPluginConfig {
    /// Settings for the stack resource created by the plugin.
    pub stack: MusicStackConfig,
    /// Register and unregister `SceneBackgroundMusic` components automatically.
    pub scene_music: bool,
    /// Emit `MusicControlChanged` messages.
    pub control_events: bool,
    /// Advance fades on real time so pausing the game does not stall them.
    pub use_real_time: bool,
}

impl Default for MusicStackPluginConfig {
    fn default() -> Self {
        Self {
            stack: MusicStackConfig::default(),
            scene_music: true,
            control_events: true,
            use_real_time: true,
        }
    }
}

impl MusicStackPluginConfig {
    /// Parse a configuration written in RON.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    pub fn output(mut self, output: impl Into<MixerGroup>) -> Self {
        self.stack.output = Some(output.into());
        self
    }

    pub fn scene_music(mut self, enabled: bool) -> Self {
        self.scene_music = enabled;
        self
    }

    pub fn control_events(mut self, enabled: bool) -> Self {
        self.control_events = enabled;
        self
    }

    pub fn use_real_time(mut self, enabled: bool) -> Self {
        self.use_real_time = enabled;
        self
    }
}
