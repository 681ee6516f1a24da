//! Plugin wiring for the music stack within Bevy.
//!
//! The plugin owns the [`ActiveMusicStack`] resource, advances it every frame
//! and keeps it in sync with [`SceneBackgroundMusic`](crate::SceneBackgroundMusic)
//! components.

mod config;
mod systems;

pub use config::MusicStackPluginConfig;

use self::systems::{
    advance_music_stack, apply_output_requests, emit_control_changes, shutdown_on_exit,
};
use crate::events::{MusicControlChanged, MusicOutputRequest};
use crate::scene_music::{SceneMusicKeys, register_scene_music, release_scene_music};
use crate::stack::ActiveMusicStack;
use bevy::prelude::*;

/// System sets run by [`MusicStackPlugin`] in `PreUpdate`, in this order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MusicStackSet {
    /// Registration changes from components and requests.
    Sync,
    /// Fade advance and control change messages.
    Advance,
}

/// Bevy plugin driving a priority-ordered music stack.
#[derive(Default)]
pub struct MusicStackPlugin {
    config: MusicStackPluginConfig,
}

impl MusicStackPlugin {
    /// Create a plugin instance with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin instance using the provided configuration.
    pub fn with_config(config: MusicStackPluginConfig) -> Self {
        Self { config }
    }

    /// Apply mutations to the internal configuration prior to registering.
    pub fn configure(mut self, configure: impl FnOnce(&mut MusicStackPluginConfig)) -> Self {
        configure(&mut self.config);
        self
    }

    /// Access the current configuration.
    pub fn config(&self) -> &MusicStackPluginConfig {
        &self.config
    }
}

impl Plugin for MusicStackPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
        app.insert_resource(ActiveMusicStack::with_config(&self.config.stack));

        // Message channels always exist so users can read them unconditionally.
        app.add_message::<MusicControlChanged>();
        app.add_message::<MusicOutputRequest>();

        app.configure_sets(PreUpdate, (MusicStackSet::Sync, MusicStackSet::Advance).chain());
        app.add_systems(PreUpdate, apply_output_requests.in_set(MusicStackSet::Sync));

        if self.config.scene_music {
            app.init_resource::<SceneMusicKeys>();
            app.add_systems(
                PreUpdate,
                (release_scene_music, register_scene_music)
                    .chain()
                    .after(apply_output_requests)
                    .in_set(MusicStackSet::Sync),
            );
        }

        app.add_systems(PreUpdate, advance_music_stack.in_set(MusicStackSet::Advance));
        if self.config.control_events {
            app.add_systems(
                PreUpdate,
                emit_control_changes
                    .after(advance_music_stack)
                    .in_set(MusicStackSet::Advance),
            );
        }

        app.add_systems(Last, shutdown_on_exit);
    }
}
