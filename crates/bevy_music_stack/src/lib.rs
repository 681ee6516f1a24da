//! Bevy integration for the `music-stack` crate.
//!
//! Add [`MusicStackPlugin`] and spawn entities with a [`SceneBackgroundMusic`]
//! component. The element with the highest priority, newest first, controls
//! the music; despawning its entity hands control back with a crossfade.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_music_stack::{MusicStackPlugin, SceneBackgroundMusic};
//! use music_stack::backend::memory::MemoryAsset;
//! use music_stack::{BasicMusicStackElement, MusicId, MusicStackPriority};
//! use std::sync::Arc;
//!
//! fn spawn_boss_music(mut commands: Commands) {
//!     let asset = Arc::new(MemoryAsset::new(MusicId::from_raw(7)));
//!     commands.spawn(SceneBackgroundMusic::new(
//!         BasicMusicStackElement::new(asset).with_priority(MusicStackPriority::High),
//!     ));
//! }
//!
//! App::new()
//!     .add_plugins((DefaultPlugins, MusicStackPlugin::default()))
//!     .add_systems(Startup, spawn_boss_music)
//!     .run();
//! ```
//!
//! Fades run on real time by default; see [`MusicStackPluginConfig`].

pub mod events;
pub mod plugin;
pub mod scene_music;
pub mod stack;

pub use events::{MusicControlChanged, MusicOutputRequest};
pub use plugin::{MusicStackPlugin, MusicStackPluginConfig, MusicStackSet};
pub use scene_music::{
    SceneBackgroundMusic, SceneMusicKeys, register_scene_music, release_scene_music,
};
pub use stack::ActiveMusicStack;

pub use music_stack;
