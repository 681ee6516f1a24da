//! Priority-ordered background music stack.
//!
//! Game systems that want music (a scene, a boss fight, a menu) register an
//! element on a [`MusicStack`]. The element with the highest priority, and
//! among equals the most recent one, controls the music. Whenever control
//! changes the stack crossfades between players, reusing a player when both
//! elements play the same content, and releases players once they have faded
//! to silence.
//!
//! # Crate feature flags
//! - `streaming` (optional): real audio output via rodio ([`backend::rodio`])
//!
//! # Quick start
//! ```
//! use music_stack::backend::memory::MemoryAsset;
//! use music_stack::{BasicMusicStackElement, MusicRegistry, MusicStack, Transition};
//! use std::sync::Arc;
//!
//! let registry = MusicRegistry::new();
//! let mut stack = MusicStack::new();
//!
//! let theme = Arc::new(MemoryAsset::new(registry.id_for("music/theme.ogg")));
//! let element = BasicMusicStackElement::new(theme.clone())
//!     .with_transition_in(Transition::CROSS_FADE);
//! let key = stack.add(Arc::new(element)).unwrap();
//!
//! // Two seconds of frames later the theme is fully faded in.
//! for _ in 0..120 {
//!     stack.advance(1.0 / 60.0);
//! }
//! assert!(theme.last_player().unwrap().is_playing());
//!
//! stack.remove(key).unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`stack`] - the stack, transitions and per-tick sweep
//! - [`controller`] - per-player fade state machine
//! - [`asset`] - asset/player traits and the id registry
//! - [`element`] - stack element trait and a plain implementation
//! - [`scene`] - scoped registrations that unregister on drop
//! - [`loop_timing`] - intro/loop arithmetic
//! - [`config`] - RON configuration
//! - [`backend`] - memory and rodio implementations

pub mod asset;
pub mod backend;
pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod key;
pub mod loop_timing;
pub mod scene;
pub mod stack;
pub mod transition;

pub use asset::{MixerGroup, MusicAsset, MusicId, MusicPlayer, MusicRegistry, REGISTRY_ID_BASE};
pub use config::{MusicStackConfig, SceneMusicConfig};
pub use controller::{FadeState, PlayerController};
pub use element::{BasicMusicStackElement, MusicStackElement};
pub use error::{MusicStackError, Result};
pub use key::{MusicStackPriority, PriorityKey};
pub use loop_timing::{LoopTiming, MusicData};
pub use scene::SceneMusic;
pub use stack::{MusicStack, SharedMusicStack};
pub use transition::Transition;
