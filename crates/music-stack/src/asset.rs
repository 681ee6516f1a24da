//! Music asset and player abstractions.
//!
//! The stack never knows which audio backend it drives. An asset only has to
//! name its content through a [`MusicId`] and build fresh [`MusicPlayer`]s on
//! demand; players expose the small control surface the fade controller
//! needs.
//!
//! # Trait Hierarchy
//!
//! - [`MusicAsset`] - logical piece of music, identified by content
//! - [`MusicPlayer`] - playable handle created from an asset
//!
//! Both traits are object-safe and `Send + Sync` so stacks can be stored in
//! engine resources or shared behind a mutex.

use crate::error::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// First id handed out by registries. Lower ids belong to [`MusicId::from_raw`].
pub const REGISTRY_ID_BASE: u64 = 1 << 32;

/// Process-wide id counter shared by every registry.
static NEXT_ID: AtomicU64 = AtomicU64::new(REGISTRY_ID_BASE);

/// Identity of the underlying audio content.
///
/// Two assets that play the same content must report the same id so that the
/// stack can keep one player alive across transitions between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MusicId(u64);

impl MusicId {
    /// Id chosen by the caller.
    ///
    /// Registries never hand out ids below [`REGISTRY_ID_BASE`], so raw ids
    /// in that range cannot collide with registry ids.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MusicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named output bus that players are routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MixerGroup(Arc<str>);

impl MixerGroup {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MixerGroup {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for MixerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical piece of music that can be placed on the stack.
pub trait MusicAsset: Send + Sync {
    /// Identity of the content this asset plays.
    fn music_id(&self) -> MusicId;

    /// Build a new, stopped player for this content.
    fn create_player(&self) -> Result<Box<dyn MusicPlayer>>;
}

/// Control surface of a playable music handle.
///
/// Volume is linear in `0.0..=1.0`. A freshly created player reports the
/// volume it should play at once fully faded in.
pub trait MusicPlayer: Send + Sync {
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Whether the backend is currently producing audio.
    fn is_playing(&self) -> bool;

    /// Route output to a mixer group (`None` = backend default).
    fn set_output(&mut self, output: Option<&MixerGroup>);

    fn play(&mut self);

    fn stop(&mut self);

    /// Free backend resources. The player is not used again afterwards.
    fn release(&mut self);
}

/// Identity-keyed registry that hands out [`MusicId`]s.
///
/// Content keys (file paths, asset names) map to stable ids for the lifetime
/// of the registry, so every asset built for the same key shares a player.
#[derive(Debug, Default)]
pub struct MusicRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    ids: HashMap<String, MusicId>,
}

fn allocate() -> MusicId {
    MusicId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

impl MusicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `content_key`, allocating one on first use.
    pub fn id_for(&self, content_key: &str) -> MusicId {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.ids.get(content_key) {
            return *id;
        }
        let id = allocate();
        inner.ids.insert(content_key.to_owned(), id);
        id
    }

    /// Id that no other content shares, in this or any other registry.
    pub fn fresh_id(&self) -> MusicId {
        allocate()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_id() {
        let registry = MusicRegistry::new();
        let town = registry.id_for("music/town.ogg");
        let battle = registry.id_for("music/battle.ogg");
        assert_eq!(registry.id_for("music/town.ogg"), town);
        assert_ne!(town, battle);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn fresh_ids_never_collide_with_keyed_ids() {
        let registry = MusicRegistry::new();
        let keyed = registry.id_for("theme");
        let fresh = registry.fresh_id();
        let keyed_again = registry.id_for("other");
        assert_ne!(keyed, fresh);
        assert_ne!(fresh, keyed_again);
        assert_eq!(registry.id_for("theme"), keyed);
    }

    #[test]
    fn separate_registries_never_share_ids() {
        let scenes = MusicRegistry::new();
        let menus = MusicRegistry::new();
        let town = scenes.id_for("music/town.ogg");
        let title = menus.id_for("music/title.ogg");
        assert_ne!(town, title);
        assert_ne!(scenes.fresh_id(), menus.fresh_id());
        assert!(town.raw() >= REGISTRY_ID_BASE);
        assert!(title.raw() >= REGISTRY_ID_BASE);
    }

    #[test]
    fn mixer_group_is_plain_string_in_ron() {
        let group: MixerGroup = ron::from_str("\"Music\"").unwrap();
        assert_eq!(group.name(), "Music");
        assert_eq!(group.to_string(), "Music");
    }
}
