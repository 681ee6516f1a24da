//! The priority-ordered music stack.
//!
//! Elements register with a priority and receive a [`PriorityKey`]. The
//! element with the smallest key is in control of the music; whenever that
//! changes the stack fades the previous element's player out and the new
//! element's player in. Players are keyed by [`MusicId`], so elements that
//! share content share one player and a transition between them only adjusts
//! its fade.
//!
//! # Example
//!
//! ```
//! use music_stack::backend::memory::MemoryAsset;
//! use music_stack::{BasicMusicStackElement, MusicId, MusicStack, MusicStackPriority};
//! use std::sync::Arc;
//!
//! let mut stack = MusicStack::new();
//! let town = Arc::new(MemoryAsset::new(MusicId::from_raw(1)));
//! let boss = Arc::new(MemoryAsset::new(MusicId::from_raw(2)));
//!
//! let town_key = stack.add(Arc::new(BasicMusicStackElement::new(town))).unwrap();
//! let boss_key = stack
//!     .add(Arc::new(
//!         BasicMusicStackElement::new(boss).with_priority(MusicStackPriority::High),
//!     ))
//!     .unwrap();
//! assert_eq!(stack.current_key(), Some(boss_key));
//!
//! stack.remove(boss_key).unwrap();
//! assert_eq!(stack.current_key(), Some(town_key));
//!
//! // Drive fades from the game loop.
//! stack.advance(1.0 / 60.0);
//! ```

use crate::asset::{MixerGroup, MusicId};
use crate::config::MusicStackConfig;
use crate::controller::PlayerController;
use crate::element::MusicStackElement;
use crate::error::{MusicStackError, Result};
use crate::key::PriorityKey;
use crate::transition::Transition;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Stack shared between a game loop and scoped registrations.
pub type SharedMusicStack = Arc<Mutex<MusicStack>>;

/// Priority-ordered collection of music requests and the players serving them.
#[derive(Default)]
pub struct MusicStack {
    elements: BTreeMap<PriorityKey, Arc<dyn MusicStackElement>>,
    controllers: HashMap<MusicId, PlayerController>,
    output: Option<MixerGroup>,
}

impl MusicStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &MusicStackConfig) -> Self {
        Self {
            output: config.output.clone(),
            ..Self::default()
        }
    }

    pub fn into_shared(self) -> SharedMusicStack {
        Arc::new(Mutex::new(self))
    }

    /// Register `element` and return the key needed to remove it again.
    ///
    /// If the element rises to the top it takes control using its
    /// take-control transition.
    pub fn add(&mut self, element: Arc<dyn MusicStackElement>) -> Result<PriorityKey> {
        let previous_key = self.current_key();
        let key = PriorityKey::new(element.priority());
        self.elements.insert(key, element);

        let top_key = self.current_key();
        if top_key != previous_key {
            if let Some(top) = top_key.filter(|top| *top != key) {
                self.elements.remove(&key);
                error!("Added {} to the music stack but {} rose to the top", key, top);
                return Err(MusicStackError::OrderingViolation { inserted: key, top });
            }

            let previous = previous_key.and_then(|k| self.elements.get(&k).cloned());
            let current = self.elements.get(&key).cloned();
            let transition = current
                .as_ref()
                .map(|element| element.take_control_transition())
                .unwrap_or_default();
            debug!("Music stack: {} takes control", key);
            self.transition_to_music(previous.as_deref(), current.as_deref(), transition);
        }
        Ok(key)
    }

    /// Unregister the element stored under `key`.
    ///
    /// If it was in control, the next element takes over using the removed
    /// element's release transition.
    pub fn remove(&mut self, key: PriorityKey) -> Result<()> {
        let was_top = self.current_key() == Some(key);
        let Some(removed) = self.elements.remove(&key) else {
            error!("Tried to remove {} which is not in the music stack", key);
            return Err(MusicStackError::UnknownKey(key));
        };

        if was_top {
            let current = self.current().cloned();
            debug!(
                "Music stack: {} released control to {:?}",
                key,
                self.current_key()
            );
            self.transition_to_music(
                Some(removed.as_ref()),
                current.as_deref(),
                removed.release_control_transition(),
            );
        }
        Ok(())
    }

    fn transition_to_music(
        &mut self,
        old: Option<&dyn MusicStackElement>,
        new: Option<&dyn MusicStackElement>,
        transition: Transition,
    ) {
        let old_music = old.and_then(|element| element.music_asset());
        let new_music = new.and_then(|element| element.music_asset());

        if let Some(old_music) = old_music {
            if let Some(controller) = self.controllers.get_mut(&old_music.music_id()) {
                controller.stop_music(transition.fade_out_time);
            }
        }

        let (Some(new_element), Some(new_music)) = (new, new_music) else {
            return;
        };
        let id = new_music.music_id();
        let volume = Some(new_element.desired_volume());

        if let Some(controller) = self.controllers.get_mut(&id) {
            debug!("Reusing player for music {}", id);
            controller.start_music(transition.fade_in_time, transition.fade_in_delay, volume);
            return;
        }

        match new_music.create_player() {
            Ok(mut player) => {
                player.set_output(self.output.as_ref());
                let mut controller = PlayerController::new(player);
                controller.start_music(transition.fade_in_time, transition.fade_in_delay, volume);
                self.controllers.insert(id, controller);
                debug!("Created player for music {}", id);
            }
            Err(err) => warn!("Music {} stays silent: {}", id, err),
        }
    }

    /// Advance every fade by `delta` seconds and release players that went silent.
    ///
    /// Call once per frame with unscaled time so pausing or slow motion does
    /// not stall fades.
    pub fn advance(&mut self, delta: f32) {
        let mut clean_up = false;
        for controller in self.controllers.values_mut() {
            controller.update(delta);
            clean_up |= controller.can_clean_up();
        }
        if !clean_up {
            return;
        }

        let finished: Vec<MusicId> = self
            .controllers
            .iter()
            .filter(|(_, controller)| controller.can_clean_up())
            .map(|(id, _)| *id)
            .collect();
        for id in finished {
            if let Some(controller) = self.controllers.remove(&id) {
                debug!("Releasing player for music {}", id);
                controller.clean_up();
            }
        }
    }

    /// Release every player and forget all registrations.
    pub fn shutdown(&mut self) {
        self.elements.clear();
        for (id, controller) in self.controllers.drain() {
            debug!("Releasing player for music {} on shutdown", id);
            controller.clean_up();
        }
    }

    /// Element currently in control.
    pub fn current(&self) -> Option<&Arc<dyn MusicStackElement>> {
        self.elements.values().next()
    }

    pub fn current_key(&self) -> Option<PriorityKey> {
        self.elements.keys().next().copied()
    }

    pub fn contains(&self, key: PriorityKey) -> bool {
        self.elements.contains_key(&key)
    }

    /// Registered keys, element in control first.
    pub fn keys(&self) -> impl Iterator<Item = PriorityKey> + '_ {
        self.elements.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn controller(&self, id: MusicId) -> Option<&PlayerController> {
        self.controllers.get(&id)
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Whether the element in control has music with a live player.
    pub fn is_sounding(&self) -> bool {
        self.current()
            .and_then(|element| element.music_asset())
            .is_some_and(|music| self.controllers.contains_key(&music.music_id()))
    }

    pub fn output(&self) -> Option<&MixerGroup> {
        self.output.as_ref()
    }

    /// Mixer group applied to players created from now on.
    pub fn set_output(&mut self, output: Option<MixerGroup>) {
        self.output = output;
    }
}

impl fmt::Debug for MusicStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MusicStack")
            .field("keys", &self.elements.keys().collect::<Vec<_>>())
            .field("players", &self.controllers.keys().collect::<Vec<_>>())
            .field("output", &self.output)
            .finish()
    }
}
