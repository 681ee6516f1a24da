//! In-process backend that records player state instead of producing sound.
//!
//! Useful for headless builds (servers, CI) and for observing exactly what the
//! stack asked each player to do. Every player shares its state with a
//! [`PlayerProbe`] that can be inspected from outside the stack.

use crate::asset::{MixerGroup, MusicAsset, MusicId, MusicPlayer};
use crate::error::{MusicStackError, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded state of a [`MemoryPlayer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeState {
    pub volume: f32,
    pub playing: bool,
    pub output: Option<MixerGroup>,
    pub play_count: u32,
    pub stop_count: u32,
    pub released: bool,
}

/// Shared view onto a memory player's state.
#[derive(Debug, Clone, Default)]
pub struct PlayerProbe(Arc<Mutex<ProbeState>>);

impl PlayerProbe {
    pub fn snapshot(&self) -> ProbeState {
        self.0.lock().clone()
    }

    pub fn volume(&self) -> f32 {
        self.0.lock().volume
    }

    pub fn is_playing(&self) -> bool {
        self.0.lock().playing
    }

    pub fn output(&self) -> Option<MixerGroup> {
        self.0.lock().output.clone()
    }

    pub fn play_count(&self) -> u32 {
        self.0.lock().play_count
    }

    pub fn stop_count(&self) -> u32 {
        self.0.lock().stop_count
    }

    pub fn is_released(&self) -> bool {
        self.0.lock().released
    }
}

/// Player that only records what it is told.
#[derive(Debug)]
pub struct MemoryPlayer {
    probe: PlayerProbe,
}

impl MemoryPlayer {
    /// Create a stopped player whose full volume is `volume`.
    pub fn with_volume(volume: f32) -> Self {
        let probe = PlayerProbe::default();
        probe.0.lock().volume = volume;
        Self { probe }
    }

    pub fn probe(&self) -> PlayerProbe {
        self.probe.clone()
    }
}

impl MusicPlayer for MemoryPlayer {
    fn volume(&self) -> f32 {
        self.probe.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.probe.0.lock().volume = volume;
    }

    fn is_playing(&self) -> bool {
        self.probe.is_playing()
    }

    fn set_output(&mut self, output: Option<&MixerGroup>) {
        self.probe.0.lock().output = output.cloned();
    }

    fn play(&mut self) {
        let mut state = self.probe.0.lock();
        state.playing = true;
        state.play_count += 1;
    }

    fn stop(&mut self) {
        let mut state = self.probe.0.lock();
        state.playing = false;
        state.stop_count += 1;
    }

    fn release(&mut self) {
        let mut state = self.probe.0.lock();
        state.playing = false;
        state.released = true;
    }
}

/// Asset producing [`MemoryPlayer`]s.
///
/// Cloning an asset keeps the same id and the same list of created players,
/// which mirrors two scene objects pointing at the same clip.
#[derive(Debug, Clone)]
pub struct MemoryAsset {
    id: MusicId,
    initial_volume: f32,
    fail_creation: bool,
    created: Arc<Mutex<Vec<PlayerProbe>>>,
}

impl MemoryAsset {
    pub fn new(id: MusicId) -> Self {
        Self {
            id,
            initial_volume: 1.0,
            fail_creation: false,
            created: Arc::default(),
        }
    }

    /// Volume reported by created players before the stack fades them.
    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Make every `create_player` call fail, as a missing output device would.
    pub fn failing(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    /// Probes for every player created so far, oldest first.
    pub fn players(&self) -> Vec<PlayerProbe> {
        self.created.lock().clone()
    }

    /// Probe of the most recently created player.
    pub fn last_player(&self) -> Option<PlayerProbe> {
        self.created.lock().last().cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl MusicAsset for MemoryAsset {
    fn music_id(&self) -> MusicId {
        self.id
    }

    fn create_player(&self) -> Result<Box<dyn MusicPlayer>> {
        if self.fail_creation {
            return Err(MusicStackError::player_creation(
                self.id,
                "memory backend configured to fail",
            ));
        }
        let player = MemoryPlayer::with_volume(self.initial_volume);
        self.created.lock().push(player.probe());
        Ok(Box::new(player))
    }
}
