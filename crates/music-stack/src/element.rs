//! Stack elements: the things that ask for control of the music.

use crate::asset::MusicAsset;
use crate::key::MusicStackPriority;
use crate::transition::Transition;
use std::fmt;
use std::sync::Arc;

/// Something that wants a piece of music to play while it is registered.
///
/// The stack only holds a reference for the lifetime of the registration and
/// queries the accessors whenever control changes hands.
pub trait MusicStackElement: Send + Sync {
    /// Music to play, or `None` for silence.
    fn music_asset(&self) -> Option<Arc<dyn MusicAsset>>;

    /// Volume the music should settle at once faded in.
    fn desired_volume(&self) -> f32;

    fn priority(&self) -> MusicStackPriority;

    /// Transition used when this element rises to the top.
    fn take_control_transition(&self) -> Transition;

    /// Transition used when this element leaves the top by being removed.
    fn release_control_transition(&self) -> Transition;
}

/// Ready-made element with plain fields.
#[derive(Clone)]
pub struct BasicMusicStackElement {
    pub music: Option<Arc<dyn MusicAsset>>,
    pub priority: MusicStackPriority,
    pub transition_in: Transition,
    pub transition_out: Transition,
    pub desired_volume: f32,
}

impl BasicMusicStackElement {
    /// Element playing `music` at low priority with cross fades both ways.
    pub fn new(music: Arc<dyn MusicAsset>) -> Self {
        Self {
            music: Some(music),
            ..Self::silence()
        }
    }

    /// Element that silences everything below it.
    pub fn silence() -> Self {
        Self {
            music: None,
            priority: MusicStackPriority::Low,
            transition_in: Transition::CROSS_FADE,
            transition_out: Transition::CROSS_FADE,
            desired_volume: 1.0,
        }
    }

    pub fn with_priority(mut self, priority: MusicStackPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_transition_in(mut self, transition: Transition) -> Self {
        self.transition_in = transition;
        self
    }

    pub fn with_transition_out(mut self, transition: Transition) -> Self {
        self.transition_out = transition;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.desired_volume = volume;
        self
    }
}

impl fmt::Debug for BasicMusicStackElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicMusicStackElement")
            .field("music", &self.music.as_ref().map(|asset| asset.music_id()))
            .field("priority", &self.priority)
            .field("transition_in", &self.transition_in)
            .field("transition_out", &self.transition_out)
            .field("desired_volume", &self.desired_volume)
            .finish()
    }
}

impl MusicStackElement for BasicMusicStackElement {
    fn music_asset(&self) -> Option<Arc<dyn MusicAsset>> {
        self.music.clone()
    }

    fn desired_volume(&self) -> f32 {
        self.desired_volume
    }

    fn priority(&self) -> MusicStackPriority {
        self.priority
    }

    fn take_control_transition(&self) -> Transition {
        self.transition_in
    }

    fn release_control_transition(&self) -> Transition {
        self.transition_out
    }
}
