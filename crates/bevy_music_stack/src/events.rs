use bevy::prelude::*;
use music_stack::{MixerGroup, PriorityKey};

/// Fired when a different stack element takes control of the music.
///
/// `current` is `None` once the stack has been emptied.
#[derive(Event, Message, Clone, Debug, PartialEq, Eq)]
pub struct MusicControlChanged {
    pub previous: Option<PriorityKey>,
    pub current: Option<PriorityKey>,
}

/// Request to route players created from now on to another mixer group.
#[derive(Event, Message, Clone, Debug)]
pub struct MusicOutputRequest {
    pub output: Option<MixerGroup>,
}
