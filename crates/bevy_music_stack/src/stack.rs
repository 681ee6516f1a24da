use bevy::prelude::*;
use music_stack::{MusicStack, MusicStackConfig};

/// The music stack driven by [`MusicStackPlugin`](crate::MusicStackPlugin).
///
/// Systems may add and remove elements directly; the plugin advances it once
/// per frame.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct ActiveMusicStack(pub MusicStack);

impl ActiveMusicStack {
    pub fn with_config(config: &MusicStackConfig) -> Self {
        Self(MusicStack::with_config(config))
    }
}
