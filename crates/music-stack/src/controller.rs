//! Fade state machine wrapped around a single music player.
//!
//! A controller owns one player and moves its volume linearly towards a
//! destination. Playback is only started once a fade-in is due and only
//! stopped after the volume has already reached silence, so starting and
//! stopping never click.

use crate::asset::MusicPlayer;

/// Observable phase of a [`PlayerController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Volume 0 and not meant to play.
    IdleSilent,
    /// Waiting out a start delay before the volume moves.
    Delayed,
    /// Volume moving towards its destination.
    Fading,
    /// Volume at its destination.
    Steady,
}

/// Drives the volume of one player towards a destination over time.
pub struct PlayerController {
    player: Box<dyn MusicPlayer>,
    normal_volume: f32,
    destination_volume: f32,
    fade_delay: f32,
    /// Volume units per second; `None` snaps on the next update.
    fade_speed: Option<f32>,
}

impl PlayerController {
    /// Wrap `player`, remembering its current volume as the full volume and
    /// muting it until a fade-in starts.
    pub fn new(mut player: Box<dyn MusicPlayer>) -> Self {
        let normal_volume = player.volume();
        player.set_volume(0.0);
        Self {
            player,
            normal_volume,
            destination_volume: 0.0,
            fade_delay: 0.0,
            fade_speed: None,
        }
    }

    /// Fade in over `fade_in_time` seconds after waiting `fade_in_delay` seconds.
    ///
    /// `new_volume` replaces the remembered full volume when given.
    pub fn start_music(&mut self, fade_in_time: f32, fade_in_delay: f32, new_volume: Option<f32>) {
        if let Some(volume) = new_volume {
            self.normal_volume = volume;
        }
        self.fade_towards(self.normal_volume, fade_in_time, fade_in_delay);
    }

    /// Fade out to silence over `fade_out_time` seconds, starting immediately.
    pub fn stop_music(&mut self, fade_out_time: f32) {
        self.fade_towards(0.0, fade_out_time, 0.0);
    }

    fn fade_towards(&mut self, volume: f32, fade_time: f32, fade_delay: f32) {
        self.fade_delay = fade_delay;
        self.destination_volume = volume;
        self.fade_speed = if fade_time > 0.0 {
            Some((self.destination_volume - self.player.volume()).abs() / fade_time)
        } else {
            None
        };
    }

    /// Advance the fade by `delta` seconds of unscaled time.
    pub fn update(&mut self, delta: f32) {
        if self.fade_delay > 0.0 {
            self.fade_delay -= delta;
            return;
        }

        if self.is_conceptually_playing() && !self.player.is_playing() {
            self.player.play();
        }
        if !self.is_conceptually_playing()
            && self.player.is_playing()
            && self.player.volume() <= 0.0
        {
            self.player.stop();
        }

        let max_step = match self.fade_speed {
            Some(speed) => speed * delta,
            None => f32::INFINITY,
        };
        let volume = move_towards(self.player.volume(), self.destination_volume, max_step);
        self.player.set_volume(volume);
    }

    /// True while the controller is meant to be heard (destination above zero),
    /// even if the audible volume is still ramping up.
    pub fn is_conceptually_playing(&self) -> bool {
        self.destination_volume > 0.0
    }

    /// Whether the player is silent for good and can be released.
    pub fn can_clean_up(&self) -> bool {
        !self.is_conceptually_playing() && self.player.volume() == 0.0
    }

    pub fn volume(&self) -> f32 {
        self.player.volume()
    }

    pub fn destination_volume(&self) -> f32 {
        self.destination_volume
    }

    /// Full volume restored by the next `start_music` without an explicit volume.
    pub fn normal_volume(&self) -> f32 {
        self.normal_volume
    }

    pub fn is_delayed(&self) -> bool {
        self.fade_delay > 0.0
    }

    pub fn state(&self) -> FadeState {
        if self.is_delayed() {
            FadeState::Delayed
        } else if self.player.volume() != self.destination_volume {
            FadeState::Fading
        } else if self.is_conceptually_playing() {
            FadeState::Steady
        } else {
            FadeState::IdleSilent
        }
    }

    pub fn player(&self) -> &dyn MusicPlayer {
        self.player.as_ref()
    }

    /// Release the underlying player.
    pub fn clean_up(mut self) {
        self.player.release();
    }
}

/// Move `current` towards `target` by at most `max_delta`.
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
