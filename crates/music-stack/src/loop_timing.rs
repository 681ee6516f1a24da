//! Intro/loop arithmetic for music that plays an intro once and then loops.
//!
//! A track is described by its length and its musical intro (measures, beats
//! per measure, tempo). The first pass plays the whole clip; every later pass
//! starts at the end of the intro.

use crate::error::{MusicStackError, Result};
use serde::{Deserialize, Serialize};

const SECONDS_IN_MINUTE: f32 = 60.0;

/// Clip length plus the musical metadata needed to find its loop point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicData {
    pub length_seconds: f32,
    #[serde(default = "default_intro_measures")]
    pub intro_measures: f32,
    #[serde(default = "default_beats_per_measure")]
    pub beats_per_measure: f32,
    #[serde(default = "default_beats_per_minute")]
    pub beats_per_minute: f32,
}

fn default_intro_measures() -> f32 {
    1.0
}
fn default_beats_per_measure() -> f32 {
    4.0
}
fn default_beats_per_minute() -> f32 {
    130.0
}

impl MusicData {
    /// Track of `length_seconds` with a one-measure intro in 4/4 at 130 bpm.
    pub fn new(length_seconds: f32) -> Self {
        Self {
            length_seconds,
            intro_measures: default_intro_measures(),
            beats_per_measure: default_beats_per_measure(),
            beats_per_minute: default_beats_per_minute(),
        }
    }

    pub fn with_intro(mut self, measures: f32, beats_per_measure: f32) -> Self {
        self.intro_measures = measures;
        self.beats_per_measure = beats_per_measure;
        self
    }

    pub fn with_tempo(mut self, beats_per_minute: f32) -> Self {
        self.beats_per_minute = beats_per_minute;
        self
    }

    /// Reject metadata that cannot loop.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.length_seconds) {
            return Err(MusicStackError::invalid_loop(format!(
                "length must be positive, got {}",
                self.length_seconds
            )));
        }
        if !is_positive(self.beats_per_minute) {
            return Err(MusicStackError::invalid_loop(format!(
                "tempo must be positive, got {} bpm",
                self.beats_per_minute
            )));
        }
        if !(self.intro_measures.is_finite() && self.intro_measures >= 0.0)
            || !is_positive(self.beats_per_measure)
        {
            return Err(MusicStackError::invalid_loop(
                "intro must span a non-negative number of measures",
            ));
        }
        let intro = self.intro_time();
        if intro >= self.length_seconds {
            return Err(MusicStackError::invalid_loop(format!(
                "intro of {:.3}s leaves nothing to loop in a {:.3}s clip",
                intro, self.length_seconds
            )));
        }
        Ok(())
    }

    /// Seconds from the start of the clip to the loop point.
    pub fn intro_time(&self) -> f32 {
        self.beats_per_measure * self.intro_measures / self.beats_per_minute * SECONDS_IN_MINUTE
    }

    /// Length of one loop pass.
    pub fn loop_time(&self) -> f32 {
        self.length_seconds - self.intro_time()
    }

    pub fn timing(&self) -> Result<LoopTiming> {
        self.validate()?;
        Ok(LoopTiming {
            length: self.length_seconds,
            intro: self.intro_time(),
        })
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Validated loop schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTiming {
    length: f32,
    intro: f32,
}

impl LoopTiming {
    pub fn intro_time(&self) -> f32 {
        self.intro
    }

    pub fn loop_time(&self) -> f32 {
        self.length - self.intro
    }

    /// Seconds after playback start at which loop pass `n` (1-based) begins.
    pub fn loop_start(&self, n: u32) -> f32 {
        match n {
            0 => 0.0,
            n => self.length + self.loop_time() * (n - 1) as f32,
        }
    }

    /// Start times of every loop pass, in order.
    pub fn loop_starts(&self) -> impl Iterator<Item = f32> + '_ {
        (1..).map(move |n| self.loop_start(n))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_intro_is_one_bar_at_130_bpm() {
        let data = MusicData::new(60.0);
        assert_relative_eq!(data.intro_time(), 4.0 / 130.0 * 60.0);
        assert_relative_eq!(data.loop_time(), 60.0 - 4.0 / 130.0 * 60.0);
    }

    #[test]
    fn loops_start_after_full_first_pass() {
        let timing = MusicData::new(20.0)
            .with_intro(2.0, 4.0)
            .with_tempo(120.0)
            .timing()
            .unwrap();
        assert_relative_eq!(timing.intro_time(), 4.0);
        assert_relative_eq!(timing.loop_time(), 16.0);

        let starts: Vec<f32> = timing.loop_starts().take(3).collect();
        assert_relative_eq!(starts[0], 20.0);
        assert_relative_eq!(starts[1], 36.0);
        assert_relative_eq!(starts[2], 52.0);
    }

    #[test]
    fn intro_longer_than_clip_is_rejected() {
        let data = MusicData::new(1.0).with_intro(4.0, 4.0);
        assert!(matches!(data.timing(), Err(MusicStackError::InvalidLoop(_))));
        assert!(MusicData::new(10.0).with_tempo(0.0).validate().is_err());
        assert!(MusicData::new(0.0).validate().is_err());
    }

    #[test]
    fn non_finite_metadata_is_rejected() {
        let nan_intro: MusicData =
            ron::from_str("(length_seconds: 30.0, intro_measures: NaN)").unwrap();
        assert!(nan_intro.validate().is_err());
        assert!(nan_intro.timing().is_err());

        assert!(MusicData::new(f32::NAN).validate().is_err());
        assert!(MusicData::new(f32::INFINITY).validate().is_err());
        assert!(MusicData::new(30.0).with_tempo(f32::NAN).validate().is_err());
        assert!(MusicData::new(30.0).with_tempo(f32::INFINITY).validate().is_err());
        assert!(MusicData::new(30.0).with_intro(f32::INFINITY, 4.0).validate().is_err());
        assert!(MusicData::new(30.0).with_intro(1.0, f32::NAN).validate().is_err());
    }

    #[test]
    fn ron_fills_musical_defaults() {
        let data: MusicData = ron::from_str("(length_seconds: 90.0)").unwrap();
        assert_eq!(data, MusicData::new(90.0));
    }
}
