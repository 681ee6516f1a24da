//! Transition presets describing how one piece of music hands over to the next.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Fade timings applied when control of the music changes hands.
///
/// All times are in seconds. The outgoing music fades out over
/// `fade_out_time`; the incoming music waits `fade_in_delay` and then fades in
/// over `fade_in_time`. A time of zero snaps immediately.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    pub fade_out_time: f32,
    pub fade_in_time: f32,
    pub fade_in_delay: f32,
}

impl Transition {
    /// Cut straight from one track to the next.
    pub const INSTANT: Transition = Transition {
        fade_out_time: 0.0,
        fade_in_time: 0.0,
        fade_in_delay: 0.0,
    };

    /// Overlap a two second fade out with a two second fade in.
    pub const CROSS_FADE: Transition = Transition {
        fade_out_time: 2.0,
        fade_in_time: 2.0,
        fade_in_delay: 0.0,
    };

    /// Silence the current track quickly, pause, then start the next one at full volume.
    pub const QUICK_OUT: Transition = Transition {
        fade_out_time: 0.1,
        fade_in_time: 0.0,
        fade_in_delay: 0.5,
    };

    pub fn new(fade_out_time: f32, fade_in_time: f32, fade_in_delay: f32) -> Self {
        Self {
            fade_out_time,
            fade_in_time,
            fade_in_delay,
        }
    }

    /// Look up a preset by its configuration name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "instant" => Some(Self::INSTANT),
            "cross_fade" | "crossfade" => Some(Self::CROSS_FADE),
            "quick_out" => Some(Self::QUICK_OUT),
            _ => None,
        }
    }
}

/// Deserialize a transition written either as a preset name (`"quick_out"`)
/// or as explicit timings (`(fade_out_time: 0.5)`).
pub fn preset_or_timings<'de, D>(deserializer: D) -> Result<Transition, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Written {
        Preset(String),
        Timings(Transition),
    }

    match Written::deserialize(deserializer)? {
        Written::Preset(name) => Transition::preset(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown transition preset '{}'", name))),
        Written::Timings(transition) => Ok(transition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_documented_timings() {
        assert_eq!(Transition::INSTANT, Transition::new(0.0, 0.0, 0.0));
        assert_eq!(Transition::CROSS_FADE, Transition::new(2.0, 2.0, 0.0));
        assert_eq!(Transition::QUICK_OUT, Transition::new(0.1, 0.0, 0.5));
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(Transition::preset("Cross_Fade"), Some(Transition::CROSS_FADE));
        assert_eq!(Transition::preset("quick_out"), Some(Transition::QUICK_OUT));
        assert_eq!(Transition::preset("fanfare"), None);
    }

    #[test]
    fn missing_ron_fields_default_to_zero() {
        let parsed: Transition = ron::from_str("(fade_in_time: 1.5)").unwrap();
        assert_eq!(parsed, Transition::new(0.0, 1.5, 0.0));
    }
}
