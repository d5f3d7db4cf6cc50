//! Maps iteration counts to RGB samples.

use escape::IterationResult;
use num::clamp;
use std::fmt;
use std::str::FromStr;

/// An RGB pixel, one byte per channel.
pub type Rgb = [u8; 3];

const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];

/// Linear interpolation between `a` and `b`.  `s` is clamped to
/// `[0, 1]`, so a bad ratio saturates instead of wrapping.
#[inline]
pub fn interpolate(a: f64, b: f64, s: f64) -> f64 {
    let s = clamp(s, 0.0, 1.0);
    a + (b - a) * s
}

#[inline]
fn interpolate_sample(a: u8, b: u8, s: f64) -> u8 {
    interpolate(f64::from(a), f64::from(b), s) as u8
}

/// The ways a render can be coloured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColourMode {
    /// Black inside, white outside.
    BlackWhite,
    /// White inside, grey outside, darker the faster a point escapes.
    GrayScale,
    /// Black inside, blue fading to red outside.
    ColourFade,
}

impl ColourMode {
    /// Every mode, in the order a picker would list them.
    pub const ALL: [ColourMode; 3] = [
        ColourMode::BlackWhite,
        ColourMode::ColourFade,
        ColourMode::GrayScale,
    ];

    /// The colour of a pixel that held for `held` iterations out of
    /// `max_iterations`.
    pub fn pixel_for(self, held: IterationResult, max_iterations: usize) -> Rgb {
        let n = match held {
            IterationResult::Inside => {
                return match self {
                    ColourMode::GrayScale => WHITE,
                    _ => BLACK,
                }
            }
            IterationResult::Escaped(n) => n,
        };

        let s = n as f64 / max_iterations.max(1) as f64;
        match self {
            ColourMode::BlackWhite => WHITE,
            ColourMode::GrayScale => {
                let v = interpolate_sample(0, 255, s);
                [v, v, v]
            }
            ColourMode::ColourFade => [
                interpolate_sample(0, 255, s),
                0,
                interpolate_sample(255, 0, s),
            ],
        }
    }

    /// The name the mode goes by on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColourMode::BlackWhite => "BLACK_WHITE",
            ColourMode::GrayScale => "GRAY_SCALE",
            ColourMode::ColourFade => "COLOUR_FADE",
        }
    }
}

impl Default for ColourMode {
    fn default() -> Self {
        ColourMode::BlackWhite
    }
}

impl fmt::Display for ColourMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColourMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColourMode::ALL
            .iter()
            .cloned()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown colour mode: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_hits_both_ends() {
        assert_eq!(interpolate(0.0, 255.0, 0.0), 0.0);
        assert_eq!(interpolate(0.0, 255.0, 1.0), 255.0);
        assert_eq!(interpolate(255.0, 0.0, 1.0), 0.0);
        assert_eq!(interpolate(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn interpolate_saturates_out_of_range() {
        assert_eq!(interpolate(0.0, 255.0, 1.5), 255.0);
        assert_eq!(interpolate(0.0, 255.0, -0.5), 0.0);
    }

    #[test]
    fn black_white_has_only_two_colours() {
        let mode = ColourMode::BlackWhite;
        assert_eq!(mode.pixel_for(IterationResult::Inside, 50), BLACK);
        for n in 0..60 {
            assert_eq!(mode.pixel_for(IterationResult::Escaped(n), 50), WHITE);
        }
    }

    #[test]
    fn gray_scale_is_white_inside_and_gray_outside() {
        let mode = ColourMode::GrayScale;
        assert_eq!(mode.pixel_for(IterationResult::Inside, 100), WHITE);
        assert_eq!(mode.pixel_for(IterationResult::Escaped(0), 100), BLACK);
        assert_eq!(mode.pixel_for(IterationResult::Escaped(50), 100), [127, 127, 127]);
    }

    #[test]
    fn colour_fade_has_no_green_and_opposing_red_blue() {
        let mode = ColourMode::ColourFade;
        assert_eq!(mode.pixel_for(IterationResult::Inside, 100), BLACK);
        let mut last = mode.pixel_for(IterationResult::Escaped(0), 100);
        assert_eq!(last, [0, 0, 255]);
        for n in 1..=100 {
            let px = mode.pixel_for(IterationResult::Escaped(n), 100);
            assert_eq!(px[1], 0);
            assert!(px[0] >= last[0]);
            assert!(px[2] <= last[2]);
            last = px;
        }
        assert_eq!(last, [255, 0, 0]);
    }

    #[test]
    fn modes_parse_by_name() {
        for mode in ColourMode::ALL.iter() {
            assert_eq!(mode.name().parse::<ColourMode>(), Ok(*mode));
        }
        assert_eq!("colour_fade".parse::<ColourMode>(), Ok(ColourMode::ColourFade));
        assert!("PURPLE".parse::<ColourMode>().is_err());
    }
}
