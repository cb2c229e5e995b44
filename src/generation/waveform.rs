//! Periodic wave functions.
//!
//! Each [`WaveKind`] maps a frequency and a sample index to an amplitude in
//! [-1, 1]. The functions are pure: the sample rate is passed in, and the
//! same inputs always give bit-identical output.

use std::f64::consts::PI;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Shape of the generated wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    /// Pure sine tone.
    #[default]
    Sine,
    /// Alternates between -1 and +1 every half period.
    Square,
    /// Linear ramp up and down.
    Triangle,
    /// Linear ramp up with a hard reset.
    Sawtooth,
    /// Inverted semicircles meeting in sharp points.
    Point,
    /// Semicircle arcs of alternating polarity.
    Circle,
}

impl WaveKind {
    /// All wave kinds, in the order they are listed to users.
    pub const ALL: [WaveKind; 6] = [
        WaveKind::Sine,
        WaveKind::Square,
        WaveKind::Triangle,
        WaveKind::Sawtooth,
        WaveKind::Point,
        WaveKind::Circle,
    ];

    /// Returns the lowercase name of the wave kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveKind::Sine => "sine",
            WaveKind::Square => "square",
            WaveKind::Triangle => "triangle",
            WaveKind::Sawtooth => "sawtooth",
            WaveKind::Point => "point",
            WaveKind::Circle => "circle",
        }
    }

    /// Parses a wave kind from its name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" => Some(WaveKind::Sine),
            "square" => Some(WaveKind::Square),
            "triangle" => Some(WaveKind::Triangle),
            "sawtooth" => Some(WaveKind::Sawtooth),
            "point" => Some(WaveKind::Point),
            "circle" => Some(WaveKind::Circle),
            _ => None,
        }
    }

    /// Amplitude of a wave of `frequency` Hz at sample `t`.
    pub fn sample(self, frequency: f64, t: u32, sample_rate: u32) -> f64 {
        let t = f64::from(t);
        let rate = f64::from(sample_rate);
        match self {
            WaveKind::Sine => (2.0 * PI * t * frequency / rate).sin(),
            WaveKind::Square => {
                let x = 2.0 * t * frequency / rate;
                if is_odd(x) {
                    1.0
                } else {
                    -1.0
                }
            }
            WaveKind::Triangle => {
                let x = 4.0 * t * frequency / rate;
                (x - 2.0 * ((x + 1.0) / 2.0).floor()) * half_cycle_sign(x)
            }
            WaveKind::Sawtooth => {
                let x = t * frequency / rate;
                2.0 * (x - x.floor()) - 1.0
            }
            WaveKind::Point => {
                let x = 4.0 * t * frequency / rate;
                let root = x - (1.0 + (x / 2.0).floor() * 2.0);
                (1.0 - (1.0 - root * root).sqrt()) * half_cycle_sign(x)
            }
            WaveKind::Circle => {
                let x = 4.0 * t * frequency / rate;
                let root = x - (x / 2.0).floor() * 2.0 - 1.0;
                (1.0 - root * root).sqrt() * half_cycle_sign(x)
            }
        }
    }
}

impl fmt::Display for WaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True when the integer part of a non-negative `x` is odd.
fn is_odd(x: f64) -> bool {
    (x.trunc() as u64) % 2 == 1
}

/// -1 on odd half cycles of a quarter-period phase `x`, +1 otherwise.
fn half_cycle_sign(x: f64) -> f64 {
    if is_odd((x + 1.0) / 2.0) {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn wave_kind_parsing() {
        assert_eq!(WaveKind::parse("sine"), Some(WaveKind::Sine));
        assert_eq!(WaveKind::parse("SQUARE"), Some(WaveKind::Square));
        assert_eq!(WaveKind::parse("Triangle"), Some(WaveKind::Triangle));
        assert_eq!(WaveKind::parse("sawtooth"), Some(WaveKind::Sawtooth));
        assert_eq!(WaveKind::parse("point"), Some(WaveKind::Point));
        assert_eq!(WaveKind::parse("circle"), Some(WaveKind::Circle));
        assert_eq!(WaveKind::parse("noise"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in WaveKind::ALL {
            assert_eq!(WaveKind::parse(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn values_at_time_zero() {
        assert_eq!(WaveKind::Sine.sample(440.0, 0, RATE), 0.0);
        assert_eq!(WaveKind::Square.sample(440.0, 0, RATE), -1.0);
        assert_eq!(WaveKind::Triangle.sample(440.0, 0, RATE), 0.0);
        assert_eq!(WaveKind::Sawtooth.sample(440.0, 0, RATE), -1.0);
        assert_eq!(WaveKind::Point.sample(440.0, 0, RATE), 1.0);
        assert_eq!(WaveKind::Circle.sample(440.0, 0, RATE), 0.0);
    }

    #[test]
    fn quarter_period_values() {
        // 100 Hz at 8000 Hz: one period is 80 samples, a quarter is 20.
        assert!((WaveKind::Sine.sample(100.0, 20, RATE) - 1.0).abs() < EPSILON);
        assert_eq!(WaveKind::Square.sample(100.0, 20, RATE), -1.0);
        assert_eq!(WaveKind::Square.sample(100.0, 40, RATE), 1.0);
        assert_eq!(WaveKind::Triangle.sample(100.0, 20, RATE), 1.0);
        assert_eq!(WaveKind::Triangle.sample(100.0, 60, RATE), -1.0);
        assert_eq!(WaveKind::Sawtooth.sample(100.0, 40, RATE), 0.0);
        // Circle changes polarity at the crest of each arc.
        assert_eq!(WaveKind::Circle.sample(100.0, 20, RATE), -1.0);
        assert_eq!(WaveKind::Circle.sample(100.0, 60, RATE), 1.0);
        assert!((WaveKind::Circle.sample(100.0, 10, RATE) - 0.75f64.sqrt()).abs() < EPSILON);
        assert_eq!(WaveKind::Point.sample(100.0, 20, RATE), 0.0);
        assert_eq!(WaveKind::Point.sample(100.0, 40, RATE), -1.0);
    }

    #[test]
    fn matches_reference_formulas_exactly() {
        let (f, t) = (261.63, 1234u32);
        let x = f64::from(t) * f / f64::from(RATE);
        assert_eq!(
            WaveKind::Sine.sample(f, t, RATE),
            (2.0 * PI * f64::from(t) * f / f64::from(RATE)).sin()
        );
        assert_eq!(WaveKind::Sawtooth.sample(f, t, RATE), 2.0 * (x - x.floor()) - 1.0);
    }

    #[test]
    fn every_kind_is_periodic() {
        // 200 Hz at 8000 Hz repeats every 40 samples.
        for kind in WaveKind::ALL {
            for t in 0..200 {
                let a = kind.sample(200.0, t, RATE);
                let b = kind.sample(200.0, t + 40, RATE);
                assert!((a - b).abs() < EPSILON, "{} differs at t={}: {} vs {}", kind, t, a, b);
            }
        }
    }

    #[test]
    fn every_kind_stays_in_unit_range() {
        for kind in WaveKind::ALL {
            for t in 0..2000 {
                let v = kind.sample(440.0, t, 44100);
                assert!((-1.0..=1.0).contains(&v), "{} out of range at t={}: {}", kind, t, v);
            }
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&WaveKind::Sawtooth).unwrap(), "\"sawtooth\"");
        let kind: WaveKind = serde_json::from_str("\"circle\"").unwrap();
        assert_eq!(kind, WaveKind::Circle);
    }
}
