//! Diurnal weather: nectar flow and the foraging window.
//!
//! A day is `day_length_secs` simulated seconds.  `tod` (time of day) runs
//! over `[0, 1)` with midday at `0.5`.
//!
//! | Output           | Auto mode                                 | Manual mode    |
//! |------------------|-------------------------------------------|----------------|
//! | `nectar_flow`    | `0.15 + 0.85 · daylight(tod)`             | `manual_flow`  |
//! | `foraging_open`  | `!rain && 0.08 < tod < 0.92`              | same           |
//!
//! `daylight(tod) = (1 − cos 2π·tod) / 2`: 0 at midnight, 1 at midday.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Foraging opens at sunrise and closes at sunset.
const SUNRISE: f32 = 0.08;
const SUNSET: f32 = 0.92;

/// Flow floor at night in auto mode.
const NIGHT_FLOW: f32 = 0.15;

/// Shortest accepted day.
pub const MIN_DAY_SECS: f32 = 60.0;

// ── WeatherMode ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeatherMode {
    /// Flow follows the time of day.
    #[default]
    Auto,
    /// Flow is pinned to `manual_flow`.
    Manual,
}

impl WeatherMode {
    pub fn name(self) -> &'static str {
        match self {
            WeatherMode::Auto => "auto",
            WeatherMode::Manual => "manual",
        }
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeatherMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "auto" => Ok(WeatherMode::Auto),
            "manual" => Ok(WeatherMode::Manual),
            other => Err(format!("unknown weather mode: {other}")),
        }
    }
}

// ── WeatherConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeatherConfig {
    /// Simulated seconds per day.
    pub day_length_secs: f32,

    /// Time of day at tick 0, in `[0, 1)`.
    pub start_tod: f32,

    pub mode: WeatherMode,

    /// Flow used in manual mode, in `[0, 1]`.
    pub manual_flow: f32,

    pub rain: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            day_length_secs: 600.0,
            start_tod:       0.5,
            mode:            WeatherMode::Auto,
            manual_flow:     0.7,
            rain:            false,
        }
    }
}

impl WeatherConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.day_length_secs.is_finite() && self.day_length_secs >= MIN_DAY_SECS) {
            return Err(format!(
                "day_length_secs must be at least {MIN_DAY_SECS}, got {}",
                self.day_length_secs
            ));
        }
        if !(0.0..1.0).contains(&self.start_tod) {
            return Err(format!("start_tod must be in [0, 1), got {}", self.start_tod));
        }
        if !(0.0..=1.0).contains(&self.manual_flow) {
            return Err(format!("manual_flow must be in [0, 1], got {}", self.manual_flow));
        }
        Ok(())
    }
}

// ── Weather ───────────────────────────────────────────────────────────────────

/// Current weather.  Stepped once per executed tick by the scheduler;
/// setters take effect immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct Weather {
    day_length: f32,
    /// Seconds into the current day, in `[0, day_length)`.
    clock: f32,
    mode: WeatherMode,
    manual_flow: f32,
    rain: bool,
    nectar_flow: f32,
    foraging_open: bool,
}

impl Weather {
    pub fn new(config: &WeatherConfig) -> Self {
        let day_length = config.day_length_secs.max(MIN_DAY_SECS);
        let mut weather = Self {
            day_length,
            clock: config.start_tod.clamp(0.0, 1.0) * day_length % day_length,
            mode: config.mode,
            manual_flow: config.manual_flow.clamp(0.0, 1.0),
            rain: config.rain,
            nectar_flow: 0.0,
            foraging_open: false,
        };
        weather.refresh();
        weather
    }

    /// Advance the time of day by `dt` simulated seconds.
    pub fn step(&mut self, dt: f32) {
        if dt > 0.0 && dt.is_finite() {
            self.clock = (self.clock + dt) % self.day_length;
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        let tod = self.tod();
        let flow = match self.mode {
            WeatherMode::Auto => NIGHT_FLOW + (1.0 - NIGHT_FLOW) * 0.5 * (1.0 - (tod * TAU).cos()),
            WeatherMode::Manual => self.manual_flow,
        };
        self.nectar_flow = flow.clamp(0.0, 1.0);
        self.foraging_open = !self.rain && tod > SUNRISE && tod < SUNSET;
    }

    // ── Controls ──────────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: WeatherMode) {
        self.mode = mode;
        self.refresh();
    }

    /// Pin the manual flow, clamped into `[0, 1]`.  Only visible in manual
    /// mode.
    pub fn set_flow(&mut self, flow: f32) {
        if flow.is_finite() {
            self.manual_flow = flow.clamp(0.0, 1.0);
            self.refresh();
        }
    }

    pub fn set_rain(&mut self, rain: bool) {
        self.rain = rain;
        self.refresh();
    }

    // ── Outputs ───────────────────────────────────────────────────────────

    #[inline]
    pub fn tod(&self) -> f32 {
        self.clock / self.day_length
    }

    /// Multiplier on nectar taken from flowers, in `[0, 1]`.
    #[inline]
    pub fn nectar_flow(&self) -> f32 {
        self.nectar_flow
    }

    #[inline]
    pub fn foraging_open(&self) -> bool {
        self.foraging_open
    }

    #[inline]
    pub fn mode(&self) -> WeatherMode {
        self.mode
    }

    #[inline]
    pub fn manual_flow(&self) -> f32 {
        self.manual_flow
    }

    #[inline]
    pub fn is_raining(&self) -> bool {
        self.rain
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather::new(&WeatherConfig::default())
    }
}
