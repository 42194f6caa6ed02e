//! Application constants and default values for sundown.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

// ═══ Temperature Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_DAY_TEMP: u32 = 6500; // Kelvin - close to natural daylight
pub const DEFAULT_NIGHT_TEMP: u32 = 3400; // Kelvin - warm, comfortable for night viewing
pub const NEUTRAL_TEMP: u32 = 6500; // Kelvin - no adjustment, RGB gains of 1.0

// ═══ Schedule Defaults ═══

pub const DEFAULT_DAY_START: &str = "08:00:00";
pub const DEFAULT_NIGHT_START: &str = "20:00:00";
pub const DEFAULT_TRANSITION_MINUTES: u32 = 60; // minutes - gradual change
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 5; // seconds - tick period for smooth transitions

// Fixed window used when sun times cannot be computed (polar day/night)
pub const FALLBACK_DAY_START: &str = "06:00:00";
pub const FALLBACK_NIGHT_START: &str = "18:00:00";

pub const DEFAULT_COUNTRY: &str = "US"; // Country code for postal lookups

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

// Temperature limits (Kelvin scale)
pub const MINIMUM_TEMP: u32 = 1000; // Very warm candlelight-like
pub const MAXIMUM_TEMP: u32 = 40000; // Upper bound of the black-body approximation

// Transition duration limits
pub const MINIMUM_TRANSITION_MINUTES: u32 = 5; // prevents too-rapid changes
pub const MAXIMUM_TRANSITION_MINUTES: u32 = 120; // 2 hours max

// Update interval limits
pub const MINIMUM_UPDATE_INTERVAL_SECS: u64 = 1; // prevents excessive CPU usage
pub const MAXIMUM_UPDATE_INTERVAL_SECS: u64 = 300; // 5 minutes max for responsive transitions

// ═══ Solar Constants ═══

// Solar zenith angle defining sunrise/sunset: 90 degrees to the geometric
// horizon plus 0.833 degrees for atmospheric refraction and solar disk radius.
pub const SOLAR_ZENITH_DEGREES: f64 = 90.833;

// ═══ Operational Timing Constants ═══
// Internal timing values for application operation

pub const STOP_POLL_INTERVAL_MS: u64 = 100; // Granularity of the tick loop's shutdown checks
pub const MAX_CONSECUTIVE_ADAPTER_FAILURES: u32 = 3; // Failures before reporting degraded state

// ═══ Gamma Ramp Constants ═══

pub const DEFAULT_GAMMA_RAMP_SIZE: usize = 256; // Entries per channel lookup table

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
