//! Display adapter abstraction.
//!
//! The scheduler core hands finished [`RgbGain`] triples to a
//! [`DisplayAdapter`] and stays agnostic to everything below that line:
//! how many displays exist, which platform API applies the gamma ramp, and
//! how long the device call takes. Adapter calls are treated as potentially
//! blocking I/O; timeout policy belongs to the adapter, not the core.
//!
//! The crate ships the gamma lookup-table construction ([`gamma`]) and a
//! [`DryRunAdapter`] that only logs. Real device backends implement
//! [`DisplayAdapter`] outside the core and plug in through
//! [`create_adapter`].

pub mod gamma;

use crate::color::{RgbGain, kelvin_to_rgb};
use crate::constants::NEUTRAL_TEMP;
use crate::logger::Log;

/// Errors produced by display adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// The gamma ramp could not be applied to one or more displays.
    #[error("failed to apply gamma ramp: {reason}")]
    Apply { reason: String },

    /// The display device is not reachable at all.
    #[error("display device unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Applies RGB channel gains to the displays it manages.
///
/// Implementations apply the gains to every display they enumerate; the
/// scheduler core never inspects display counts.
pub trait DisplayAdapter: Send {
    /// Apply the given channel gains to all managed displays.
    fn apply(&mut self, gain: RgbGain) -> Result<(), AdapterError>;

    /// Human-readable adapter name for logging.
    fn name(&self) -> &'static str;
}

/// Adapter that logs what it would apply instead of touching hardware.
///
/// Used by the CLI when no device backend is compiled in, and by tests that
/// want to observe the most recent application.
#[derive(Debug, Default)]
pub struct DryRunAdapter {
    last_gain: Option<RgbGain>,
}

impl DryRunAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently applied gain, if any.
    pub fn last_gain(&self) -> Option<RgbGain> {
        self.last_gain
    }
}

impl DisplayAdapter for DryRunAdapter {
    fn apply(&mut self, gain: RgbGain) -> Result<(), AdapterError> {
        Log::log_indented(&format!("would apply channel gains {}", gain));
        self.last_gain = Some(gain);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

/// Create the display adapter for this environment.
///
/// This is the seam where platform gamma backends plug in; the built-in
/// fallback is the logging [`DryRunAdapter`].
pub fn create_adapter() -> Result<Box<dyn DisplayAdapter>, AdapterError> {
    Ok(Box::new(DryRunAdapter::new()))
}

/// Resolve a temperature through the color model and apply it once.
pub fn set_color_temperature(
    adapter: &mut dyn DisplayAdapter,
    kelvin: u32,
) -> Result<(), AdapterError> {
    adapter.apply(kelvin_to_rgb(kelvin))
}

/// Restore the neutral 6500K state.
pub fn reset_gamma(adapter: &mut dyn DisplayAdapter) -> Result<(), AdapterError> {
    set_color_temperature(adapter, NEUTRAL_TEMP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_records_last_gain() {
        let mut adapter = DryRunAdapter::new();
        assert_eq!(adapter.last_gain(), None);

        set_color_temperature(&mut adapter, 3400).unwrap();
        assert_eq!(adapter.last_gain(), Some(kelvin_to_rgb(3400)));
    }

    #[test]
    fn test_reset_gamma_is_neutral() {
        let mut adapter = DryRunAdapter::new();
        reset_gamma(&mut adapter).unwrap();
        let gain = adapter.last_gain().unwrap();
        assert_eq!(gain, kelvin_to_rgb(6500));
        assert_eq!(gain.red, 1.0);
    }

    #[test]
    fn test_create_adapter_returns_dry_run() {
        let adapter = create_adapter().unwrap();
        assert_eq!(adapter.name(), "dry-run");
    }
}
