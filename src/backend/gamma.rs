//! Gamma lookup table construction.
//!
//! Display drivers consume per-channel lookup tables of 16-bit values.
//! This module turns an [`RgbGain`] into those tables: each channel is a
//! linear ramp scaled by its gain, so a gain of 1.0 yields the identity
//! ramp and lower gains darken the channel proportionally.

use crate::color::RgbGain;

/// Per-channel 16-bit gamma lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaRamp {
    pub red: Vec<u16>,
    pub green: Vec<u16>,
    pub blue: Vec<u16>,
}

impl GammaRamp {
    /// Build ramps of `size` entries per channel from the given gains.
    pub fn from_gain(size: usize, gain: RgbGain) -> Self {
        Self {
            red: channel_table(size, gain.red),
            green: channel_table(size, gain.green),
            blue: channel_table(size, gain.blue),
        }
    }

    /// Entries per channel.
    pub fn size(&self) -> usize {
        self.red.len()
    }

    /// Concatenated R, G, B tables as little-endian bytes, the layout most
    /// gamma protocols expect.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size() * 3 * 2);
        for channel in [&self.red, &self.green, &self.blue] {
            for value in channel {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }
}

/// Linear ramp of `size` entries scaled by `gain`.
///
/// Entry `i` maps to `i * (65536 / size) * gain`, truncated and clamped to
/// the 16-bit range.
fn channel_table(size: usize, gain: f64) -> Vec<u16> {
    let step = 65536.0 / size as f64;
    (0..size)
        .map(|i| {
            let value = (i as f64 * step * gain) as i64;
            value.clamp(0, 65535) as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::kelvin_to_rgb;

    #[test]
    fn test_identity_ramp_at_full_gain() {
        let ramp = GammaRamp::from_gain(256, RgbGain::NEUTRAL);
        assert_eq!(ramp.size(), 256);
        assert_eq!(ramp.red[0], 0);
        assert_eq!(ramp.red[1], 256);
        assert_eq!(ramp.red[255], 255 * 256);
        assert_eq!(ramp.red, ramp.green);
        assert_eq!(ramp.red, ramp.blue);
    }

    #[test]
    fn test_zero_gain_blanks_channel() {
        let gain = RgbGain {
            red: 1.0,
            green: 1.0,
            blue: 0.0,
        };
        let ramp = GammaRamp::from_gain(256, gain);
        assert!(ramp.blue.iter().all(|&v| v == 0));
        assert!(ramp.red.iter().any(|&v| v > 0));
    }

    #[test]
    fn test_ramps_are_monotonic() {
        let ramp = GammaRamp::from_gain(256, kelvin_to_rgb(3400));
        for channel in [&ramp.red, &ramp.green, &ramp.blue] {
            for pair in channel.windows(2) {
                assert!(pair[1] >= pair[0]);
            }
        }
    }

    #[test]
    fn test_warm_temperature_orders_channels() {
        let ramp = GammaRamp::from_gain(256, kelvin_to_rgb(2700));
        let top = ramp.size() - 1;
        assert!(ramp.red[top] > ramp.green[top]);
        assert!(ramp.green[top] > ramp.blue[top]);
    }

    #[test]
    fn test_le_bytes_layout() {
        let ramp = GammaRamp::from_gain(128, RgbGain::NEUTRAL);
        let bytes = ramp.to_le_bytes();
        assert_eq!(bytes.len(), 128 * 3 * 2);
        // First entry of every channel is zero
        assert_eq!(&bytes[0..2], &[0, 0]);
    }
}
