//! # Sundown
//!
//! Automatic screen color temperature adjustment based on time of day.
//!
//! Sundown lowers a display's color temperature in the evening and restores
//! it in the morning, anchored either to fixed clock times or to the actual
//! sunrise and sunset at a geographic location, with cosine-eased
//! transitions between the day and night targets.
//!
//! ## Architecture
//!
//! - **color**: Kelvin to RGB gain conversion and named presets
//! - **geo**: coordinates, locations, timezone detection, and the
//!   sunrise/sunset calculations
//! - **schedule**: the pure model deciding the target temperature for any
//!   instant, including transition windows
//! - **transition**: cosine-eased interpolation between temperatures
//! - **scheduler**: the periodic tick loop pushing values to the display
//! - **backend**: the display adapter seam and gamma table construction
//! - **config**: TOML configuration loading, validation, and defaults
//! - **constants**: application-wide defaults and limits
//! - **logger**: structured logging with visual formatting
//! - **args**: command-line argument parsing

pub mod args;
pub mod backend;
pub mod color;
pub mod config;
pub mod constants;
pub mod geo;
pub mod logger;
pub mod schedule;
pub mod scheduler;
pub mod transition;

// Re-export important types for easier access
pub use backend::{DisplayAdapter, DryRunAdapter, reset_gamma, set_color_temperature};
pub use color::{Preset, RgbGain, kelvin_to_rgb, kelvin_to_rgb_strict};
pub use config::Config;
pub use geo::{Coordinates, Location, LocationResolver};
pub use logger::{Log, LogLevel};
pub use schedule::{ScheduleModel, Target, TransitionWindow};
pub use scheduler::{Scheduler, SchedulerState};
