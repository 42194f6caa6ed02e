//! Timezone detection from geographic coordinates.

use std::sync::OnceLock;

use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

/// Determine the IANA timezone for the given coordinates using the bundled
/// timezone boundary data.
///
/// Returns `None` when the lookup yields nothing parseable (typically far
/// offshore positions). The finder instance is built once and reused; its
/// construction is expensive.
pub fn find_timezone(latitude: f64, longitude: f64) -> Option<Tz> {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude) order
    let name = finder.get_tz_name(longitude, latitude);
    if name.is_empty() {
        return None;
    }
    name.parse().ok()
}
