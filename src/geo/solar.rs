//! Astronomical sunrise/sunset computation.
//!
//! Implements the standard solar-position algorithm: day of year, solar mean
//! anomaly, true longitude, right ascension, declination, and the hour angle
//! at which the sun crosses the sunrise/sunset zenith (90.833 degrees,
//! accounting for atmospheric refraction and the solar disk radius). The
//! event's local mean time is converted to UTC through the longitude offset.
//!
//! Results are UTC instants accurate to within a few minutes of almanac
//! values; exact ephemeris accuracy is explicitly not a goal. Timezone
//! conversion is for display only — all scheduling logic compares UTC
//! instants.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::constants::SOLAR_ZENITH_DEGREES;
use crate::geo::Coordinates;

/// Why a date has no sunrise/sunset at a given latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    /// The sun never drops below the horizon (midnight sun).
    ContinuousDay,
    /// The sun never climbs above the horizon (polar night).
    ContinuousNight,
}

impl std::fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolarCondition::ContinuousDay => write!(f, "continuous day"),
            PolarCondition::ContinuousNight => write!(f, "continuous night"),
        }
    }
}

/// Errors produced by the solar calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolarError {
    /// Polar day or polar night: the sun never crosses the sunrise/sunset
    /// zenith on this date. Callers recover by falling back to a fixed
    /// schedule.
    #[error("no sunrise or sunset at latitude {latitude:.4} on {date}: {condition}")]
    NoSunriseOrSunset {
        latitude: f64,
        date: NaiveDate,
        condition: PolarCondition,
    },
}

/// Sunrise and sunset instants for one coordinates/date pair, in UTC.
///
/// Either instant may fall on the UTC calendar day before or after the
/// queried local date; the values are absolute instants, which is what the
/// schedule compares against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Sunrise/sunset calculator for a fixed set of coordinates.
///
/// Results are cached per calendar date and recomputed lazily; querying
/// never mutates the coordinates.
#[derive(Debug)]
pub struct SolarClock {
    coordinates: Coordinates,
    cache: Mutex<HashMap<NaiveDate, SunTimes>>,
}

impl SolarClock {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Sunrise and sunset for the given calendar date.
    ///
    /// Fails with [`SolarError::NoSunriseOrSunset`] under polar conditions.
    pub fn sun_times(&self, date: NaiveDate) -> Result<SunTimes, SolarError> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(times) = cache.get(&date) {
            return Ok(*times);
        }
        let times = compute_sun_times(self.coordinates, date)?;
        cache.insert(date, times);
        Ok(times)
    }
}

#[derive(Debug, Clone, Copy)]
enum SolarEvent {
    Sunrise,
    Sunset,
}

fn compute_sun_times(coordinates: Coordinates, date: NaiveDate) -> Result<SunTimes, SolarError> {
    let sunrise = event_hours_utc(coordinates, date, SolarEvent::Sunrise).map_err(|condition| {
        SolarError::NoSunriseOrSunset {
            latitude: coordinates.latitude(),
            date,
            condition,
        }
    })?;
    let sunset = event_hours_utc(coordinates, date, SolarEvent::Sunset).map_err(|condition| {
        SolarError::NoSunriseOrSunset {
            latitude: coordinates.latitude(),
            date,
            condition,
        }
    })?;

    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    Ok(SunTimes {
        sunrise: midnight + Duration::milliseconds((sunrise * 3_600_000.0).round() as i64),
        sunset: midnight + Duration::milliseconds((sunset * 3_600_000.0).round() as i64),
    })
}

/// Compute the UTC hour of a solar event on the given date.
///
/// The event's local mean time is normalized into `[0, 24)`, which anchors
/// it to the queried local date; applying the longitude offset can then
/// push the returned UTC value outside `[0, 24)`, placing the event on the
/// adjacent UTC calendar day. That is the correct absolute instant, so the
/// value is returned without further wrapping.
fn event_hours_utc(
    coordinates: Coordinates,
    date: NaiveDate,
    event: SolarEvent,
) -> Result<f64, PolarCondition> {
    let latitude = coordinates.latitude().to_radians();
    let lng_hour = coordinates.longitude() / 15.0;
    let day_of_year = date.ordinal() as f64;

    // Approximate event time, used to evaluate the sun's orbital position
    let t = match event {
        SolarEvent::Sunrise => day_of_year + (6.0 - lng_hour) / 24.0,
        SolarEvent::Sunset => day_of_year + (18.0 - lng_hour) / 24.0,
    };

    // Mean anomaly and true longitude, in degrees
    let mean_anomaly = 0.9856 * t - 3.289;
    let true_longitude = (mean_anomaly
        + 1.916 * mean_anomaly.to_radians().sin()
        + 0.020 * (2.0 * mean_anomaly).to_radians().sin()
        + 282.634)
        .rem_euclid(360.0);

    // Right ascension, shifted into the same quadrant as the true longitude
    // and converted to hours
    let mut right_ascension = (0.91764 * true_longitude.to_radians().tan())
        .atan()
        .to_degrees()
        .rem_euclid(360.0);
    let longitude_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ra_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension = (right_ascension + longitude_quadrant - ra_quadrant) / 15.0;

    // Declination
    let sin_declination = 0.39782 * true_longitude.to_radians().sin();
    let cos_declination = sin_declination.asin().cos();

    // Hour angle at the sunrise/sunset zenith
    let cos_hour_angle = (SOLAR_ZENITH_DEGREES.to_radians().cos()
        - sin_declination * latitude.sin())
        / (cos_declination * latitude.cos());
    if cos_hour_angle > 1.0 {
        return Err(PolarCondition::ContinuousNight);
    }
    if cos_hour_angle < -1.0 {
        return Err(PolarCondition::ContinuousDay);
    }

    let hour_angle = match event {
        SolarEvent::Sunrise => 360.0 - cos_hour_angle.acos().to_degrees(),
        SolarEvent::Sunset => cos_hour_angle.acos().to_degrees(),
    } / 15.0;

    // Local mean time of the event, then UTC via the longitude offset
    let local_mean_time = (hour_angle + right_ascension - 0.06571 * t - 6.622).rem_euclid(24.0);
    Ok(local_mean_time - lng_hour)
}
