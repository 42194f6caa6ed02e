//! Geographic locations and the resolver seam.
//!
//! This module provides:
//! - Validated [`Coordinates`] shared by the solar calculations
//! - [`Location`]: coordinates plus display name and IANA timezone
//! - Timezone detection from coordinates
//! - The [`LocationResolver`] trait for external postal-code lookup services

pub mod solar;
pub mod timezone;

use chrono_tz::Tz;

/// Errors produced while resolving locations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// Latitude or longitude outside the valid ranges.
    #[error(
        "invalid coordinates ({latitude}, {longitude}): latitude must be within -90..=90 and longitude within -180..=180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// A postal code lookup produced no match.
    #[error("no location found for postal code {postal_code:?} in country {country:?}")]
    NotFound {
        postal_code: String,
        country: String,
    },

    /// No IANA timezone could be determined for the coordinates.
    #[error("could not determine a timezone for coordinates ({latitude}, {longitude})")]
    TimezoneUnknown { latitude: f64, longitude: f64 },
}

/// A validated geographic position.
///
/// Construction checks the ranges once; the value is immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates, validating latitude within -90..=90 and
    /// longitude within -180..=180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A resolved geographic location: coordinates, display name, and timezone.
///
/// Produced once by a resolver (or directly from coordinates) and consumed
/// read-only by the schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    coordinates: Coordinates,
    name: String,
    timezone: Tz,
}

impl Location {
    /// Assemble a location from already-known parts.
    pub fn new(coordinates: Coordinates, name: impl Into<String>, timezone: Tz) -> Self {
        Self {
            coordinates,
            name: name.into(),
            timezone,
        }
    }

    /// Build a location from raw coordinates, detecting the timezone from
    /// the timezone boundary database.
    ///
    /// Fails with [`LocationError::TimezoneUnknown`] when no IANA zone can
    /// be determined (remote ocean positions, mostly). Callers with an
    /// explicit timezone should use [`Location::with_timezone`] instead.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let coordinates = Coordinates::new(latitude, longitude)?;
        let timezone = timezone::find_timezone(latitude, longitude).ok_or(
            LocationError::TimezoneUnknown {
                latitude,
                longitude,
            },
        )?;
        Ok(Self {
            name: coordinates.to_string(),
            coordinates,
            timezone,
        })
    }

    /// Build a location from raw coordinates with an explicit timezone,
    /// bypassing detection.
    pub fn with_timezone(
        latitude: f64,
        longitude: f64,
        timezone: Tz,
    ) -> Result<Self, LocationError> {
        let coordinates = Coordinates::new(latitude, longitude)?;
        Ok(Self {
            name: coordinates.to_string(),
            coordinates,
            timezone,
        })
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// External lookup service mapping postal codes to locations.
///
/// The scheduler core only consumes this interface; concrete
/// implementations (offline tables, web services) live outside the crate.
#[cfg_attr(test, mockall::automock)]
pub trait LocationResolver {
    /// Resolve a postal code within a country to a full location.
    fn resolve(&self, postal_code: &str, country: &str) -> Result<Location, LocationError>;
}
