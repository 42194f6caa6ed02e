//! Time-based schedule computation.
//!
//! This module decides what the target color temperature is at any instant,
//! and whether a transition toward it is in progress. Two anchoring modes
//! are supported: fixed local clock times, and sun-based anchoring through
//! the solar calculations. All comparisons happen on UTC instants; local
//! time only enters when fixed clock times are projected onto a calendar
//! date, which sidesteps DST ambiguity in the scheduling logic itself.
//!
//! ## Transition windows
//!
//! A transition window of `transition_minutes` always *anticipates* its
//! boundary: it starts `transition_minutes` before the boundary (sunrise,
//! sunset, day start, or night start) and ends exactly at the boundary, so
//! the display reaches the new target precisely at the boundary instant,
//! never after it.
//!
//! ## Degraded mode
//!
//! When sun times are unavailable (polar day/night), the model falls back
//! to a fixed 06:00-18:00 local window and reports a degraded flag for the
//! caller to log.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::{FALLBACK_DAY_START, FALLBACK_NIGHT_START};
use crate::geo::Location;
use crate::geo::solar::SolarClock;
use crate::transition::interpolate;

/// An in-progress move between two temperatures, anchored to real time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionWindow {
    pub from_temp: u32,
    pub to_temp: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TransitionWindow {
    /// Linear fraction of the window elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = (self.end - self.start).num_milliseconds() as f64;
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.start).num_milliseconds() as f64;
        (elapsed / total).clamp(0.0, 1.0)
    }

    /// The cosine-eased temperature the display should show at `now`.
    pub fn current_temperature(&self, now: DateTime<Utc>) -> u32 {
        interpolate(self.from_temp, self.to_temp, self.progress(now))
    }
}

/// Result of querying the schedule at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// The temperature the schedule is heading toward (equal to the flat
    /// temperature when no transition is in progress).
    pub temperature: u32,
    /// The active transition window, if `now` falls inside one.
    pub window: Option<TransitionWindow>,
    /// True when sun times were unavailable and the fallback fixed window
    /// was used instead.
    pub degraded: bool,
}

#[derive(Debug)]
enum Anchor {
    Fixed {
        day_start: NaiveTime,
        night_start: NaiveTime,
    },
    Solar {
        clock: SolarClock,
    },
}

/// Pure schedule model: day/night temperatures plus an anchoring mode.
///
/// The model owns its schedule configuration for the lifetime of a
/// scheduler run; changing the configuration means constructing a new
/// model. Queries are idempotent and side-effect-free (the solar cache
/// behind a lock does not affect results).
#[derive(Debug)]
pub struct ScheduleModel {
    day_temp: u32,
    night_temp: u32,
    transition: Duration,
    timezone: Tz,
    anchor: Anchor,
}

impl ScheduleModel {
    /// Schedule anchored to fixed local clock times.
    ///
    /// The day window is `[day_start, night_start)` in `timezone`; outside
    /// it, night applies.
    pub fn fixed(
        day_temp: u32,
        night_temp: u32,
        transition_minutes: u32,
        day_start: NaiveTime,
        night_start: NaiveTime,
        timezone: Tz,
    ) -> Self {
        Self {
            day_temp,
            night_temp,
            transition: Duration::minutes(transition_minutes as i64),
            timezone,
            anchor: Anchor::Fixed {
                day_start,
                night_start,
            },
        }
    }

    /// Schedule anchored to sunrise/sunset at the given location.
    ///
    /// The day window is `[sunrise, sunset)`; outside it, night applies.
    pub fn solar(
        day_temp: u32,
        night_temp: u32,
        transition_minutes: u32,
        location: &Location,
    ) -> Self {
        Self {
            day_temp,
            night_temp,
            transition: Duration::minutes(transition_minutes as i64),
            timezone: location.timezone(),
            anchor: Anchor::Solar {
                clock: SolarClock::new(location.coordinates()),
            },
        }
    }

    pub fn day_temp(&self) -> u32 {
        self.day_temp
    }

    pub fn night_temp(&self) -> u32 {
        self.night_temp
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Target temperature and transition status at `now`.
    ///
    /// Repeated calls with the same `now` return identical results.
    pub fn target_at(&self, now: DateTime<Utc>) -> Target {
        let (boundaries, degraded) = self.boundaries_around(now);

        // The most recent boundary at or before `now` decides the flat
        // target; the next boundary may put us inside a transition window.
        let flat = boundaries
            .iter()
            .rev()
            .find(|(at, _)| *at <= now)
            .map(|&(_, temp)| temp)
            .unwrap_or(self.night_temp);

        if let Some(&(end, to_temp)) = boundaries.iter().find(|(at, _)| *at > now) {
            let start = end - self.transition;
            if now >= start && to_temp != flat {
                return Target {
                    temperature: to_temp,
                    window: Some(TransitionWindow {
                        from_temp: flat,
                        to_temp,
                        start,
                        end,
                    }),
                    degraded,
                };
            }
        }

        Target {
            temperature: flat,
            window: None,
            degraded,
        }
    }

    /// Day/night boundaries for the local dates surrounding `now`, sorted
    /// by instant.
    ///
    /// Three days are enough to cover anticipation windows that cross
    /// midnight in either direction.
    fn boundaries_around(&self, now: DateTime<Utc>) -> (Vec<(DateTime<Utc>, u32)>, bool) {
        let local_date = now.with_timezone(&self.timezone).date_naive();
        let dates = (-1..=1).map(|offset| local_date + Duration::days(offset));

        let mut boundaries = Vec::with_capacity(6);
        let mut degraded = false;

        match &self.anchor {
            Anchor::Fixed {
                day_start,
                night_start,
            } => {
                for date in dates {
                    boundaries.push((self.local_instant(date, *day_start), self.day_temp));
                    boundaries.push((self.local_instant(date, *night_start), self.night_temp));
                }
            }
            Anchor::Solar { clock } => {
                for date in dates.clone() {
                    match clock.sun_times(date) {
                        Ok(times) => {
                            boundaries.push((times.sunrise, self.day_temp));
                            boundaries.push((times.sunset, self.night_temp));
                        }
                        Err(_) => {
                            degraded = true;
                            break;
                        }
                    }
                }
                if degraded {
                    boundaries.clear();
                    let day_start =
                        NaiveTime::parse_from_str(FALLBACK_DAY_START, "%H:%M:%S").unwrap();
                    let night_start =
                        NaiveTime::parse_from_str(FALLBACK_NIGHT_START, "%H:%M:%S").unwrap();
                    for date in dates {
                        boundaries.push((self.local_instant(date, day_start), self.day_temp));
                        boundaries.push((self.local_instant(date, night_start), self.night_temp));
                    }
                }
            }
        }

        boundaries.sort_by_key(|&(at, _)| at);
        (boundaries, degraded)
    }

    /// Project a local wall-clock time on a calendar date to a UTC instant.
    fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| {
                // Nonexistent local time (DST spring-forward gap): the same
                // clock time an hour later always exists.
                self.timezone
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| naive.and_utc())
            })
    }
}
