use chrono::{NaiveTime, TimeZone, Utc};
use proptest::prelude::*;

use sundown::kelvin_to_rgb;
use sundown::schedule::ScheduleModel;
use sundown::transition::interpolate;

/// Generate temperatures within the supported Kelvin range
fn kelvin_strategy() -> impl Strategy<Value = u32> {
    1000u32..=40000
}

proptest! {
    /// Interpolation returns the endpoints exactly at the window edges.
    #[test]
    fn interpolate_endpoints(from in kelvin_strategy(), to in kelvin_strategy()) {
        prop_assert_eq!(interpolate(from, to, 0.0), from);
        prop_assert_eq!(interpolate(from, to, 1.0), to);
    }

    /// Interpolation never leaves the interval spanned by its endpoints,
    /// regardless of direction.
    #[test]
    fn interpolate_never_overshoots(
        from in kelvin_strategy(),
        to in kelvin_strategy(),
        fraction in -1.0f64..2.0
    ) {
        let value = interpolate(from, to, fraction);
        prop_assert!(value >= from.min(to));
        prop_assert!(value <= from.max(to));
    }

    /// Interpolation is monotonic in the elapsed fraction.
    #[test]
    fn interpolate_is_monotonic(
        from in kelvin_strategy(),
        to in kelvin_strategy(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0
    ) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let at_early = interpolate(from, to, early);
        let at_late = interpolate(from, to, late);
        if from <= to {
            prop_assert!(at_early <= at_late);
        } else {
            prop_assert!(at_early >= at_late);
        }
    }

    /// The cosine curve is symmetric: interpolating in both directions at
    /// the same fraction meets at the endpoint sum (within rounding).
    #[test]
    fn interpolate_is_symmetric(
        from in kelvin_strategy(),
        to in kelvin_strategy(),
        fraction in 0.0f64..=1.0
    ) {
        let forward = interpolate(from, to, fraction) as i64;
        let backward = interpolate(to, from, 1.0 - fraction) as i64;
        prop_assert!((forward - backward).abs() <= 1);
    }

    /// Every temperature in the supported range maps to gains in [0, 1].
    #[test]
    fn rgb_gains_stay_normalized(kelvin in kelvin_strategy()) {
        let gain = kelvin_to_rgb(kelvin);
        prop_assert!((0.0..=1.0).contains(&gain.red));
        prop_assert!((0.0..=1.0).contains(&gain.green));
        prop_assert!((0.0..=1.0).contains(&gain.blue));
    }

    /// Out-of-range input behaves exactly like the nearest bound under the
    /// lenient policy.
    #[test]
    fn rgb_clamping_matches_bounds(kelvin in 0u32..1000) {
        prop_assert_eq!(kelvin_to_rgb(kelvin), kelvin_to_rgb(1000));
    }

    /// The fixed schedule is idempotent and its effective temperature never
    /// leaves the configured day/night interval.
    #[test]
    fn schedule_effective_temperature_is_bounded(
        minute_of_day in 0u32..1440,
        transition_minutes in 5u32..=120
    ) {
        let model = ScheduleModel::fixed(
            6500,
            3400,
            transition_minutes,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            chrono_tz::UTC,
        );
        let now = Utc
            .with_ymd_and_hms(2024, 6, 10, minute_of_day / 60, minute_of_day % 60, 0)
            .unwrap();

        let target = model.target_at(now);
        prop_assert_eq!(target, model.target_at(now));

        let effective = match target.window {
            Some(window) => window.current_temperature(now),
            None => target.temperature,
        };
        prop_assert!((3400..=6500).contains(&effective));
    }
}
