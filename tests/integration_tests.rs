use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use sundown::config::{Config, validate_config};
use sundown::schedule::ScheduleModel;
use sundown::{DryRunAdapter, Log, Scheduler, SchedulerState, kelvin_to_rgb, set_color_temperature};

fn create_test_config_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("sundown").join("sundown.toml");

    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, content).unwrap();

    (temp_dir, config_path)
}

#[test]
#[serial]
fn test_loads_fixed_schedule_config() {
    let config_content = r#"
day_temp = 6000
night_temp = 3300
transition_minutes = 30
update_interval = 60
day_start = "07:30:00"
night_start = "19:00:00"
"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.day_temp, Some(6000));
    assert_eq!(config.night_temp, Some(3300));
    assert_eq!(config.transition_minutes, Some(30));
    assert_eq!(config.day_start.as_deref(), Some("07:30:00"));
    assert_eq!(config.night_start.as_deref(), Some("19:00:00"));
}

#[test]
#[serial]
fn test_loads_solar_schedule_config() {
    let config_content = r#"
latitude = 40.7128
longitude = -74.0060
timezone = "America/New_York"
"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.latitude, Some(40.7128));
    assert_eq!(config.longitude, Some(-74.0060));
    assert_eq!(config.timezone.as_deref(), Some("America/New_York"));
}

#[test]
#[serial]
fn test_rejects_invalid_config_file() {
    let config_content = r#"
day_temp = 100
"#;
    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(err.to_string().contains("day_temp"));
}

#[test]
#[serial]
fn test_rejects_unparseable_toml() {
    let (_temp_dir, config_path) = create_test_config_file("day_temp = [not toml");
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
#[serial]
fn test_default_config_round_trip() {
    Log::set_enabled(false);
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("sundown").join("sundown.toml");

    Config::create_default_config(&config_path).unwrap();
    let config = Config::load_from_path(&config_path).unwrap();

    assert!(validate_config(&config).is_ok());
    assert_eq!(config.day_temp, Some(6500));
    assert_eq!(config.night_temp, Some(3400));
    Log::set_enabled(true);
}

/// The documented schedule scenario: fixed day 08:00-20:00, 60 minute
/// transitions, day 6500K / night 3400K.
#[test]
fn test_fixed_schedule_scenario() {
    let model = ScheduleModel::fixed(
        6500,
        3400,
        60,
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        chrono_tz::UTC,
    );

    let at = |h: u32, m: u32| Utc.with_ymd_and_hms(2024, 6, 10, h, m, 0).unwrap();
    let effective = |now: DateTime<Utc>| {
        let target = model.target_at(now);
        match target.window {
            Some(window) => window.current_temperature(now),
            None => target.temperature,
        }
    };

    // 07:00 - flat night
    assert_eq!(effective(at(7, 0)), 3400);

    // 07:30 - strictly between the targets, exactly halfway through the
    // cosine curve; earlier instants sit closer to night
    let half = effective(at(7, 30));
    assert!(half > 3400 && half < 6500);
    assert!(half - 3400 <= 6500 - half);
    let early = effective(at(7, 15));
    assert!(early > 3400 && early - 3400 < (6500 - 3400) / 4);

    // 07:59 - mid-transition toward day
    let late = effective(at(7, 59));
    assert!(late > half && late < 6500);

    // 08:00 - day exactly at the boundary
    assert_eq!(effective(at(8, 0)), 6500);

    // 20:00 - night exactly at the boundary
    assert_eq!(effective(at(20, 0)), 3400);
}

#[test]
fn test_one_shot_application() {
    Log::set_enabled(false);
    let mut adapter = DryRunAdapter::new();
    set_color_temperature(&mut adapter, 3400).unwrap();
    assert_eq!(adapter.last_gain(), Some(kelvin_to_rgb(3400)));
    Log::set_enabled(true);
}

#[test]
fn test_scheduler_lifecycle_from_config() {
    Log::set_enabled(false);
    let config = Config {
        day_temp: Some(6500),
        night_temp: Some(3400),
        transition_minutes: Some(60),
        update_interval: Some(1),
        timezone: Some("UTC".into()),
        ..Config::default()
    };

    let mut scheduler =
        Scheduler::from_config(&config, None, Box::new(DryRunAdapter::new())).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    scheduler.start().unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Running);
    std::thread::sleep(Duration::from_millis(50));
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    // The first tick applied a value between the configured targets
    let applied = scheduler.current_temperature().unwrap();
    assert!((3400..=6500).contains(&applied));
    assert!(!scheduler.is_degraded());
    Log::set_enabled(true);
}
