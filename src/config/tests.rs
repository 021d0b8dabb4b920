use super::validation::{isha_window_warning, validate_config};
use super::*;
use crate::common::constants::test_constants::*;
use chrono::NaiveDate;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, content).unwrap();
    path
}

fn with_xdg_config_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }

    let result = f();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    result
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);

    let result = with_xdg_config_home(temp_dir.path(), Config::load);

    if let Err(e) = &result {
        eprintln!("Config::load() failed: {:?}", e);
    }
    let config = result.unwrap();
    assert!(config_path.exists());

    // The generated file round-trips to the built-in defaults
    assert_eq!(config.window_config(), crate::slots::TimeWindowConfig::default());
    assert_eq!(config.method(), DEFAULT_METHOD);
    assert!(config.location().is_default());
}

#[test]
#[serial]
fn test_config_load_keeps_existing_file() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join(CONFIG_DIR_NAME);
    fs::create_dir_all(&config_dir).unwrap();
    write_config(&config_dir, "method = \"karachi\"\n");

    let config = with_xdg_config_home(temp_dir.path(), Config::load).unwrap();
    assert_eq!(config.method(), crate::prayer::CalculationMethod::Karachi);
}

#[test]
fn test_default_config_file_is_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);
    create_default_config(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("#[Location]"));
    assert!(content.contains("# latitude = 21.4225"));
    assert!(content.contains("sleep = [20, 3]"));

    let parsed: Config = toml::from_str(&content).unwrap();
    assert_eq!(parsed.latitude, None);
    assert_eq!(parsed.sleep, Some(DEFAULT_SLEEP_RANGE));
    validate_config(&parsed).unwrap();
}

#[test]
fn test_load_from_path_full_config() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        r#"
latitude = 51.5074
longitude = -0.1278
method = "muslim_world_league"
waking = [4, 7]
morning = [7, 10]
evening = [16, 19]
sleep = [22, 2]
after_prayer_minutes = 20
after_prayer_policy = "offset"
include_sunrise = true
update_interval = 30
"#,
    );

    let config = load_from_path(&path).unwrap();
    let location = config.location();
    assert!(!location.is_default());
    assert_eq!(location.timezone, chrono_tz::Europe::London);

    let window = config.window_config();
    assert_eq!(window.waking, HourRange::new(4, 7));
    assert_eq!(window.sleep, HourRange::new(22, 2));
    assert_eq!(window.after_prayer, AfterPrayerWindow::offset(20));
    assert!(window.include_sunrise);
    assert_eq!(config.update_interval(), Duration::from_secs(30));
}

#[test]
fn test_load_from_path_missing_file_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let result = load_from_path(&temp_dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_from_path_rejects_malformed_toml() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "waking = [3, \n");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_validation_rejects_out_of_range_values() {
    let cases = [
        Config {
            latitude: Some(91.0),
            ..Default::default()
        },
        Config {
            longitude: Some(-181.0),
            ..Default::default()
        },
        Config {
            morning: Some(HourRange::new(6, 24)),
            ..Default::default()
        },
        Config {
            after_prayer_minutes: Some(0),
            ..Default::default()
        },
        Config {
            after_prayer_minutes: Some(MAXIMUM_AFTER_PRAYER_MINUTES + 1),
            ..Default::default()
        },
        Config {
            update_interval: Some(MINIMUM_UPDATE_INTERVAL - 1),
            ..Default::default()
        },
        Config {
            after_prayer_policy: Some("sometimes".to_string()),
            ..Default::default()
        },
        Config {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..Default::default()
        },
    ];

    for config in cases {
        assert!(validate_config(&config).is_err(), "accepted {config:?}");
    }
}

#[test]
fn test_validation_rejects_identical_range_bounds() {
    let config = Config {
        evening: Some(HourRange::new(15, 15)),
        ..Default::default()
    };
    let error = validate_config(&config).unwrap_err().to_string();
    assert!(error.contains("evening"), "{error}");
}

#[test]
fn test_validation_accepts_boundaries() {
    let config = Config {
        latitude: Some(-90.0),
        longitude: Some(180.0),
        sleep: Some(HourRange::new(23, 0)),
        after_prayer_minutes: Some(MINIMUM_AFTER_PRAYER_MINUTES),
        update_interval: Some(MAXIMUM_UPDATE_INTERVAL),
        timezone: Some("UTC".to_string()),
        ..Default::default()
    };
    validate_config(&config).unwrap();
}

#[test]
fn test_unknown_method_falls_back() {
    let config = Config {
        method: Some("lunar".to_string()),
        ..Default::default()
    };
    validate_config(&config).unwrap();
    assert_eq!(config.method(), DEFAULT_METHOD);
}

#[test]
fn test_isha_window_warning() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    // Mecca Isha is around 20:30, fifteen minutes stays well before midnight
    let config = Config::default();
    assert_eq!(isha_window_warning(&config, date), None);

    // Four hours runs past midnight
    let config = Config {
        after_prayer_minutes: Some(MAXIMUM_AFTER_PRAYER_MINUTES),
        ..Default::default()
    };
    assert!(isha_window_warning(&config, date).is_some());

    let config = Config {
        after_prayer_policy: Some("offset".to_string()),
        ..Default::default()
    };
    assert!(isha_window_warning(&config, date).is_some());
}

#[test]
fn test_explicit_timezone_is_used() {
    let config = Config {
        latitude: Some(TEST_COORDINATE.latitude),
        longitude: Some(TEST_COORDINATE.longitude),
        timezone: Some("Asia/Dubai".to_string()),
        ..Default::default()
    };
    assert_eq!(config.location().timezone, chrono_tz::Asia::Dubai);
    assert_eq!(config.location().coordinate, TEST_COORDINATE);
}
