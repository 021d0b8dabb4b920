//! End-to-end routine resolution against fixed prayer timetables.
//!
//! Times are built by hand in Asia/Riyadh (UTC+3, no DST) so each scenario pins exact
//! boundaries instead of depending on the solar model.

use athkari::slots::scheduler::{UpcomingKind, next_upcoming_event};
use athkari::slots::window::{local_at_hour, next_hour_occurrence};
use athkari::slots::{AfterPrayerWindow, HourRange};
use athkari::{
    CalculationMethod, Prayer, PrayerTimes, SlotKey, TimeWindowConfig, compute_prayer_times,
    resolve_active_routine,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

const TZ: Tz = chrono_tz::Asia::Riyadh;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn local(h: u32, m: u32) -> DateTime<Tz> {
    TZ.from_local_datetime(&date().and_hms_opt(h, m, 0).unwrap())
        .single()
        .unwrap()
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    local(h, m).with_timezone(&Utc)
}

/// Fajr 04:30, Sunrise 05:50, Dhuhr 12:10, Asr 15:30, Maghrib 18:20, Isha 19:50.
fn timetable() -> PrayerTimes {
    PrayerTimes {
        date: date(),
        fajr: utc(4, 30),
        sunrise: utc(5, 50),
        dhuhr: utc(12, 10),
        asr: utc(15, 30),
        maghrib: utc(18, 20),
        isha: utc(19, 50),
    }
}

#[test]
fn test_gap_after_dhuhr_window_has_no_routine() {
    let times = timetable();
    let config = TimeWindowConfig::default();
    let now = local(13, 0);

    assert_eq!(resolve_active_routine(&now, &times, &config), None);

    let upcoming = next_upcoming_event(&now, &times, &config);
    assert_eq!(upcoming.kind, UpcomingKind::Slot(SlotKey::Evening));
    assert_eq!(upcoming.time, local(15, 0));
    assert_eq!(upcoming.to_string(), "Evening at 15:00");
}

#[test]
fn test_after_prayer_window_wins_over_clock_range() {
    let times = timetable();
    let config = TimeWindowConfig::default();

    // 18:25 sits inside the evening range too
    let context = resolve_active_routine(&local(18, 25), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterMaghrib);
    assert_eq!(context.end_time, Some(local(18, 35)));
    assert_eq!(context.next_label.as_deref(), Some("Isha"));
}

#[test]
fn test_after_prayer_window_closes_on_time() {
    let times = timetable();
    let config = TimeWindowConfig::default();

    let inside = resolve_active_routine(&local(12, 25), &times, &config).unwrap();
    assert_eq!(inside.slot, SlotKey::AfterDhuhr);
    assert_eq!(inside.remaining(&local(12, 15)), Some(Duration::minutes(10)));

    assert_eq!(resolve_active_routine(&local(12, 26), &times, &config), None);
}

#[test]
fn test_clock_range_when_no_prayer_window_is_open() {
    let times = timetable();
    let config = TimeWindowConfig::default();

    let context = resolve_active_routine(&local(9, 0), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::Morning);
    assert_eq!(context.end_time, Some(local(11, 0)));
    assert_eq!(context.next_label.as_deref(), Some("Evening"));
}

#[test]
fn test_sleep_range_wraps_midnight() {
    let times = timetable();
    let config = TimeWindowConfig::default();

    let late = resolve_active_routine(&local(23, 0), &times, &config).unwrap();
    assert_eq!(late.slot, SlotKey::Sleep);
    assert_eq!(late.end_time, Some(local(3, 0) + Duration::days(1)));

    let early = resolve_active_routine(&local(2, 0), &times, &config).unwrap();
    assert_eq!(early.slot, SlotKey::Sleep);
    assert_eq!(early.end_time, Some(local(3, 0)));
}

#[test]
fn test_isha_window_then_expiry_after_midnight() {
    let times = timetable();
    let config = TimeWindowConfig::default();

    let context = resolve_active_routine(&local(19, 55), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterIsha);
    assert_eq!(context.end_time, Some(local(20, 5)));

    // Still the Isha period at 00:30, but its window is long gone
    let context = resolve_active_routine(&local(0, 30), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::Sleep);
}

#[test]
fn test_prayer_wins_tie_with_range_start() {
    let mut times = timetable();
    times.asr = utc(15, 0);
    let config = TimeWindowConfig::default();

    let upcoming = next_upcoming_event(&local(13, 0), &times, &config);
    assert_eq!(upcoming.kind, UpcomingKind::Prayer(Prayer::Asr));
    assert_eq!(upcoming.time, local(15, 0));
}

#[test]
fn test_next_event_after_isha_is_tomorrows_boundary() {
    let times = timetable();
    let config = TimeWindowConfig {
        sleep: HourRange::new(22, 3),
        ..TimeWindowConfig::default()
    };

    // After Isha the only candidates left are tomorrow's ranges and tomorrow's Fajr
    let upcoming = next_upcoming_event(&local(21, 0), &times, &config);
    assert_eq!(upcoming.kind, UpcomingKind::Slot(SlotKey::Sleep));
    assert_eq!(upcoming.time, local(22, 0));

    let upcoming = next_upcoming_event(&local(23, 30), &times, &config);
    assert_eq!(upcoming.kind, UpcomingKind::Slot(SlotKey::WakingUp));
    assert_eq!(upcoming.time, local(3, 0) + Duration::days(1));
}

#[test]
fn test_offset_policy_opens_late_and_runs_to_next_prayer() {
    let times = timetable();
    let config = TimeWindowConfig {
        after_prayer: AfterPrayerWindow::offset(15),
        ..TimeWindowConfig::default()
    };

    assert_eq!(resolve_active_routine(&local(12, 15), &times, &config), None);

    let context = resolve_active_routine(&local(12, 30), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterDhuhr);
    assert_eq!(context.end_time, Some(local(15, 30)));
}

#[test]
fn test_include_sunrise_changes_next_event() {
    let times = timetable();
    let without = TimeWindowConfig {
        waking: HourRange::new(3, 4),
        morning: HourRange::new(7, 11),
        ..TimeWindowConfig::default()
    };
    let with = TimeWindowConfig {
        include_sunrise: true,
        ..without
    };
    let now = local(5, 0);

    let upcoming = next_upcoming_event(&now, &times, &without);
    assert_eq!(upcoming.kind, UpcomingKind::Slot(SlotKey::Morning));

    let upcoming = next_upcoming_event(&now, &times, &with);
    assert_eq!(upcoming.kind, UpcomingKind::Prayer(Prayer::Sunrise));
    assert_eq!(upcoming.time, local(5, 50));
}

#[test]
fn test_computed_times_drive_resolution() {
    let times = compute_prayer_times(date(), 21.4225, 39.8262, CalculationMethod::UmmAlQura);
    let config = TimeWindowConfig::default();

    let just_after_maghrib = times.maghrib.with_timezone(&TZ) + Duration::minutes(2);
    let context = resolve_active_routine(&just_after_maghrib, &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterMaghrib);
}

#[test]
fn test_dst_gap_and_overlap_hours() {
    let tz: Tz = chrono_tz::America::New_York;

    // 02:00 does not exist on 2025-03-09; the next valid hour is used
    let spring = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    let gap = local_at_hour(&tz, spring, 2);
    assert_eq!(gap.with_timezone(&Utc), Utc.with_ymd_and_hms(2025, 3, 9, 7, 0, 0).unwrap());

    // 01:00 happens twice on 2025-11-02; the earlier instant is used
    let autumn = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
    let overlap = local_at_hour(&tz, autumn, 1);
    assert_eq!(
        overlap.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2025, 11, 2, 5, 0, 0).unwrap()
    );

    let before = tz
        .from_local_datetime(&spring.and_hms_opt(1, 30, 0).unwrap())
        .single()
        .unwrap();
    assert_eq!(next_hour_occurrence(&before, 2), gap);
}

#[test]
fn test_late_isha_window_ends_at_midnight() {
    let mut times = timetable();
    times.isha = utc(23, 50);
    let config = TimeWindowConfig::default();
    let midnight = local(0, 0) + Duration::days(1);

    let now = local(23, 55);
    let context = resolve_active_routine(&now, &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterIsha);
    assert_eq!(context.end_time, Some(midnight));
    assert_eq!(context.remaining(&now), Some(Duration::minutes(5)));
}

#[test]
fn test_offset_isha_window_ends_at_midnight() {
    let mut times = timetable();
    times.isha = utc(22, 0);
    let config = TimeWindowConfig {
        after_prayer: AfterPrayerWindow::offset(15),
        ..TimeWindowConfig::default()
    };

    let context = resolve_active_routine(&local(22, 30), &times, &config).unwrap();
    assert_eq!(context.slot, SlotKey::AfterIsha);
    assert_eq!(context.end_time, Some(local(0, 0) + Duration::days(1)));
}
