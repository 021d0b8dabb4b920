//! `athkari status`: print the current prayer and routine once.
//!
//! Supports human-readable and JSON output.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;

use crate::common::utils::{format_countdown, format_hm};
use crate::config::Config;
use crate::monitor::RoutineStatus;
use crate::prayer::{PrayerTimes, compute};

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub time: String,
    pub timezone: String,
    pub method: String,
    pub current_prayer: String,
    pub current_adhan: Option<String>,
    pub active_routine: Option<ActiveReport>,
    pub next_event: NextReport,
    pub prayer_times: Vec<PrayerReport>,
}

#[derive(Debug, Serialize)]
pub struct ActiveReport {
    pub slot: String,
    pub name: String,
    pub ends_at: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextReport {
    pub label: String,
    pub at: String,
    pub in_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct PrayerReport {
    pub prayer: String,
    pub time: String,
}

impl StatusReport {
    pub fn new(status: &RoutineStatus, times: &PrayerTimes, tz: Tz, method: &str) -> Self {
        let wait = status
            .upcoming
            .time
            .clone()
            .signed_duration_since(&status.now);

        Self {
            time: status.now.format("%Y-%m-%d %H:%M:%S").to_string(),
            timezone: tz.to_string(),
            method: method.to_string(),
            current_prayer: status.current_prayer.display_name().to_string(),
            current_adhan: status.current_adhan.map(|p| p.display_name().to_string()),
            active_routine: status.active.as_ref().map(|context| ActiveReport {
                slot: context.slot.as_str().to_string(),
                name: context.slot.display_name().to_string(),
                ends_at: context
                    .end_time
                    .as_ref()
                    .map(|end| end.format("%H:%M").to_string()),
                next: context.next_label.clone(),
            }),
            next_event: NextReport {
                label: status.upcoming.label(),
                at: status.upcoming.time.format("%H:%M").to_string(),
                in_minutes: wait.num_minutes().max(0),
            },
            prayer_times: times
                .iter()
                .map(|(prayer, instant)| PrayerReport {
                    prayer: prayer.display_name().to_string(),
                    time: format_hm(instant, &tz),
                })
                .collect(),
        }
    }
}

pub fn handle_status_command(json: bool) -> Result<()> {
    let config = Config::load()?;
    let location = config.location();
    let method = config.method();
    let window = config.window_config();

    let now = crate::time_source::now().with_timezone(&location.timezone);
    let times = compute(now.date_naive(), location.coordinate, method);
    let status = RoutineStatus::evaluate(&now, &times, &window);
    let report = StatusReport::new(&status, &times, location.timezone, method.as_str());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_human_readable(&report, &status);
    }
    Ok(())
}

fn display_human_readable(report: &StatusReport, status: &RoutineStatus) {
    println!("          Time: {} ({})", report.time, report.timezone);
    println!("Current prayer: {}", report.current_prayer);
    if let Some(adhan) = &report.current_adhan {
        println!("   Last adhan: {adhan}");
    }

    match &report.active_routine {
        Some(active) => {
            println!("Active routine: {}", active.name);
            if let Some(end) = &active.ends_at {
                let left = status
                    .active
                    .as_ref()
                    .and_then(|context| context.remaining(&status.now))
                    .map(format_countdown)
                    .unwrap_or_default();
                println!("         Until: {end} ({left} left)");
            }
            if let Some(next) = &active.next {
                println!("          Next: {next}");
            }
        }
        None => {
            println!("Active routine: none");
            println!(
                "    Next event: {} at {} (in {})",
                report.next_event.label,
                report.next_event.at,
                format_countdown(chrono::Duration::minutes(report.next_event.in_minutes))
            );
        }
    }

    println!();
    for entry in &report.prayer_times {
        println!("{:>14}: {}", entry.prayer, entry.time);
    }
}
