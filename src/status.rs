//! System-status derivation.
//!
//! Pure functions over the cached train snapshot; nothing here is cached
//! separately, so a status response is always consistent with whatever the
//! handler read from the store.

use crate::feeds::TrainArrival;
use serde::Serialize;

/// Delays under this many seconds are ignored entirely.
const DELAY_FLOOR_SECONDS: i64 = 300;

/// Average line delays under this many minutes don't affect the line.
const AFFECTED_FLOOR_MINUTES: i64 = 5;

/// Prefixes that upgrade the overall status to Major Delays.
///
/// Kept as the literal string-prefix check from the original dashboard, which
/// also matches e.g. a 100-minute delay against "10". Intentionally not
/// "fixed" to a numeric >= 10 comparison.
const MAJOR_DELAY_PREFIXES: [&str; 6] = ["10", "11", "12", "13", "14", "15"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceLevel {
    #[serde(rename = "On Time")]
    OnTime,
    #[serde(rename = "Minor Delays")]
    MinorDelays,
    #[serde(rename = "Major Delays")]
    MajorDelays,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedLine {
    pub line: String,
    pub delay: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainStatus {
    pub status: ServiceLevel,
    pub details: String,
    #[serde(rename = "affectedLines")]
    pub affected_lines: Vec<AffectedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusStatus {
    pub status: ServiceLevel,
    pub percentage: u8,
    pub details: String,
}

/// The `/api/status` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    #[serde(rename = "busStatus")]
    pub bus_status: BusStatus,
    #[serde(rename = "trainStatus")]
    pub train_status: TrainStatus,
}

/// Derives the train-line status from the current arrivals snapshot.
pub fn train_status(arrivals: &[TrainArrival]) -> TrainStatus {
    // Group significant absolute delays by line, preserving first-seen order.
    let mut delays_by_line: Vec<(String, Vec<i64>)> = Vec::new();
    for arrival in arrivals {
        let Some(delay) = arrival.delay_seconds() else {
            continue;
        };
        if delay.abs() <= DELAY_FLOOR_SECONDS {
            continue;
        }

        match delays_by_line.iter().position(|(l, _)| *l == arrival.line) {
            Some(idx) => delays_by_line[idx].1.push(delay.abs()),
            None => delays_by_line.push((arrival.line.clone(), vec![delay.abs()])),
        }
    }

    let mut affected_lines = Vec::new();
    let mut details = Vec::new();
    for (line, delays) in delays_by_line {
        let avg_delay = delays.iter().sum::<i64>() as f64 / delays.len() as f64;
        let minutes = (avg_delay / 60.0).round() as i64;

        if minutes >= AFFECTED_FLOOR_MINUTES {
            details.push(format!("{line} Line: {minutes} minute delays"));
            affected_lines.push(AffectedLine {
                line,
                delay: format!("{minutes} minutes"),
            });
        }
    }

    if affected_lines.is_empty() {
        return TrainStatus {
            status: ServiceLevel::OnTime,
            details: "All lines operating normally".to_string(),
            affected_lines: Vec::new(),
        };
    }

    let major = affected_lines.iter().any(|l| {
        MAJOR_DELAY_PREFIXES
            .iter()
            .any(|prefix| l.delay.starts_with(prefix))
    });

    TrainStatus {
        status: if major {
            ServiceLevel::MajorDelays
        } else {
            ServiceLevel::MinorDelays
        },
        details: details.join(", "),
        affected_lines,
    }
}

/// Bus status placeholder; there is no trip-based computation yet.
// TODO: derive this from the cached bus trip updates once the feed shape settles.
pub fn bus_status() -> BusStatus {
    BusStatus {
        status: ServiceLevel::OnTime,
        percentage: 95,
        details: "95% of routes operating normally".to_string(),
    }
}

pub fn system_status(arrivals: &[TrainArrival]) -> SystemStatus {
    SystemStatus {
        bus_status: bus_status(),
        train_status: train_status(arrivals),
    }
}

/// Served when the cached train snapshot cannot be read at all.
pub fn fallback_status() -> SystemStatus {
    SystemStatus {
        bus_status: bus_status(),
        train_status: TrainStatus {
            status: ServiceLevel::MinorDelays,
            details: "Red Line: 5-10 minute delays".to_string(),
            affected_lines: vec![AffectedLine {
                line: "RED".to_string(),
                delay: "5-10 minutes".to_string(),
            }],
        },
    }
}
