//! Service-update derivation for `/api/updates`.
//!
//! A small deterministic rule engine over the cached weather and train
//! snapshots. Message order: the fixed on-schedule notice, an optional
//! weather advisory, then either one disruption or the generic delay notice.

use crate::feeds::TrainArrival;
use serde::Serialize;

/// Delays above this many seconds count as a service disruption.
const DISRUPTION_FLOOR_SECONDS: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateKind {
    #[serde(rename = "on-time")]
    OnTime,
    #[serde(rename = "delayed")]
    Delayed,
    #[serde(rename = "disrupted")]
    Disrupted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub message: String,
}

impl Update {
    fn new(kind: UpdateKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Derives the update list from the current snapshots.
///
/// `weather_condition` is the condition string from the cached weather
/// report, if any. At most one disruption message is emitted: the first
/// arrival more than ten minutes behind schedule wins and scanning stops.
pub fn recent_updates(
    weather_condition: Option<&str>,
    arrivals: &[TrainArrival],
) -> Vec<Update> {
    let mut updates = vec![Update::new(
        UpdateKind::OnTime,
        "Route 110 operating on schedule",
    )];

    if let Some(condition) = weather_condition {
        let condition = condition.to_lowercase();
        if condition.contains("rain") || condition.contains("storm") {
            updates.push(Update::new(
                UpdateKind::Delayed,
                "Weather advisory: Expect delays on north-bound routes due to rain",
            ));
        } else if condition.contains("snow") {
            updates.push(Update::new(
                UpdateKind::Disrupted,
                "Weather advisory: Service disruptions possible due to snow",
            ));
        }
    }

    for arrival in arrivals {
        let Some(delay) = arrival.delay_seconds() else {
            continue;
        };
        if delay > DISRUPTION_FLOOR_SECONDS {
            updates.push(Update::new(
                UpdateKind::Disrupted,
                format!(
                    "Service disruption on {} Line between {} and {}",
                    arrival.line, arrival.station, arrival.destination
                ),
            ));
            break;
        }
    }

    if !updates.iter().any(|u| u.kind == UpdateKind::Disrupted) {
        updates.push(Update::new(
            UpdateKind::Delayed,
            "Minor delays expected during rush hour",
        ));
    }

    updates
}

/// Served when the cached train snapshot cannot be read at all.
pub fn fallback_updates() -> Vec<Update> {
    vec![
        Update::new(UpdateKind::OnTime, "Route 110 operating on schedule"),
        Update::new(
            UpdateKind::Delayed,
            "Weather advisory: Expect delays on north-bound routes",
        ),
        Update::new(
            UpdateKind::Disrupted,
            "Service disruption on Blue Line between Stations A and B",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(line: &str, station: &str, destination: &str, delay: Option<&str>) -> TrainArrival {
        TrainArrival {
            train_id: None,
            line: line.to_string(),
            station: station.to_string(),
            destination: destination.to_string(),
            delay: delay.map(str::to_string),
            waiting_time: None,
        }
    }

    #[test]
    fn test_empty_snapshot_yields_fixed_notice_and_generic_delay() {
        let updates = recent_updates(None, &[]);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].kind, UpdateKind::OnTime);
        assert_eq!(updates[0].message, "Route 110 operating on schedule");
        assert_eq!(updates[1].kind, UpdateKind::Delayed);
        assert_eq!(updates[1].message, "Minor delays expected during rush hour");
    }

    #[test]
    fn test_disruption_replaces_generic_notice() {
        let arrivals = vec![arrival(
            "RED",
            "MIDTOWN STATION",
            "North Springs",
            Some("T900S"),
        )];
        let updates = recent_updates(None, &arrivals);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].kind, UpdateKind::Disrupted);
        assert_eq!(
            updates[1].message,
            "Service disruption on RED Line between MIDTOWN STATION and North Springs"
        );
    }

    #[test]
    fn test_only_first_disruption_is_reported() {
        let arrivals = vec![
            arrival("RED", "MIDTOWN STATION", "North Springs", Some("T900S")),
            arrival("GOLD", "AIRPORT STATION", "Doraville", Some("T1200S")),
        ];
        let updates = recent_updates(None, &arrivals);

        let disruptions: Vec<_> = updates
            .iter()
            .filter(|u| u.kind == UpdateKind::Disrupted)
            .collect();
        assert_eq!(disruptions.len(), 1);
        assert!(disruptions[0].message.contains("RED Line"));
    }

    #[test]
    fn test_ten_minute_delay_is_not_a_disruption() {
        let arrivals = vec![arrival("BLUE", "DECATUR STATION", "Indian Creek", Some("T600S"))];
        let updates = recent_updates(None, &arrivals);

        assert!(updates.iter().all(|u| u.kind != UpdateKind::Disrupted));
        assert_eq!(updates.last().unwrap().kind, UpdateKind::Delayed);
    }

    #[test]
    fn test_rainy_weather_adds_advisory() {
        let updates = recent_updates(Some("Moderate rain"), &[]);

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[1].kind, UpdateKind::Delayed);
        assert!(updates[1].message.contains("due to rain"));
        assert_eq!(updates[2].message, "Minor delays expected during rush hour");
    }

    #[test]
    fn test_snow_advisory_counts_as_disruption() {
        let updates = recent_updates(Some("Heavy snow fall"), &[]);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].kind, UpdateKind::Disrupted);
        // The snow advisory suppresses the generic delay notice.
        assert!(updates.iter().all(|u| u.message != "Minor delays expected during rush hour"));
    }

    #[test]
    fn test_clear_weather_adds_no_advisory() {
        let updates = recent_updates(Some("Clear sky"), &[]);
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let arrivals = vec![arrival("RED", "MIDTOWN STATION", "North Springs", Some("T900S"))];
        assert_eq!(
            recent_updates(Some("Thunderstorm"), &arrivals),
            recent_updates(Some("Thunderstorm"), &arrivals)
        );
    }

    #[test]
    fn test_fallback_updates_shape() {
        let updates = fallback_updates();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].kind, UpdateKind::OnTime);
        assert_eq!(updates[1].kind, UpdateKind::Delayed);
        assert_eq!(updates[2].kind, UpdateKind::Disrupted);
    }
}
