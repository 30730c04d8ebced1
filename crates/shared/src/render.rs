//! Read-only presentation of workouts for the list and the map popups.

use crate::models::{Workout, WorkoutDetails, WorkoutKind};

/// One icon/value/unit cell in a list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// Everything a list entry shows.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutCard {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<Detail>,
}

impl WorkoutCard {
    pub fn class(&self) -> String {
        list_class(self.kind)
    }
}

impl From<&Workout> for WorkoutCard {
    fn from(w: &Workout) -> Self {
        let mut details = vec![
            Detail::new(w.kind().icon(), format_number(w.distance()), "km"),
            Detail::new("⏱", format_number(w.duration()), "min"),
        ];
        match *w.details() {
            WorkoutDetails::Running { cadence, pace } => {
                details.push(Detail::new("⚡️", format!("{pace:.1}"), "min/km"));
                details.push(Detail::new("🦶🏼", format_number(cadence), "spm"));
            }
            WorkoutDetails::Cycling {
                elevation_gain,
                speed,
            } => {
                details.push(Detail::new("⚡️", format!("{speed:.1}"), "km/h"));
                details.push(Detail::new("🌄", format_number(elevation_gain), "m"));
            }
        }
        Self {
            id: w.id().to_string(),
            kind: w.kind(),
            title: w.description().to_string(),
            details,
        }
    }
}

/// User-entered numbers print as typed: `5` not `5.0`.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

pub fn list_class(kind: WorkoutKind) -> String {
    format!("workout workout--{kind}")
}

pub fn popup_class(kind: WorkoutKind) -> String {
    format!("{kind}-popup")
}

/// Popup text: icon then description.
pub fn popup_content(w: &Workout) -> String {
    let icon = match w.kind() {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴",
    };
    format!("{icon} {}", w.description())
}

/// List entries newest first, as they stack up under the form.
pub fn display_order(workouts: &[Workout]) -> Vec<WorkoutCard> {
    workouts.iter().rev().map(WorkoutCard::from).collect()
}
