use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing timestamp digits kept for a workout id.
const ID_DIGITS: usize = 10;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    let idx = (month.clamp(1, 12) - 1) as usize;
    MONTHS[idx]
}

/// A latitude/longitude pair in degrees, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const ALL: [WorkoutKind; 2] = [WorkoutKind::Running, WorkoutKind::Cycling];

    /// Lowercase form used in storage, CSS classes and the type selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized form used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }
}

impl std::fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(format!("unknown workout type: {other}")),
        }
    }
}

/// Variant payload. `pace` and `speed` are derived once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        cadence: f64,
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevGain")]
        elevation_gain: f64,
        speed: f64,
    },
}

/// Minutes per kilometre.
pub fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// Kilometres per minute of duration; shown with a km/h unit label.
pub fn speed(distance: f64, duration: f64) -> f64 {
    distance / duration
}

/// A validated, typed form submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    /// Cadence for running, elevation gain for cycling.
    pub variant: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        created: DateTime<Local>,
    ) -> Self {
        let details = WorkoutDetails::Running {
            cadence,
            pace: pace(distance, duration),
        };
        Self::build(coords, distance, duration, details, created)
    }

    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        created: DateTime<Local>,
    ) -> Self {
        let details = WorkoutDetails::Cycling {
            elevation_gain,
            speed: speed(distance, duration),
        };
        Self::build(coords, distance, duration, details, created)
    }

    /// Construct the variant selected by `input.kind`.
    pub fn new(coords: Coords, input: &WorkoutInput, created: DateTime<Local>) -> Self {
        match input.kind {
            WorkoutKind::Running => {
                Self::running(coords, input.distance, input.duration, input.variant, created)
            }
            WorkoutKind::Cycling => {
                Self::cycling(coords, input.distance, input.duration, input.variant, created)
            }
        }
    }

    fn build(
        coords: Coords,
        distance: f64,
        duration: f64,
        details: WorkoutDetails,
        created: DateTime<Local>,
    ) -> Self {
        let kind = details_kind(&details);
        Self {
            id: id_from_timestamp(created.timestamp_millis()),
            date: created.with_timezone(&Utc),
            coords,
            distance,
            duration,
            description: describe(kind, &created),
            details,
        }
    }

    /// Rebuild a workout from persisted scalars, re-deriving pace or speed.
    /// A missing description is regenerated from `date` in local time.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        description: Option<String>,
        kind: WorkoutKind,
        variant: f64,
    ) -> Self {
        let details = match kind {
            WorkoutKind::Running => WorkoutDetails::Running {
                cadence: variant,
                pace: pace(distance, duration),
            },
            WorkoutKind::Cycling => WorkoutDetails::Cycling {
                elevation_gain: variant,
                speed: speed(distance, duration),
            },
        };
        let description =
            description.unwrap_or_else(|| describe(kind, &date.with_timezone(&Local)));
        Self {
            id,
            date,
            coords,
            distance,
            duration,
            description,
            details,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        details_kind(&self.details)
    }

    /// Pace (min/km) for running, speed for cycling.
    pub fn metric(&self) -> f64 {
        match self.details {
            WorkoutDetails::Running { pace, .. } => pace,
            WorkoutDetails::Cycling { speed, .. } => speed,
        }
    }

    pub fn cadence(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { cadence, .. } => Some(cadence),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { elevation_gain, .. } => Some(elevation_gain),
            WorkoutDetails::Running { .. } => None,
        }
    }
}

fn details_kind(details: &WorkoutDetails) -> WorkoutKind {
    match details {
        WorkoutDetails::Running { .. } => WorkoutKind::Running,
        WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
    }
}

fn describe<Tz: TimeZone>(kind: WorkoutKind, date: &DateTime<Tz>) -> String {
    format!(
        "{} on {} at {}",
        kind.label(),
        month_name(date.month()),
        date.day()
    )
}

fn id_from_timestamp(millis: i64) -> String {
    let digits = millis.to_string();
    let start = digits.len().saturating_sub(ID_DIGITS);
    digits[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_fifth() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_running_pace_is_duration_over_distance() {
        let w = Workout::running(Coords::new(51.5, -0.12), 5.0, 25.0, 180.0, march_fifth());
        assert_eq!(w.metric(), 25.0 / 5.0);
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.cadence(), Some(180.0));
        assert!(w.elevation_gain().is_none());
    }

    #[test]
    fn test_cycling_speed_is_distance_over_duration() {
        let w = Workout::cycling(Coords::new(0.0, 0.0), 27.0, 95.0, 523.0, march_fifth());
        assert_eq!(w.metric(), 27.0 / 95.0);
        assert_eq!(w.kind(), WorkoutKind::Cycling);
        assert_eq!(w.elevation_gain(), Some(523.0));
        assert!(w.cadence().is_none());
    }

    #[test]
    fn test_description_format() {
        let run = Workout::running(Coords::new(1.0, 2.0), 5.0, 25.0, 180.0, march_fifth());
        assert_eq!(run.description(), "Running on March at 5");
        let ride = Workout::cycling(Coords::new(1.0, 2.0), 5.0, 25.0, 10.0, march_fifth());
        assert_eq!(ride.description(), "Cycling on March at 5");
    }

    #[test]
    fn test_id_is_last_ten_timestamp_digits() {
        let created = march_fifth();
        let w = Workout::running(Coords::new(1.0, 2.0), 1.0, 1.0, 1.0, created);
        let full = created.timestamp_millis().to_string();
        assert_eq!(w.id().len(), 10);
        assert!(full.ends_with(w.id()));
    }

    #[test]
    fn test_id_short_timestamp_kept_whole() {
        assert_eq!(id_from_timestamp(12345), "12345");
    }

    #[test]
    fn test_new_dispatches_on_kind() {
        let input = WorkoutInput {
            kind: WorkoutKind::Cycling,
            distance: 10.0,
            duration: 20.0,
            variant: 150.0,
        };
        let w = Workout::new(Coords::new(0.0, 0.0), &input, march_fifth());
        assert_eq!(w.kind(), WorkoutKind::Cycling);
        assert_eq!(w.elevation_gain(), Some(150.0));
        assert!((w.metric() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in WorkoutKind::ALL {
            assert_eq!(kind.to_string().parse::<WorkoutKind>().unwrap(), kind);
        }
        assert!("swimming".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn test_serializes_flat_record() {
        let w = Workout::running(Coords::new(51.5, -0.12), 5.0, 25.0, 180.0, march_fifth());
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["type"], "running");
        assert_eq!(json["coords"][0], 51.5);
        assert_eq!(json["coords"][1], -0.12);
        assert_eq!(json["cadence"], 180.0);
        assert_eq!(json["pace"], 5.0);
        assert_eq!(json["description"], "Running on March at 5");
    }

    #[test]
    fn test_cycling_serializes_elev_gain() {
        let w = Workout::cycling(Coords::new(0.0, 0.0), 10.0, 20.0, 300.0, march_fifth());
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["type"], "cycling");
        assert_eq!(json["elevGain"], 300.0);
        assert!(json.get("cadence").is_none());
    }

    #[test]
    fn test_restore_rederives_metric() {
        let date = march_fifth().with_timezone(&Utc);
        let w = Workout::restore(
            "1234567890".to_string(),
            date,
            Coords::new(1.0, 2.0),
            4.0,
            20.0,
            Some("Running on March at 5".to_string()),
            WorkoutKind::Running,
            170.0,
        );
        assert_eq!(w.metric(), 5.0);
        assert_eq!(w.description(), "Running on March at 5");
    }
}
