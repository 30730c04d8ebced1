//! Persistence of the workout list as one JSON blob under a single key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Coords, Workout, WorkoutKind};

pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// String key/value storage, e.g. the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store used in tests and when browser storage is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One persisted record as plain data. Pace and speed are not read back;
/// they are derived again from distance and duration.
#[derive(Debug, Deserialize)]
struct StoredWorkout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    cadence: Option<f64>,
    #[serde(default, rename = "elevGain")]
    elevation_gain: Option<f64>,
}

impl StoredWorkout {
    /// Re-tag the record into its variant by its `type` field.
    fn into_workout(self) -> std::result::Result<Workout, String> {
        let kind: WorkoutKind = self.kind.parse()?;
        let variant = match kind {
            WorkoutKind::Running => self.cadence,
            WorkoutKind::Cycling => self.elevation_gain,
        }
        .ok_or_else(|| format!("{kind} record without its variant field"))?;

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.distance) && positive(self.duration) && positive(variant)) {
            return Err("non-positive distance, duration or variant field".to_string());
        }

        Ok(Workout::restore(
            self.id,
            self.date,
            self.coords,
            self.distance,
            self.duration,
            self.description,
            kind,
            variant,
        ))
    }
}

/// Serialize the full list.
pub fn encode(workouts: &[Workout]) -> Result<String> {
    Ok(serde_json::to_string(workouts)?)
}

/// Parse a stored blob. `None` when the blob is not a JSON array; records
/// inside it that cannot be restored are skipped.
pub fn decode(blob: &str) -> Option<Vec<Workout>> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(blob) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed workout data");
            return None;
        }
    };

    let workouts = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let restored = serde_json::from_value::<StoredWorkout>(value)
                .map_err(|e| e.to_string())
                .and_then(StoredWorkout::into_workout);
            match restored {
                Ok(workout) => Some(workout),
                Err(reason) => {
                    tracing::warn!(index, %reason, "Skipping stored workout");
                    None
                }
            }
        })
        .collect();
    Some(workouts)
}

/// The workout list bound to one storage key.
#[derive(Debug)]
pub struct WorkoutStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Overwrite the stored list with `workouts`.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let blob = encode(workouts)?;
        self.backend.set(&self.key, &blob)?;
        tracing::debug!(count = workouts.len(), key = %self.key, "Saved workouts");
        Ok(())
    }

    /// Read the stored list back. Absent, unreadable or malformed data all
    /// mean "no prior data".
    pub fn load(&self) -> Option<Vec<Workout>> {
        let blob = match self.backend.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored workouts");
                return None;
            }
        };
        let workouts = decode(&blob)?;
        tracing::info!(count = workouts.len(), "Loaded stored workouts");
        Some(workouts)
    }

    /// Remove the key entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(&self.key)?;
        tracing::info!(key = %self.key, "Cleared stored workouts");
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn sample() -> Vec<Workout> {
        let created = Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        let later = Local.with_ymd_and_hms(2024, 3, 6, 18, 0, 0).unwrap();
        vec![
            Workout::running(Coords::new(51.5, -0.12), 5.0, 25.0, 180.0, created),
            Workout::cycling(Coords::new(48.85, 2.35), 27.0, 95.0, 523.0, later),
        ]
    }

    #[test]
    fn test_save_then_load_restores_variants() {
        let mut store = WorkoutStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        let original = sample();
        store.save(&original).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        for (a, b) in original.iter().zip(&loaded) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.distance(), b.distance());
            assert_eq!(a.duration(), b.duration());
            assert_eq!(a.coords(), b.coords());
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.metric(), b.metric());
            assert_eq!(a.description(), b.description());
        }
        assert_eq!(loaded[0].cadence(), Some(180.0));
        assert_eq!(loaded[1].elevation_gain(), Some(523.0));
    }

    #[test]
    fn test_save_overwrites_previous_list() {
        let mut store = WorkoutStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        let workouts = sample();
        store.save(&workouts).unwrap();
        store.save(&workouts[..1]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_absent_key_is_none() {
        let store = WorkoutStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_malformed_blob_is_none() {
        let mut backend = MemoryStore::new();
        backend.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let store = WorkoutStore::new(backend, DEFAULT_STORAGE_KEY);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_null_blob_is_none() {
        assert!(decode("null").is_none());
    }

    #[test]
    fn test_clear_removes_key() {
        let mut store = WorkoutStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.backend().contains(DEFAULT_STORAGE_KEY));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_decode_browser_written_blob() {
        // Shape written by the JavaScript version of the app.
        let blob = r#"[{"date":"2024-03-05T09:30:00.000Z","id":"9630000000","coords":[51.5,-0.12],"distance":5,"duration":25,"type":"running","cadence":180,"pace":5,"description":"Running on March at 5"},
                       {"date":"2024-03-06T18:00:00.000Z","id":"9744000000","coords":[48.85,2.35],"distance":27,"duration":95,"type":"cycling","elevGain":523,"speed":0.28421052631578947,"description":"Cycling on March at 6"}]"#;
        let loaded = decode(blob).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].kind(), WorkoutKind::Running);
        assert_eq!(loaded[0].metric(), 5.0);
        assert_eq!(loaded[1].kind(), WorkoutKind::Cycling);
        assert_eq!(loaded[1].elevation_gain(), Some(523.0));
        assert_eq!(loaded[1].description(), "Cycling on March at 6");
    }

    #[test]
    fn test_decode_skips_unknown_type_and_bad_records() {
        let blob = r#"[{"date":"2024-03-05T09:30:00Z","id":"1","coords":[1,2],"distance":5,"duration":25,"type":"swimming","cadence":1},
                       {"date":"2024-03-05T09:30:00Z","id":"2","coords":[1,2],"distance":0,"duration":25,"type":"running","cadence":170},
                       {"date":"2024-03-05T09:30:00Z","id":"3","coords":[1,2],"distance":5,"duration":25,"type":"running"},
                       {"date":"2024-03-05T09:30:00Z","id":"4","coords":[1,2],"distance":5,"duration":25,"type":"running","cadence":170}]"#;
        let loaded = decode(blob).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "4");
    }

    #[test]
    fn test_decode_regenerates_missing_description() {
        let blob = r#"[{"date":"2024-07-15T12:00:00Z","id":"5","coords":[1,2],"distance":5,"duration":25,"type":"cycling","elevGain":40}]"#;
        let loaded = decode(blob).unwrap();
        assert!(loaded[0].description().starts_with("Cycling on July at "));
    }

    #[test]
    fn test_encode_empty_list() {
        assert_eq!(encode(&[]).unwrap(), "[]");
    }
}
