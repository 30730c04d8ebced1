//! The session controller: owns the workout list, the pending map click and
//! the persistent store, and applies each user interaction to them.

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::form::WorkoutForm;
use crate::models::{Coords, Workout};
use crate::storage::{KeyValueStore, WorkoutStore};

#[derive(Debug)]
pub struct Session<S> {
    workouts: Vec<Workout>,
    pending: Option<Coords>,
    store: WorkoutStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session with whatever the store holds.
    pub fn open(store: WorkoutStore<S>) -> Self {
        let workouts = store.load().unwrap_or_default();
        Self {
            workouts,
            pending: None,
            store,
        }
    }

    /// Workouts in creation order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn pending(&self) -> Option<Coords> {
        self.pending
    }

    /// Remember where the user clicked on the map.
    pub fn select_location(&mut self, coords: Coords) {
        tracing::debug!(lat = coords.lat, lng = coords.lng, "Location selected");
        self.pending = Some(coords);
    }

    /// Validate the form and record a workout at the pending location.
    ///
    /// On error nothing changes, and the pending location is kept so the user
    /// can correct the form and submit again. A failed save is logged; the
    /// workout stays in the session list.
    pub fn submit(&mut self, form: &WorkoutForm, now: DateTime<Local>) -> Result<&Workout> {
        let coords = self.pending.ok_or(Error::NoLocationSelected)?;
        let input = form.validate()?;

        let workout = Workout::new(coords, &input, now);
        tracing::info!(
            id = workout.id(),
            kind = %workout.kind(),
            distance = workout.distance(),
            duration = workout.duration(),
            "Workout created"
        );
        self.workouts.push(workout);
        self.pending = None;

        if let Err(e) = self.store.save(&self.workouts) {
            tracing::warn!(error = %e, "Could not persist workouts");
        }

        Ok(&self.workouts[self.workouts.len() - 1])
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Coordinates to move the map to for a list entry.
    pub fn locate(&self, id: &str) -> Option<Coords> {
        self.find(id).map(Workout::coords)
    }

    /// Erase storage and start over with an empty list.
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        self.workouts.clear();
        self.pending = None;
        Ok(())
    }

    pub fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutKind;
    use crate::storage::{MemoryStore, DEFAULT_STORAGE_KEY};
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
    }

    fn session() -> Session<MemoryStore> {
        Session::open(WorkoutStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY))
    }

    fn running_form(distance: &str) -> WorkoutForm {
        WorkoutForm {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: "25".to_string(),
            cadence: "180".to_string(),
            elevation: String::new(),
        }
    }

    #[test]
    fn test_submit_creates_running_workout() {
        let mut s = session();
        s.select_location(Coords::new(51.5, -0.12));
        let w = s.submit(&running_form("5"), now()).unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.metric(), 5.0);
        assert_eq!(w.coords(), Coords::new(51.5, -0.12));
        assert_eq!(w.description(), "Running on March at 5");
        assert_eq!(s.workouts().len(), 1);
        assert!(s.pending().is_none());
        assert_eq!(s.store().load().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_submit_keeps_state_and_storage() {
        let mut s = session();
        s.select_location(Coords::new(1.0, 2.0));
        s.submit(&running_form("5"), now()).unwrap();
        let saved_before = s.store().backend().get(DEFAULT_STORAGE_KEY).unwrap();

        s.select_location(Coords::new(3.0, 4.0));
        let err = s.submit(&running_form("0"), now()).unwrap_err();
        assert!(err.is_user_input());
        let err = s.submit(&running_form("five"), now()).unwrap_err();
        assert!(err.is_user_input());

        assert_eq!(s.workouts().len(), 1);
        assert_eq!(s.pending(), Some(Coords::new(3.0, 4.0)));
        let saved_after = s.store().backend().get(DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(saved_before, saved_after);
    }

    #[test]
    fn test_submit_without_location_is_rejected() {
        let mut s = session();
        let err = s.submit(&running_form("5"), now()).unwrap_err();
        assert!(matches!(err, Error::NoLocationSelected));
        assert!(s.workouts().is_empty());
    }

    #[test]
    fn test_locate_known_and_unknown_id() {
        let mut s = session();
        s.select_location(Coords::new(51.5, -0.12));
        let id = s.submit(&running_form("5"), now()).unwrap().id().to_string();
        assert_eq!(s.locate(&id), Some(Coords::new(51.5, -0.12)));
        assert_eq!(s.locate("0000000000"), None);
    }

    #[test]
    fn test_open_restores_previous_session() {
        let mut s = session();
        s.select_location(Coords::new(10.0, 20.0));
        s.submit(&running_form("5"), now()).unwrap();
        let backend = s.store().backend().clone();

        let reopened = Session::open(WorkoutStore::new(backend, DEFAULT_STORAGE_KEY));
        assert_eq!(reopened.workouts().len(), 1);
        assert_eq!(reopened.workouts()[0].coords(), Coords::new(10.0, 20.0));
        assert!(reopened.pending().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut s = session();
        s.select_location(Coords::new(1.0, 2.0));
        s.submit(&running_form("5"), now()).unwrap();
        s.select_location(Coords::new(5.0, 6.0));
        s.clear().unwrap();

        assert!(s.workouts().is_empty());
        assert!(s.pending().is_none());
        assert!(s.store().load().is_none());
        assert!(!s.store().backend().contains(DEFAULT_STORAGE_KEY));
    }
}
