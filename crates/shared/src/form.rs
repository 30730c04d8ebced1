use crate::error::{Error, Result};
use crate::models::{WorkoutInput, WorkoutKind};

/// Raw text of the entry form, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl WorkoutForm {
    /// Parse and check every field the selected kind needs. Fields belonging
    /// to the other kind are ignored.
    pub fn validate(&self) -> Result<WorkoutInput> {
        let distance = positive_number("distance", &self.distance)?;
        let duration = positive_number("duration", &self.duration)?;
        let variant = match self.kind {
            WorkoutKind::Running => positive_number("cadence", &self.cadence)?,
            WorkoutKind::Cycling => positive_number("elevation", &self.elevation)?,
        };
        Ok(WorkoutInput {
            kind: self.kind,
            distance,
            duration,
            variant,
        })
    }

    /// Empty every numeric field, keeping the selected kind.
    pub fn clear(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
    }

    /// Whether the cadence row is shown (elevation is shown otherwise).
    pub fn shows_cadence(&self) -> bool {
        self.kind == WorkoutKind::Running
    }
}

/// Finite and strictly greater than zero. Empty text is rejected.
fn positive_number(field: &'static str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(field, raw))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_input(field, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(distance: &str, duration: &str, cadence: &str) -> WorkoutForm {
        WorkoutForm {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    #[test]
    fn test_valid_running_form() {
        let input = running("5", "25", "180").validate().unwrap();
        assert_eq!(input.kind, WorkoutKind::Running);
        assert_eq!(input.distance, 5.0);
        assert_eq!(input.duration, 25.0);
        assert_eq!(input.variant, 180.0);
    }

    #[test]
    fn test_valid_cycling_form_ignores_cadence() {
        let form = WorkoutForm {
            kind: WorkoutKind::Cycling,
            distance: "20.5".to_string(),
            duration: " 60 ".to_string(),
            cadence: "junk".to_string(),
            elevation: "350".to_string(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.variant, 350.0);
        assert_eq!(input.duration, 60.0);
    }

    #[test]
    fn test_zero_distance_rejected() {
        let err = running("0", "25", "180").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "distance", .. }));
    }

    #[test]
    fn test_negative_rejected() {
        let err = running("5", "-3", "180").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "duration", .. }));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = running("5", "25", "fast").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "cadence", .. }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(running("", "25", "180").validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(running("inf", "25", "180").validate().is_err());
        assert!(running("NaN", "25", "180").validate().is_err());
    }

    #[test]
    fn test_cycling_zero_elevation_rejected() {
        let form = WorkoutForm {
            kind: WorkoutKind::Cycling,
            distance: "10".to_string(),
            duration: "30".to_string(),
            cadence: String::new(),
            elevation: "0".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "elevation", .. }));
    }

    #[test]
    fn test_running_shows_cadence_row() {
        let mut form = running("", "", "");
        assert!(form.shows_cadence());
        form.kind = WorkoutKind::Cycling;
        assert!(!form.shows_cadence());
    }

    #[test]
    fn test_clear_keeps_kind() {
        let mut form = WorkoutForm {
            kind: WorkoutKind::Cycling,
            distance: "1".to_string(),
            duration: "2".to_string(),
            cadence: "3".to_string(),
            elevation: "4".to_string(),
        };
        form.clear();
        assert_eq!(form.kind, WorkoutKind::Cycling);
        assert!(form.distance.is_empty());
        assert!(form.elevation.is_empty());
        assert!(!form.shows_cadence());
    }
}
