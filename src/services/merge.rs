//! Sparse-patch merge discipline shared by every update endpoint.
//!
//! An update request carries `Option` fields; absent fields leave the entity
//! untouched. Callers fetch the current row, clone it, apply the supplied
//! fields through a `Merge`, resolve any changed foreign keys, and persist
//! exactly once — and only when something actually changed.

#[derive(Debug, Default)]
pub(crate) struct Merge {
    changed: bool,
}

impl Merge {
    /// Overwrites `current` when the patch supplies a different value.
    pub(crate) fn field<T: PartialEq>(&mut self, current: &mut T, candidate: Option<T>) {
        if let Some(value) = candidate {
            if *current != value {
                *current = value;
                self.changed = true;
            }
        }
    }

    /// Same as [`Merge::field`] for nullable columns: a supplied value
    /// replaces the stored one, an absent value leaves it alone. There is no
    /// way to null a column through a sparse patch.
    pub(crate) fn nullable<T: PartialEq>(&mut self, current: &mut Option<T>, candidate: Option<T>) {
        if let Some(value) = candidate {
            if current.as_ref() != Some(&value) {
                *current = Some(value);
                self.changed = true;
            }
        }
    }

    /// Records an out-of-band change, e.g. a re-resolved foreign key.
    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub(crate) fn changed(&self) -> bool {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_leave_value_untouched() {
        let mut title = "Intro".to_string();
        let mut merge = Merge::default();
        merge.field(&mut title, None);
        assert_eq!(title, "Intro");
        assert!(!merge.changed());
    }

    #[test]
    fn equal_value_does_not_count_as_change() {
        let mut title = "Intro".to_string();
        let mut merge = Merge::default();
        merge.field(&mut title, Some("Intro".to_string()));
        assert!(!merge.changed());
    }

    #[test]
    fn differing_value_overwrites_and_marks_changed() {
        let mut title = "Intro".to_string();
        let mut merge = Merge::default();
        merge.field(&mut title, Some("Advanced".to_string()));
        assert_eq!(title, "Advanced");
        assert!(merge.changed());
    }

    #[test]
    fn nullable_fills_empty_column() {
        let mut description: Option<String> = None;
        let mut merge = Merge::default();
        merge.nullable(&mut description, Some("A course".to_string()));
        assert_eq!(description.as_deref(), Some("A course"));
        assert!(merge.changed());
    }

    #[test]
    fn nullable_ignores_equal_value() {
        let mut duration = Some(30);
        let mut merge = Merge::default();
        merge.nullable(&mut duration, Some(30));
        assert_eq!(duration, Some(30));
        assert!(!merge.changed());
    }
}
