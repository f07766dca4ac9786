//! Entity filter/projection (C8): narrows a `FilterEntities` result set by
//! lifecycle and produces the `{id, kind, minorKind, name, created,
//! terminated}` projection shape callers receive.

use chrono::{DateTime, Utc};
use entity_types::{temporal::covers, EntityProjection};

/// Keeps only projections whose lifecycle (`created`..`terminated`) covers
/// `at`. `None` passes every projection through unfiltered.
pub fn filter_active_at(projections: Vec<EntityProjection>, at: Option<DateTime<Utc>>) -> Vec<EntityProjection> {
    match at {
        None => projections,
        Some(at) => projections
            .into_iter()
            .filter(|p| covers(p.created, p.terminated, at))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn projection(created: DateTime<Utc>, terminated: Option<DateTime<Utc>>) -> EntityProjection {
        EntityProjection {
            id: "e1".into(),
            kind: "Person".into(),
            minor_kind: "Employee".into(),
            name: None,
            created: Some(created),
            terminated,
        }
    }

    #[test]
    fn active_at_excludes_terminated_entities() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let terminated = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let projections = vec![projection(created, Some(terminated))];
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        assert!(filter_active_at(projections, Some(at)).is_empty());
    }

    #[test]
    fn no_active_at_passes_everything_through() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let projections = vec![projection(created, None)];
        assert_eq!(filter_active_at(projections, None).len(), 1);
    }
}
