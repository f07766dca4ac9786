//! Directed, typed, temporally-bounded edges between entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::temporal::valid_range;
use crate::EntityError;

/// A relationship record. `Id` is globally unique across the system;
/// `Name` and `RelatedEntityId` are immutable after creation — only
/// `StartTime`/`EndTime` may change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub name: String,
    pub related_entity_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        related_entity_id: impl Into<String>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Self, EntityError> {
        let id = id.into();
        let name = name.into();
        let related_entity_id = related_entity_id.into();
        if id.is_empty() {
            return Err(EntityError::invalid("Relationship.Id", "must not be empty"));
        }
        if name.is_empty() {
            return Err(EntityError::invalid(
                "Relationship.Name",
                "must not be empty",
            ));
        }
        if related_entity_id.is_empty() {
            return Err(EntityError::invalid(
                "Relationship.RelatedEntityId",
                "must not be empty",
            ));
        }
        if start_time.is_none() {
            return Err(EntityError::invalid(
                "Relationship.StartTime",
                "must not be empty",
            ));
        }
        if !valid_range(start_time, end_time) {
            return Err(EntityError::invalid(
                "Relationship.EndTime",
                "must not precede StartTime",
            ));
        }
        Ok(Self {
            id,
            name,
            related_entity_id,
            start_time,
            end_time,
        })
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        crate::temporal::covers(self.start_time, self.end_time, at)
    }
}

/// Direction of a relationship relative to the entity a read was scoped to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A relationship annotated with its direction relative to the queried node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipView {
    pub relationship: Relationship,
    pub direction: Direction,
}

/// AND-combined filter set for `ReadFilteredRelationships`.
#[derive(Debug, Clone, Default)]
pub struct RelationshipFilter {
    pub name: Option<String>,
    pub related_entity_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub direction: Option<Direction>,
}

impl RelationshipFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.related_entity_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.direction.is_none()
    }

    pub fn matches(&self, view: &RelationshipView) -> bool {
        if let Some(name) = &self.name {
            if &view.relationship.name != name {
                return false;
            }
        }
        if let Some(related) = &self.related_entity_id {
            if &view.relationship.related_entity_id != related {
                return false;
            }
        }
        if let Some(start) = self.start_time {
            if view.relationship.start_time != Some(start) {
                return false;
            }
        }
        if let Some(end) = self.end_time {
            if view.relationship.end_time != Some(end) {
                return false;
            }
        }
        if let Some(direction) = self.direction {
            if view.direction != direction {
                return false;
            }
        }
        true
    }
}
