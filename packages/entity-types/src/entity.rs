//! The primary modelled object: identity, kind, lifecycle, metadata,
//! attributes, and relationships.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::Kind;
use crate::payload::Payload;
use crate::relationship::Relationship;
use crate::temporal::TemporalValue;
use crate::EntityError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Entity {
    pub id: String,
    pub kind: Kind,
    pub name: Option<TemporalValue>,
    pub created: Option<DateTime<Utc>>,
    pub terminated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: HashMap<String, Payload>,
    #[serde(default)]
    pub attributes: HashMap<String, Vec<TemporalValue>>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

impl Entity {
    /// Validates the fields required by `CreateEntity` (§4.2): `Id`,
    /// `Major`, and `Created` must all be present.
    pub fn validate_for_create(&self) -> Result<(), EntityError> {
        if self.id.is_empty() {
            return Err(EntityError::invalid("Id", "must not be empty"));
        }
        self.kind.validate_major()?;
        if self.created.is_none() {
            return Err(EntityError::invalid("Created", "must not be empty"));
        }
        Ok(())
    }

    pub fn is_live(&self) -> bool {
        self.terminated.is_none()
    }
}

/// Projection returned by the filter/projection path (C8) and by
/// `FilterEntities` (C2): `{id, kind, minorKind, name, created, terminated}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityProjection {
    pub id: String,
    pub kind: String,
    pub minor_kind: String,
    pub name: Option<TemporalValue>,
    pub created: Option<DateTime<Utc>>,
    pub terminated: Option<DateTime<Utc>>,
}

impl From<&Entity> for EntityProjection {
    fn from(entity: &Entity) -> Self {
        EntityProjection {
            id: entity.id.clone(),
            kind: entity.kind.major.clone(),
            minor_kind: entity.kind.minor.clone(),
            name: entity.name.clone(),
            created: entity.created,
            terminated: entity.terminated,
        }
    }
}
