//! Request shapes for the entity orchestration service (C7).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity_types::Payload;
use entity_runtime::{AttributeWrite, ReadOptions};

/// `request.output` tag per §4.7: selects which parts of a `ReadEntity`
/// response get populated beyond the always-present base fields (`Kind`,
/// `Name`, `Created`, `Terminated`, which need no tag and are never gated).
/// Because this is a closed Rust enum rather than a wire-format string set,
/// there is no "unknown tag" case to warn and skip — a tag an RPC-layer
/// deserializer can't map to a variant never reaches this type in the
/// first place; that mapping is the (out-of-scope) transport's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    Metadata,
    Relationships,
    Attributes,
}

/// Scopes a `ReadEntity` call to a subset of output tags, attribute names,
/// and/or an as-of instant. An empty `output` set returns only the base
/// fields, matching `ReadEntity(id, output={})` in §8's testable
/// properties. `None` for `attribute_names` means "every attribute the
/// catalog has for this entity"; `attribute_options` carries the optional
/// per-attribute filter/projection from §4.7, keyed by attribute name.
#[derive(Debug, Clone, Default)]
pub struct ReadEntityRequest {
    pub output: std::collections::HashSet<OutputField>,
    pub attribute_names: Option<Vec<String>>,
    pub attribute_options: HashMap<String, ReadOptions>,
    pub active_at: Option<DateTime<Utc>>,
}

impl ReadEntityRequest {
    /// All output tags populated with no attribute/relationship narrowing —
    /// the "enriched echo" `CreateEntity`/`UpdateEntity` return (§4.7 step 5
    /// and step 4 respectively).
    pub fn all() -> Self {
        Self {
            output: [OutputField::Metadata, OutputField::Relationships, OutputField::Attributes]
                .into_iter()
                .collect(),
            attribute_names: None,
            attribute_options: HashMap::new(),
            active_at: None,
        }
    }
}

/// Patch accepted by `UpdateEntity`. Only `Name` and `Terminated` may
/// change on the node itself (Invariant 1 — `Kind`/`Created`/`Id` are
/// immutable); a non-empty `metadata_patch` replaces the entire metadata
/// mapping wholesale — individual keys cannot be partially deleted via
/// this path (§4.3); attribute writes and deletes are dispatched
/// independently and never rolled back against each other (§9 Open
/// Question decision).
#[derive(Debug, Clone, Default)]
pub struct UpdateEntityRequest {
    pub name: Option<entity_types::TemporalValue>,
    pub terminated: Option<Option<DateTime<Utc>>>,
    pub metadata_patch: HashMap<String, Payload>,
    pub attribute_writes: Vec<AttributeWrite>,
    pub attribute_deletes: Vec<String>,
}

/// Filter accepted by `ReadEntities` / `FilterEntities` (C8): `Major` is
/// required, `Minor`/`Id` narrow further.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    pub major: String,
    pub minor: Option<String>,
    pub id: Option<String>,
}
