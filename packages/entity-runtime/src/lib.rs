//! Attribute dispatch engine (C6): the classify → catalog → resolve →
//! report pipeline sitting between `entity-service` and the three
//! in-process backend repositories in `entity-core`.

pub mod dispatch;
pub mod request;
pub mod resolver;

pub use dispatch::{single_write, AttributeDispatchEngine};
pub use request::{is_hard_failure, AttributeWrite, DispatchOutcome, ReadOptions};
pub use resolver::{BlobResolver, DocumentResolver, GraphAttributeResolver, Resolver, TabularResolver};
