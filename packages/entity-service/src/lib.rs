//! Entity orchestration service (C7) and the filter/projection layer
//! (C8) that sits on top of the attribute dispatch engine.

pub mod filter;
pub mod request;
pub mod service;

pub use filter::filter_active_at;
pub use request::{EntityFilter, OutputField, ReadEntityRequest, UpdateEntityRequest};
pub use service::EntityService;
