//! `powermarket-core`: storefront foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no rendering).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod page;
pub mod validation;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CartId, OrderId, UserId};
pub use money::Money;
pub use page::{Page, PageRequest, paginate};
pub use validation::{FieldRules, Rule, ValidationReport, validate};
