//! Entity to model mappers
//!
//! This module provides conversions between domain entities (reactor-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod outcome;
mod policy;

pub use outcome::OutcomeInsert;
