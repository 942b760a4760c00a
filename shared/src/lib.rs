//! Shared types and domain logic for the Store Back Office
//!
//! This crate contains the types and pure calculations shared between the
//! backend services and their tests: domain models, the IGV tax calculator,
//! document number formatting, and validation helpers.

pub mod models;
pub mod numbering;
pub mod tax;
pub mod types;
pub mod validation;

pub use models::*;
pub use numbering::*;
pub use tax::*;
pub use types::*;
pub use validation::*;
