//! Domain layer for the distance matrix client
//!
//! Value objects describing what is asked of the distance matrix service:
//! geographic points, travel mode, unit system and the account tier that
//! bounds how many elements a single call may carry.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
