//! Value Objects - Immutable, identity-less domain primitives

mod account_tier;
mod coordinate;
mod travel_mode;
mod unit_system;

pub use account_tier::AccountTier;
pub use coordinate::{Coordinate, join_coordinates};
pub use travel_mode::TravelMode;
pub use unit_system::UnitSystem;
