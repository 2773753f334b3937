pub mod capabilities;
pub mod farming;
pub mod fishing;
pub mod goals;
pub mod movement;

pub use capabilities::Capabilities;
pub use farming::FarmReport;
pub use fishing::FishingHandle;
pub use goals::{Goal, GoalKind};
pub use movement::{Control, ControlState, Movements};
