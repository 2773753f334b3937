pub mod types;

pub use types::{BlockPos, Vec3};
