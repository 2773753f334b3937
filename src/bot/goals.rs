use serde::{Deserialize, Serialize};

use crate::codec::Vec3;

/// Radius used when walking up to the player who called
pub const COME_RADIUS: f64 = 1.0;
/// Radius used when walking to explicit coordinates
pub const GOTO_RADIUS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    NearPlayer,
    NearCoordinate,
}

/// Region the pathfinder tries to reach. Setting a new goal replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub target: Vec3,
    pub radius: f64,
}

impl Goal {
    pub fn near_player(position: Vec3) -> Self {
        Self {
            kind: GoalKind::NearPlayer,
            target: position,
            radius: COME_RADIUS,
        }
    }

    pub fn near_coordinate(x: f64, y: f64, z: f64) -> Self {
        Self {
            kind: GoalKind::NearCoordinate,
            target: Vec3::new(x, y, z),
            radius: GOTO_RADIUS,
        }
    }
}
