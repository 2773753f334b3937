use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Continuous movement controls currently held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlState: u8 {
        const FORWARD = 0x01;
        const BACK = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
        const JUMP = 0x10;
        const SPRINT = 0x20;
    }
}

/// A single movement control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Sprint,
}

impl Control {
    pub fn flag(self) -> ControlState {
        match self {
            Control::Forward => ControlState::FORWARD,
            Control::Back => ControlState::BACK,
            Control::Left => ControlState::LEFT,
            Control::Right => ControlState::RIGHT,
            Control::Jump => ControlState::JUMP,
            Control::Sprint => ControlState::SPRINT,
        }
    }
}

impl ControlState {
    pub fn set_control(&mut self, control: Control, on: bool) {
        self.set(control.flag(), on);
    }
}

/// Movement profile handed to the pathfinder along with each goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movements {
    pub can_dig: bool,
    pub allow_sprinting: bool,
    pub allow_parkour: bool,
    pub max_drop_down: u8,
}

impl Default for Movements {
    fn default() -> Self {
        Self {
            can_dig: true,
            allow_sprinting: true,
            allow_parkour: true,
            max_drop_down: 4,
        }
    }
}
