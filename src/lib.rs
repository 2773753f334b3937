//! Chat-controlled block game bot
//!
//! Players type `bt <command>` in game chat; the bot parses the line and
//! drives a game gateway (connection, world state, pathfinding, block
//! interaction) to carry it out.

pub mod codec;
pub mod error;
pub mod config;
pub mod state;
pub mod client;
pub mod bot;
pub mod commands;
pub mod sim;

pub use error::{Error, Result};
pub use codec::{BlockPos, Vec3};
pub use config::SessionConfig;
pub use state::{
    Block, BlockType, BlockMatcher, BlockQuery, BlockRegistry,
    Entity, EntityKind, EntityFilter, ItemStack, Inventory, Hand,
};
pub use client::{Session, ClientConfig, GameEvent};
pub use bot::{Capabilities, Control, ControlState, Goal, GoalKind, Movements};
pub use commands::{Command, Dispatcher, ViewerConfig};
pub use sim::SimWorld;
