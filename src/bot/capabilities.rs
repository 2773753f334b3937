//! The game-client surface the bot drives.
//!
//! Everything behind this trait (protocol, world tracking, path search,
//! block interaction) belongs to the game gateway. Handlers only ever talk to
//! the game through it, which keeps them testable against [`crate::sim::SimWorld`].

use async_trait::async_trait;

use crate::bot::goals::Goal;
use crate::bot::movement::{Control, Movements};
use crate::codec::{BlockPos, Vec3};
use crate::error::Result;
use crate::state::{BlockQuery, BlockType, Entity, EntityFilter, EntityId, Hand, ItemStack};

#[async_trait]
pub trait Capabilities: Send + Sync {
    /// Username of the bot's own session
    fn username(&self) -> &str;

    /// Resolve once the chunks around the bot have arrived
    async fn wait_for_chunks_to_load(&self) -> Result<()>;

    async fn position(&self) -> Result<Vec3>;

    /// Look up a block type in the game data registry
    async fn block_by_name(&self, name: &str) -> Result<Option<BlockType>>;

    /// Block positions matching the query, nearest first
    async fn find_blocks(&self, query: BlockQuery) -> Result<Vec<BlockPos>>;

    /// Entity of a visible player, `None` when out of sight
    async fn player_entity(&self, username: &str) -> Result<Option<Entity>>;

    async fn nearest_entity(&self, filter: EntityFilter) -> Result<Option<Entity>>;

    async fn attack(&self, entity: EntityId) -> Result<()>;

    async fn set_control_state(&self, control: Control, on: bool) -> Result<()>;

    async fn clear_control_states(&self) -> Result<()>;

    /// Replace the pathfinder goal
    async fn set_goal(&self, goal: Goal, movements: &Movements) -> Result<()>;

    async fn inventory_items(&self) -> Result<Vec<ItemStack>>;

    async fn equip(&self, item: &str, hand: Hand) -> Result<()>;

    /// Cast and wait until something is reeled in
    async fn fish(&self) -> Result<()>;

    async fn dig(&self, pos: BlockPos) -> Result<()>;

    /// Place the held block against `face` of `reference`
    async fn place_block(&self, reference: BlockPos, face: Vec3) -> Result<()>;

    async fn chat(&self, message: &str) -> Result<()>;

    /// Start the gateway's read-only world viewer
    async fn start_viewer(&self, port: u16, first_person: bool) -> Result<()>;
}
