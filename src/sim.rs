//! In-memory game world.
//!
//! `SimWorld` answers every capability call from plain data and records what
//! the bot did, so command handling can be driven without a gateway.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use async_trait::async_trait;

use crate::bot::capabilities::Capabilities;
use crate::bot::goals::Goal;
use crate::bot::movement::{Control, ControlState, Movements};
use crate::codec::{BlockPos, Vec3};
use crate::error::{Error, Result};
use crate::state::{
    Block, BlockQuery, BlockRegistry, BlockType, Entity, EntityFilter, EntityId, Hand,
    Inventory, ItemStack,
};

/// World-changing action performed through the capability surface
#[derive(Debug, Clone, PartialEq)]
pub enum SimAction {
    Attack(EntityId),
    Equip(String),
    Dig(BlockPos),
    Place(BlockPos),
}

#[derive(Debug, Default)]
struct SimState {
    registry: BlockRegistry,
    position: Vec3,
    blocks: AHashMap<BlockPos, Block>,
    entities: Vec<Entity>,
    inventory: Inventory,
    controls: ControlState,
    control_log: Vec<(Control, bool)>,
    goal: Option<Goal>,
    goals_set: usize,
    chat: Vec<String>,
    actions: Vec<SimAction>,
    searches: usize,
    fish_casts: usize,
    failing: Vec<String>,
    offline: bool,
    viewer: Option<(u16, bool)>,
}

impl SimState {
    fn check(&self, action: &'static str) -> Result<()> {
        if self.offline {
            return Err(Error::NotConnected);
        }
        if self.failing.iter().any(|a| a == action) {
            return Err(Error::action(action, "rejected by server"));
        }
        Ok(())
    }
}

pub struct SimWorld {
    username: String,
    state: Mutex<SimState>,
}

impl SimWorld {
    pub fn new(username: impl Into<String>) -> Self {
        let state = SimState {
            registry: BlockRegistry::overworld(),
            position: Vec3::new(0.5, 64.0, 0.5),
            ..SimState::default()
        };
        Self {
            username: username.into(),
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_block(&self, pos: BlockPos, name: &str, age: u8) {
        let mut state = self.state();
        let kind = state.registry.register(name);
        state.blocks.insert(pos, Block::new(kind).with_age(age));
    }

    pub fn block_name(&self, pos: BlockPos) -> Option<String> {
        self.state().blocks.get(&pos).map(|b| b.kind.name.clone())
    }

    pub fn add_entity(&self, entity: Entity) {
        self.state().entities.push(entity);
    }

    pub fn give(&self, stack: ItemStack) {
        self.state().inventory.insert(stack);
    }

    /// Make every later `action` call fail ("equip", "fish", "dig", "place", "attack")
    pub fn fail_action(&self, action: &str) {
        self.state().failing.push(action.to_string());
    }

    /// Fail every later action as if the gateway connection had dropped
    pub fn go_offline(&self) {
        self.state().offline = true;
    }

    pub fn goal(&self) -> Option<Goal> {
        self.state().goal.clone()
    }

    pub fn goals_set(&self) -> usize {
        self.state().goals_set
    }

    pub fn controls(&self) -> ControlState {
        self.state().controls
    }

    pub fn control_log(&self) -> Vec<(Control, bool)> {
        self.state().control_log.clone()
    }

    pub fn chat_log(&self) -> Vec<String> {
        self.state().chat.clone()
    }

    pub fn actions(&self) -> Vec<SimAction> {
        self.state().actions.clone()
    }

    pub fn searches(&self) -> usize {
        self.state().searches
    }

    pub fn fish_casts(&self) -> usize {
        self.state().fish_casts
    }

    pub fn viewer(&self) -> Option<(u16, bool)> {
        self.state().viewer
    }
}

#[async_trait]
impl Capabilities for SimWorld {
    fn username(&self) -> &str {
        &self.username
    }

    async fn wait_for_chunks_to_load(&self) -> Result<()> {
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn position(&self) -> Result<Vec3> {
        Ok(self.state().position)
    }

    async fn block_by_name(&self, name: &str) -> Result<Option<BlockType>> {
        Ok(self.state().registry.by_name(name).cloned())
    }

    async fn find_blocks(&self, query: BlockQuery) -> Result<Vec<BlockPos>> {
        let mut state = self.state();
        state.searches += 1;

        let origin = state.position;
        let mut found: Vec<(f64, BlockPos)> = state.blocks.iter()
            .filter(|(pos, _)| pos.distance_to(origin) <= query.max_distance)
            .filter(|(pos, block)| {
                query.matching.matches(block, state.blocks.get(&pos.above()))
            })
            .map(|(pos, _)| (pos.distance_to(origin), *pos))
            .collect();

        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(found.into_iter().take(query.count).map(|(_, pos)| pos).collect())
    }

    async fn player_entity(&self, username: &str) -> Result<Option<Entity>> {
        Ok(self.state().entities.iter()
            .find(|e| e.username.as_deref() == Some(username))
            .cloned())
    }

    async fn nearest_entity(&self, filter: EntityFilter) -> Result<Option<Entity>> {
        let state = self.state();
        let origin = state.position;
        Ok(state.entities.iter()
            .filter(|e| filter.matches(e))
            .min_by(|a, b| {
                a.position.distance_to(origin).total_cmp(&b.position.distance_to(origin))
            })
            .cloned())
    }

    async fn attack(&self, entity: EntityId) -> Result<()> {
        let mut state = self.state();
        state.check("attack")?;
        if !state.entities.iter().any(|e| e.id == entity) {
            return Err(Error::action("attack", format!("no entity {}", entity)));
        }
        state.actions.push(SimAction::Attack(entity));
        Ok(())
    }

    async fn set_control_state(&self, control: Control, on: bool) -> Result<()> {
        let mut state = self.state();
        state.controls.set_control(control, on);
        state.control_log.push((control, on));
        Ok(())
    }

    async fn clear_control_states(&self) -> Result<()> {
        self.state().controls = ControlState::empty();
        Ok(())
    }

    async fn set_goal(&self, goal: Goal, _movements: &Movements) -> Result<()> {
        let mut state = self.state();
        state.goal = Some(goal);
        state.goals_set += 1;
        Ok(())
    }

    async fn inventory_items(&self) -> Result<Vec<ItemStack>> {
        Ok(self.state().inventory.items())
    }

    async fn equip(&self, item: &str, _hand: Hand) -> Result<()> {
        let mut state = self.state();
        state.check("equip")?;
        if !state.inventory.hold(item) {
            return Err(Error::action("equip", format!("no {} in inventory", item)));
        }
        state.actions.push(SimAction::Equip(item.to_string()));
        Ok(())
    }

    async fn fish(&self) -> Result<()> {
        // A cast takes time; let other tasks run before it lands.
        tokio::task::yield_now().await;

        let mut state = self.state();
        state.check("fish")?;
        state.fish_casts += 1;
        state.inventory.insert(ItemStack::new("cod", 1));
        Ok(())
    }

    async fn dig(&self, pos: BlockPos) -> Result<()> {
        let mut state = self.state();
        state.check("dig")?;
        let block = match state.blocks.remove(&pos) {
            Some(block) if !block.is_air() => block,
            _ => return Err(Error::action("dig", format!("nothing to dig at {}", pos))),
        };
        state.inventory.insert(ItemStack::new(block.kind.name, 1));
        state.actions.push(SimAction::Dig(pos));
        Ok(())
    }

    async fn place_block(&self, reference: BlockPos, face: Vec3) -> Result<()> {
        let mut state = self.state();
        state.check("place")?;

        let held = match state.inventory.held_item() {
            Some(stack) => stack.name.clone(),
            None => return Err(Error::action("place", "nothing held")),
        };
        let target = reference.offset_by(face);
        if state.blocks.get(&target).is_some_and(|b| !b.is_air()) {
            return Err(Error::action("place", format!("{} is occupied", target)));
        }

        let placed = match held.as_str() {
            "wheat_seeds" => "wheat",
            other => other,
        };
        let kind = state.registry.register(placed);
        state.blocks.insert(target, Block::new(kind));
        state.inventory.remove(&held, 1);
        state.actions.push(SimAction::Place(reference));
        Ok(())
    }

    async fn chat(&self, message: &str) -> Result<()> {
        self.state().chat.push(message.to_string());
        Ok(())
    }

    async fn start_viewer(&self, port: u16, first_person: bool) -> Result<()> {
        self.state().viewer = Some((port, first_person));
        Ok(())
    }
}
