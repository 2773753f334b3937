use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bot::capabilities::Capabilities;
use crate::bot::fishing::{self, FishingHandle};
use crate::bot::farming;
use crate::bot::goals::Goal;
use crate::bot::movement::{Control, Movements};
use crate::commands::parser::{Command, MoveDirection};
use crate::error::{Error, Result};
use crate::state::{BlockMatcher, BlockQuery, EntityFilter};

/// Search radius for `find`
pub const FIND_RADIUS: f64 = 90.0;
/// Most positions `find` asks for
pub const FIND_COUNT: usize = 10;

/// Everything handlers share for the lifetime of a session
pub struct BotContext<C: ?Sized> {
    pub caps: Arc<C>,
    pub movements: Movements,
    pub fishing: Option<FishingHandle>,
}

impl<C: Capabilities + ?Sized + 'static> BotContext<C> {
    pub fn new(caps: Arc<C>) -> Self {
        Self {
            caps,
            movements: Movements::default(),
            fishing: None,
        }
    }

    pub fn is_fishing(&self) -> bool {
        self.fishing.as_ref().is_some_and(FishingHandle::is_running)
    }
}

/// Log a reply and send it to chat
pub async fn reply<C>(caps: &C, message: &str) -> Result<()>
where
    C: Capabilities + ?Sized,
{
    info!(%message, "replying");
    caps.chat(message).await
}

/// Run one command on behalf of `speaker`
pub async fn handle<C>(ctx: &mut BotContext<C>, speaker: &str, command: Command) -> Result<()>
where
    C: Capabilities + ?Sized + 'static,
{
    match command {
        Command::Loaded => loaded(&*ctx.caps).await,
        Command::Find { block } => find(&*ctx.caps, &block).await,
        Command::Come => come(ctx, speaker).await,
        Command::GoTo { x, y, z } => {
            ctx.caps.set_goal(Goal::near_coordinate(x, y, z), &ctx.movements).await
        }
        Command::Move(direction) => move_bot(&*ctx.caps, direction).await,
        Command::Jump => {
            ctx.caps.set_control_state(Control::Jump, true).await?;
            ctx.caps.set_control_state(Control::Jump, false).await
        }
        Command::ListItems => list_items(&*ctx.caps).await,
        Command::Dig { args } => {
            debug!(?args, "dig is not implemented");
            Ok(())
        }
        Command::Attack => attack(&*ctx.caps).await,
        Command::Fish => fish(ctx).await,
        Command::StopFish => {
            match ctx.fishing.take() {
                Some(handle) => {
                    handle.stop();
                    info!("stopped fishing");
                }
                None => debug!("stop-fish while not fishing"),
            }
            Ok(())
        }
        Command::Farm => farm(&*ctx.caps).await,
    }
}

async fn loaded<C: Capabilities + ?Sized>(caps: &C) -> Result<()> {
    let position = caps.position().await?;
    info!(%position, "waiting for chunks");
    caps.wait_for_chunks_to_load().await?;
    reply(caps, "Ready!").await
}

async fn find<C: Capabilities + ?Sized>(caps: &C, block: &str) -> Result<()> {
    let Some(kind) = caps.block_by_name(block).await? else {
        return reply(caps, &format!("{} is not a block name", block)).await;
    };

    let query = BlockQuery::new(BlockMatcher::Ids { ids: vec![kind.id] }, FIND_RADIUS)
        .count(FIND_COUNT);
    let found = caps.find_blocks(query).await?;

    match found.first() {
        None => {
            reply(caps, &format!("I couldn't find any {}. Expand your search", block)).await
        }
        Some(first) => {
            reply(caps, &format!("I found {}. Search here: {}", found.len(), first)).await
        }
    }
}

async fn come<C>(ctx: &BotContext<C>, speaker: &str) -> Result<()>
where
    C: Capabilities + ?Sized + 'static,
{
    let Some(target) = ctx.caps.player_entity(speaker).await? else {
        return reply(&*ctx.caps, "I don't see you").await;
    };
    debug!(speaker, position = %target.position, "coming");
    ctx.caps.set_goal(Goal::near_player(target.position), &ctx.movements).await
}

async fn move_bot<C: Capabilities + ?Sized>(caps: &C, direction: MoveDirection) -> Result<()> {
    match direction.control() {
        Some(control) => caps.set_control_state(control, true).await,
        None => caps.clear_control_states().await,
    }
}

async fn list_items<C: Capabilities + ?Sized>(caps: &C) -> Result<()> {
    let items = caps.inventory_items().await?;
    let line = if items.is_empty() {
        "empty".to_string()
    } else {
        items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    };
    reply(caps, &line).await
}

async fn attack<C: Capabilities + ?Sized>(caps: &C) -> Result<()> {
    let Some(target) = caps.nearest_entity(EntityFilter::attackable()).await? else {
        return reply(caps, "No nearby entity to attack").await;
    };
    info!(target = %target.name, id = target.id, "attacking");
    caps.attack(target.id).await
}

async fn fish<C>(ctx: &mut BotContext<C>) -> Result<()>
where
    C: Capabilities + ?Sized + 'static,
{
    // Restarting would leave the old loop's cast in flight next to the new one.
    if ctx.is_fishing() {
        debug!("already fishing");
        return Ok(());
    }
    if let Some(finished) = ctx.fishing.take() {
        finished.stop();
    }

    match fishing::start(ctx.caps.clone()).await {
        Ok(handle) => {
            info!("started fishing");
            ctx.fishing = Some(handle);
            Ok(())
        }
        Err(e @ (Error::ActionFailed { .. } | Error::Rejected { .. })) => {
            warn!(error = %e, "could not equip fishing rod");
            reply(&*ctx.caps, "No fishing rod").await
        }
        Err(e) => Err(e),
    }
}

async fn farm<C: Capabilities + ?Sized>(caps: &C) -> Result<()> {
    match farming::farm(caps).await {
        Ok(report) if report.is_empty() => {
            debug!("nothing to farm");
            Ok(())
        }
        Ok(report) => {
            info!(harvested = report.harvested, sown = report.sown, "farming done");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "farming aborted");
            reply(caps, "Farming failed").await
        }
    }
}
