use tracing::debug;

use crate::bot::capabilities::Capabilities;
use crate::codec::{BlockPos, Vec3};
use crate::error::Result;
use crate::state::{BlockMatcher, BlockQuery, Hand};

/// How far from the bot crops and farmland are searched for
pub const FARM_RADIUS: f64 = 16.0;
pub const SEED_ITEM: &str = "wheat_seeds";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarmReport {
    pub harvested: usize,
    pub sown: usize,
}

impl FarmReport {
    pub fn is_empty(&self) -> bool {
        self.harvested == 0 && self.sown == 0
    }
}

async fn find_one<C>(caps: &C, matching: BlockMatcher) -> Result<Option<BlockPos>>
where
    C: Capabilities + ?Sized,
{
    let found = caps.find_blocks(BlockQuery::new(matching, FARM_RADIUS)).await?;
    Ok(found.into_iter().next())
}

/// Harvest every mature crop in range, then sow every free farmland block.
///
/// The first failed action aborts both passes.
pub async fn farm<C>(caps: &C) -> Result<FarmReport>
where
    C: Capabilities + ?Sized,
{
    let mut report = FarmReport::default();

    while let Some(pos) = find_one(caps, BlockMatcher::mature_wheat()).await? {
        debug!(%pos, "harvesting");
        caps.dig(pos).await?;
        report.harvested += 1;
    }

    while let Some(pos) = find_one(caps, BlockMatcher::SowableFarmland).await? {
        debug!(%pos, "sowing");
        caps.equip(SEED_ITEM, Hand::Main).await?;
        caps.place_block(pos, Vec3::UP).await?;
        report.sown += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimAction, SimWorld};
    use crate::state::{ItemStack, MATURE_WHEAT_AGE};

    #[tokio::test]
    async fn test_nothing_to_do() {
        let world = SimWorld::new("bot");
        world.set_block(BlockPos::new(1, 63, 1), "dirt", 0);

        let report = farm(&world).await.unwrap();
        assert!(report.is_empty());
        assert!(world.actions().is_empty());
        assert!(world.chat_log().is_empty());
    }

    #[tokio::test]
    async fn test_one_harvest_then_one_sow() {
        let world = SimWorld::new("bot");
        world.give(ItemStack::new(SEED_ITEM, 8));
        world.set_block(BlockPos::new(2, 64, 0), "wheat", MATURE_WHEAT_AGE);
        world.set_block(BlockPos::new(-3, 63, 4), "farmland", 0);

        let report = farm(&world).await.unwrap();
        assert_eq!(report, FarmReport { harvested: 1, sown: 1 });
        assert_eq!(
            world.actions(),
            vec![
                SimAction::Dig(BlockPos::new(2, 64, 0)),
                SimAction::Equip(SEED_ITEM.into()),
                SimAction::Place(BlockPos::new(-3, 63, 4)),
            ]
        );
        assert_eq!(world.block_name(BlockPos::new(-3, 64, 4)).as_deref(), Some("wheat"));
    }

    #[tokio::test]
    async fn test_harvest_frees_farmland_below() {
        let world = SimWorld::new("bot");
        world.give(ItemStack::new(SEED_ITEM, 8));
        world.set_block(BlockPos::new(0, 63, 0), "farmland", 0);
        world.set_block(BlockPos::new(0, 64, 0), "wheat", MATURE_WHEAT_AGE);

        let report = farm(&world).await.unwrap();
        assert_eq!(report, FarmReport { harvested: 1, sown: 1 });
    }

    #[tokio::test]
    async fn test_unripe_and_distant_crops_are_left() {
        let world = SimWorld::new("bot");
        world.set_block(BlockPos::new(1, 64, 1), "wheat", 3);
        world.set_block(BlockPos::new(40, 64, 0), "wheat", MATURE_WHEAT_AGE);

        let report = farm(&world).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_missing_seeds_abort() {
        let world = SimWorld::new("bot");
        world.set_block(BlockPos::new(0, 63, 0), "farmland", 0);

        assert!(farm(&world).await.is_err());
        assert!(world.actions().is_empty());
    }
}
