pub mod blocks;
pub mod entity;
pub mod inventory;

pub use blocks::{
    Block, BlockId, BlockType, BlockMatcher, BlockQuery, BlockRegistry,
    MATURE_WHEAT_AGE,
};
pub use entity::{Entity, EntityId, EntityKind, EntityFilter};
pub use inventory::{ItemStack, Inventory, InventorySlot, Hand};
