use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Block type id as reported by the game data registry
pub type BlockId = u32;

/// Crop growth stage at which wheat can be harvested
pub const MATURE_WHEAT_AGE: u8 = 7;

/// A named block type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
}

impl BlockType {
    pub fn new(id: BlockId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A placed block: its type plus growth stage for crops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockType,
    pub age: u8,
}

impl Block {
    pub fn new(kind: BlockType) -> Self {
        Self { kind, age: 0 }
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = age;
        self
    }

    pub fn is_air(&self) -> bool {
        self.kind.name == "air"
    }
}

/// What a block search is looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockMatcher {
    /// Any block whose type id is listed
    Ids { ids: Vec<BlockId> },
    /// A crop block at exactly the given growth stage
    MatureCrop { name: String, age: u8 },
    /// Farmland with nothing but air on top
    SowableFarmland,
}

impl BlockMatcher {
    pub fn mature_wheat() -> Self {
        BlockMatcher::MatureCrop {
            name: "wheat".into(),
            age: MATURE_WHEAT_AGE,
        }
    }

    /// `above` is the block directly on top, `None` when unloaded or empty
    pub fn matches(&self, block: &Block, above: Option<&Block>) -> bool {
        match self {
            BlockMatcher::Ids { ids } => ids.contains(&block.kind.id),
            BlockMatcher::MatureCrop { name, age } => {
                block.kind.name == *name && block.age == *age
            }
            BlockMatcher::SowableFarmland => {
                block.kind.name == "farmland" && above.map_or(true, Block::is_air)
            }
        }
    }
}

/// Bounded block search around the bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockQuery {
    pub matching: BlockMatcher,
    pub max_distance: f64,
    pub count: usize,
}

impl BlockQuery {
    pub fn new(matching: BlockMatcher, max_distance: f64) -> Self {
        Self {
            matching,
            max_distance,
            count: 1,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// Block name -> type lookup
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    by_name: IndexMap<String, BlockType>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small overworld palette, enough for searching and farming
    pub fn overworld() -> Self {
        let mut registry = Self::new();
        for name in [
            "air",
            "stone",
            "grass_block",
            "dirt",
            "cobblestone",
            "oak_log",
            "water",
            "sand",
            "gold_ore",
            "iron_ore",
            "coal_ore",
            "diamond_ore",
            "farmland",
            "wheat",
        ] {
            registry.register(name);
        }
        registry
    }

    /// Add a block type with the next free id
    pub fn register(&mut self, name: &str) -> BlockType {
        if let Some(existing) = self.by_name.get(name) {
            return existing.clone();
        }
        let kind = BlockType::new(self.by_name.len() as BlockId, name);
        self.by_name.insert(name.to_string(), kind.clone());
        kind
    }

    pub fn by_name(&self, name: &str) -> Option<&BlockType> {
        self.by_name.get(name)
    }
}
