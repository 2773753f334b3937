use serde::{Deserialize, Serialize};

/// Largest stack most items allow
pub const MAX_STACK: u32 = 64;

/// An item stack (item name + count)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub slot: Option<u16>,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            slot: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl std::fmt::Display for ItemStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.name, self.count)
    }
}

/// Hand slot an item is equipped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    #[default]
    Main,
    Off,
}

/// Inventory slot (either empty or contains a stack)
pub type InventorySlot = Option<ItemStack>;

/// Player inventory with a held-item cursor
#[derive(Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<InventorySlot>,
    pub held: Option<usize>,
}

impl Inventory {
    /// Main inventory plus hotbar
    pub const PLAYER_SIZE: usize = 36;

    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            held: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Non-empty stacks in slot order, each tagged with its slot index
    pub fn items(&self) -> Vec<ItemStack> {
        self.slots.iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|stack| ItemStack {
                slot: Some(i as u16),
                ..stack.clone()
            }))
            .collect()
    }

    /// Find first slot containing specific item
    pub fn find_item(&self, item_name: &str) -> Option<usize> {
        self.slots.iter()
            .position(|s| s.as_ref().map(|s| s.name == item_name).unwrap_or(false))
    }

    pub fn held_item(&self) -> Option<&ItemStack> {
        self.held.and_then(|slot| self.slots.get(slot)).and_then(|s| s.as_ref())
    }

    /// Move the held cursor onto the first stack of `item_name`
    pub fn hold(&mut self, item_name: &str) -> bool {
        match self.find_item(item_name) {
            Some(slot) => {
                self.held = Some(slot);
                true
            }
            None => false,
        }
    }

    /// Insert an item stack, returns remainder if couldn't fit all
    pub fn insert(&mut self, mut stack: ItemStack) -> Option<ItemStack> {
        for slot in self.slots.iter_mut().flatten() {
            if slot.name == stack.name {
                let transfer = MAX_STACK.saturating_sub(slot.count).min(stack.count);
                slot.count += transfer;
                stack.count -= transfer;
                if stack.count == 0 {
                    return None;
                }
            }
        }

        for slot in &mut self.slots {
            if slot.is_none() {
                let transfer = MAX_STACK.min(stack.count);
                *slot = Some(ItemStack::new(stack.name.clone(), transfer));
                stack.count -= transfer;
                if stack.count == 0 {
                    return None;
                }
            }
        }

        Some(stack)
    }

    /// Remove items, returns how many were actually removed
    pub fn remove(&mut self, item_name: &str, mut count: u32) -> u32 {
        let mut removed = 0;
        for slot in &mut self.slots {
            if let Some(stack) = slot {
                if stack.name == item_name {
                    let take = stack.count.min(count);
                    stack.count -= take;
                    count -= take;
                    removed += take;
                    if stack.count == 0 {
                        *slot = None;
                    }
                    if count == 0 {
                        break;
                    }
                }
            }
        }
        removed
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Self::PLAYER_SIZE)
    }
}
