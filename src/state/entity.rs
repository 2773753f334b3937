use serde::{Deserialize, Serialize};

use crate::codec::Vec3;

/// Unique entity identifier
pub type EntityId = u32;

/// Entity in the game world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    /// Set for player entities
    #[serde(default)]
    pub username: Option<String>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, kind: EntityKind, position: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            position,
            username: None,
        }
    }

    pub fn player(id: EntityId, username: impl Into<String>, position: Vec3) -> Self {
        let username = username.into();
        Self {
            id,
            name: "player".into(),
            kind: EntityKind::Player,
            position,
            username: Some(username),
        }
    }
}

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Hostile,
    Neutral,
    Passive,
    Object,
    Other,
}

/// Nearest-entity lookup filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub kinds: Vec<EntityKind>,
}

impl EntityFilter {
    pub fn attackable() -> Self {
        Self {
            kinds: vec![EntityKind::Hostile, EntityKind::Neutral],
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        self.kinds.contains(&entity.kind)
    }
}
