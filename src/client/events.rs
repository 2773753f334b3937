use crate::client::protocol::WireEvent;

/// Game events delivered to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The bot entered the world
    Spawn,

    /// Chat message received
    Chat {
        username: String,
        message: String,
    },

    /// Someone picked up an item entity
    PlayerCollect {
        collector: String,
        item: String,
    },

    /// Server kicked the bot
    Kicked {
        reason: String,
    },

    /// Connection to the gateway or server ended
    Disconnected {
        reason: String,
    },
}

impl From<WireEvent> for GameEvent {
    fn from(event: WireEvent) -> Self {
        match event {
            WireEvent::Spawn => GameEvent::Spawn,
            WireEvent::Chat { username, message } => GameEvent::Chat { username, message },
            WireEvent::PlayerCollect { collector, collected } => GameEvent::PlayerCollect {
                collector,
                item: collected,
            },
            WireEvent::Kicked { reason } => GameEvent::Kicked { reason },
            WireEvent::End { reason } => GameEvent::Disconnected { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire() {
        let event: GameEvent = WireEvent::End { reason: "socket closed".into() }.into();
        assert_eq!(event, GameEvent::Disconnected { reason: "socket closed".into() });

        let event: GameEvent = WireEvent::PlayerCollect {
            collector: "bot".into(),
            collected: "cod".into(),
        }
        .into();
        assert_eq!(event, GameEvent::PlayerCollect { collector: "bot".into(), item: "cod".into() });
    }
}
