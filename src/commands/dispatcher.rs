use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bot::capabilities::Capabilities;
use crate::client::events::GameEvent;
use crate::commands::handlers::{self, BotContext};
use crate::commands::parser;
use crate::error::{Error, Result};

/// Viewer settings applied once the bot has spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerConfig {
    pub port: u16,
    pub first_person: bool,
}

/// Routes chat lines to command handlers, one at a time
pub struct Dispatcher<C: Capabilities + ?Sized + 'static> {
    ctx: BotContext<C>,
    viewer: Option<ViewerConfig>,
    spawned: bool,
}

impl<C: Capabilities + ?Sized + 'static> Dispatcher<C> {
    pub fn new(caps: Arc<C>) -> Self {
        Self {
            ctx: BotContext::new(caps),
            viewer: None,
            spawned: false,
        }
    }

    pub fn with_viewer(mut self, viewer: ViewerConfig) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn context(&self) -> &BotContext<C> {
        &self.ctx
    }

    /// Handle one chat line. Never fails; problems are logged and reported in chat.
    pub async fn handle_chat(&mut self, username: &str, message: &str) {
        if username == self.ctx.caps.username() {
            return;
        }

        let command = match parser::parse(message) {
            None => return,
            Some(Ok(command)) => command,
            Some(Err(e)) if e.is_user_facing() => {
                debug!(username, error = %e, "bad command arguments");
                self.report(&e.to_string()).await;
                return;
            }
            Some(Err(e)) => {
                debug!(username, error = %e, "ignoring command");
                return;
            }
        };

        let name = command.name();
        debug!(username, command = name, "dispatching");
        if let Err(e) = handlers::handle(&mut self.ctx, username, command).await {
            warn!(command = name, error = %e, "command failed");
            self.report(&format!("{} failed: {}", name, e)).await;
        }
    }

    async fn report(&self, message: &str) {
        if let Err(e) = handlers::reply(&*self.ctx.caps, message).await {
            warn!(error = %e, "could not send chat reply");
        }
    }

    async fn on_spawn(&mut self) {
        if self.spawned {
            debug!("respawned");
            return;
        }
        self.spawned = true;
        info!(username = self.ctx.caps.username(), "bot is working and ready to serve");

        if let Some(viewer) = self.viewer {
            match self.ctx.caps.start_viewer(viewer.port, viewer.first_person).await {
                Ok(()) => info!(port = viewer.port, "viewer started"),
                Err(e) => warn!(error = %e, "could not start viewer"),
            }
        }
    }

    /// Consume events until the session ends.
    ///
    /// Chat is only acted on after the first spawn. Returns the reason the
    /// session ended as an error, or `Ok` when the event channel closes.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<GameEvent>) -> Result<()> {
        while let Some(event) = events.recv().await {
            match event {
                GameEvent::Spawn => self.on_spawn().await,
                GameEvent::Chat { username, message } => {
                    if !self.spawned {
                        debug!(%username, "chat before spawn ignored");
                        continue;
                    }
                    self.handle_chat(&username, &message).await;
                }
                GameEvent::PlayerCollect { collector, item } => {
                    debug!(%collector, %item, "item collected");
                }
                GameEvent::Kicked { reason } => {
                    warn!(%reason, "kicked");
                    return Err(Error::Disconnected { reason });
                }
                GameEvent::Disconnected { reason } => {
                    return Err(Error::Disconnected { reason });
                }
            }
        }
        Ok(())
    }
}
