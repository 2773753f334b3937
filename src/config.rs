use clap::Parser;

use crate::client::ClientConfig;

pub const DEFAULT_USERNAME: &str = "Another Dude";
/// Port the gateway's world viewer listens on with `-v`
pub const VIEWER_PORT: u16 = 3007;

/// Startup settings for one bot session
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "blockbot")]
#[command(about = "Chat-controlled bot: say `bt <command>` in game chat")]
pub struct SessionConfig {
    /// Gateway host
    pub host: String,

    /// Gateway port
    pub port: u16,

    /// Account name the bot logs in with
    #[arg(default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// Account password, for online-mode servers
    pub password: Option<String>,

    /// Start the world viewer and log at debug level
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl SessionConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.host.clone(), self.port, self.username.clone())
            .password(self.password.clone())
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
