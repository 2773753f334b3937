pub mod dispatcher;
pub mod handlers;
pub mod parser;

pub use dispatcher::{Dispatcher, ViewerConfig};
pub use handlers::BotContext;
pub use parser::{parse, Command, MoveDirection, ParseError, TRIGGER_PREFIX};
