pub mod events;
pub mod protocol;
pub mod session;

pub use events::GameEvent;
pub use protocol::{Request, Response, WireEvent};
pub use session::{ClientConfig, Session};
