pub mod event;
pub use event::*;

pub mod message;
pub use message::*;
