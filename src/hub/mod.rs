pub mod floor;
pub use floor::*;

pub mod server;
pub use server::*;
