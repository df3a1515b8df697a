pub mod config;
pub use config::*;

pub mod plan;
pub use plan::*;

#[cfg(feature = "client")]
pub mod screen;
#[cfg(feature = "client")]
pub use screen::*;

#[cfg(feature = "client")]
pub mod view;
#[cfg(feature = "client")]
pub use view::*;
