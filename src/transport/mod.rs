pub mod feed;
pub use feed::*;

#[cfg(feature = "client")]
pub mod poll;
#[cfg(feature = "client")]
pub use poll::*;

#[cfg(feature = "client")]
pub mod socket;
#[cfg(feature = "client")]
pub use socket::*;

pub mod sse;
pub use sse::*;
