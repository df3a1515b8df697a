pub mod ledger;
pub use ledger::*;

pub mod session;
pub use session::*;

pub mod slot;
pub use slot::*;

pub mod store;
pub use store::*;

pub mod usher;
pub use usher::*;
