pub mod card;
pub use card::*;

pub mod key;
pub use key::*;

pub mod link;
pub use link::*;

pub mod moves;
pub use moves::*;

pub mod seat;
pub use seat::*;

pub mod snapshot;
pub use snapshot::*;

pub mod street;
pub use street::*;

pub mod suit;
pub use suit::*;

pub mod table;
pub use table::*;
