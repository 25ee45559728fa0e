//! Pure data structures. [`MenuItem`] and [`Order`] implement
//! [`ActorEntity`](actor_framework::ActorEntity) in their actor modules.

pub mod cart;
pub mod menu;
pub mod money;
pub mod order;
pub mod status;

pub use cart::*;
pub use menu::*;
pub use order::*;
pub use status::*;
