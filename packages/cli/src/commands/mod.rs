pub mod blocks;
pub mod init;
pub mod inspect;
pub mod new;
pub mod replay;

pub use blocks::blocks;
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new, NewArgs};
pub use replay::{replay, ReplayArgs};
