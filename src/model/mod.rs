pub mod cache;
pub mod directory;
pub mod enums;
pub mod trail;

pub use cache::*;
pub use directory::*;
pub use enums::*;
pub use trail::*;
