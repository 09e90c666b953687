pub use self::{assets::*, paths::*};

pub mod assets;
pub mod loader;
pub mod paths;
pub mod snapshot;
