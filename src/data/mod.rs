pub mod loader;
pub mod mask;
pub mod volume;
pub mod writer;

pub use loader::*;
pub use mask::*;
pub use volume::*;
pub use writer::*;
