pub mod document;
pub mod export;
pub mod flat;
pub mod operations;
pub mod visualizer;

pub use document::*;
pub use export::*;
pub use flat::*;
pub use operations::*;
pub use visualizer::*;
