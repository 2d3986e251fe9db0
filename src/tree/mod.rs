mod arena;
pub(crate) mod id;
mod mutate;
pub mod node;
pub mod path;

pub use arena::*;
pub use node::*;
pub use path::*;
