// Virtual path handling and the sandbox resolver
pub mod resolver;
pub mod virtual_path;

pub use resolver::{resolve, ResolvedPath};
