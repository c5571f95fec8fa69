pub mod display;
pub mod file_operations;

pub use display::*;
pub use file_operations::*;
