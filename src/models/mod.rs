pub mod case;
pub mod case_state;
pub mod template;

pub use case::*;
pub use case_state::*;
pub use template::*;
