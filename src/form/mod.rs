pub mod prompter;
pub mod smart_form;

pub use prompter::*;
pub use smart_form::*;
