pub mod gate;
pub mod identity;
pub mod lawyer_key;
pub mod session;

pub use gate::*;
pub use identity::*;
pub use lawyer_key::*;
pub use session::*;
