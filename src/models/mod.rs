pub mod enums;
pub mod rider;
pub mod seal_audit;

pub use enums::*;
pub use rider::*;
pub use seal_audit::*;
