pub mod correlation;
pub mod kde;
pub mod summary;

pub use correlation::*;
pub use kde::*;
pub use summary::*;
