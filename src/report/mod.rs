//! Chart rendering. Each view from the processor becomes one `plotly::Plot`;
//! the `Report` holds them until the end of the run.
pub mod charts;
pub mod collection;

pub use charts::*;
pub use collection::*;
