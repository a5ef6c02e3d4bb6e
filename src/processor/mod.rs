pub mod csv_loader;
pub mod price_cleaner;
pub mod view_builder;

pub use csv_loader::*;
pub use price_cleaner::*;
pub use view_builder::*;
