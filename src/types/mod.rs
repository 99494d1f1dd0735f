//! Type definitions for searchlead

mod error;
mod series;
mod table;
mod window;

pub use error::*;
pub use series::*;
pub use table::*;
pub use window::*;
