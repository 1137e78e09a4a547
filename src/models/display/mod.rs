//! Display model implementations for table and JSON output

mod item;
pub mod report;

pub use item::Describe;
pub use report::{Action, Report};
