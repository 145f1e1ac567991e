pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metric;
pub mod output;
pub mod parser;
pub mod source;
pub mod table;
pub mod transform;

pub use aggregate::{Aggregation, DateRange, aggregate};
pub use error::{Error, Result};
pub use metric::Metric;
pub use table::Table;
pub use transform::delta::delta;
pub use transform::window::{WindowOptions, window};
