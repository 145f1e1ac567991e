//! Derived views over an aggregated table.
//!
//! [`delta`] gives day-over-day changes; [`window`] picks out the values two
//! weeks before, at, and two weeks after a date of interest.

pub mod delta;
pub mod utility;
pub mod window;
