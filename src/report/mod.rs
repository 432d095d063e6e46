//! Result table
//!
//! [`ResultTable::assemble`] joins the routing states onto the runoff id
//! column; [`ResultTable::save`] writes it as comma-separated text.
//!
//! Volumes are reported as whole numbers truncated toward zero. Peak
//! discharges and sediment values carry two decimals.

mod table;
mod writer;

pub use table::{ResultRow, ResultTable};
