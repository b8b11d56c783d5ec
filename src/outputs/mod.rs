//! Writers for the harvested records.
//!
//! # Submodules
//!
//! - [`table`]: the CSV table, one row per article
//! - [`json`]: the full run (query, window, records) as JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_data.csv
//! ├── news_data.json
//! └── work_item_output.json   # written by crate::workitems
//! ```

pub mod json;
pub mod table;
