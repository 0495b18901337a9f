//! Reading tests, grouped by concern.

mod archive;
mod cell_types;
mod links;
mod merged_cells;
mod pipeline;
mod row_limit;
