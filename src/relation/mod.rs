//! Edge lists and id normalization.
//!
//! Everything the detector touches starts as a [`RelationList`]: parallel
//! `(row, column, value)` arrays over arbitrary raw ids. Before a list can
//! back a graph it has to be
//!
//! 1. **sorted** (rows, then columns within a row),
//! 2. **unique** (duplicates removed or aggregated, caller's choice), and
//! 3. **normalized** (raw ids replaced by dense ids `0..K`).
//!
//! Structural operations (decompose, fold, filter, transpose) produce new
//! lists whose ids stay traceable to the caller's raw ids through a chain of
//! [`Lineage`] records.
//!
//! ```rust
//! use potts::relation::{DuplicateMode, RelationList, SortOrder};
//!
//! let mut list = RelationList::from_edges([(7, 3, 1.0), (7, 3, 2.0), (3, 9, 1.0)]);
//! let duplicates = list.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
//! list.normalize(false);
//!
//! assert_eq!(duplicates, 1);
//! assert_eq!(list.row_count(), 3);
//! assert_eq!(list.raw_row(2), Some(9));
//! ```

mod id_map;
mod list;

pub use id_map::{IdMap, Lineage};
pub use list::{DuplicateMode, Normalization, RelationList, SortOrder};
