//! Domain Services - pure business rules over entities

pub mod duplicate_detection;
pub mod ordering;
pub mod suggestion_cleaning;

pub use duplicate_detection::{
    dedup_batch, filter_new_suggestions, is_duplicate, partition_suggestions,
};
pub use ordering::{move_item, next_order, reassign_orders, sort_by_order};
pub use suggestion_cleaning::{
    clean_line, clean_suggestion_lines, clean_suggestion_text, clean_tips, title_case,
};
