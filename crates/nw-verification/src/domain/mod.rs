//! Pure adjudication logic.

pub mod comparator;

pub use comparator::answers_match;
