pub mod flexible;
pub mod substitution;
pub mod verdict;

pub use flexible::flexible_match;
pub use substitution::SubstitutionTable;
pub use verdict::{assess_words, count_correct, feedback, highlight_markup};
