pub mod condition;
pub mod severity;
pub mod synthetic;

pub use condition::{Condition, ConditionScoreSet};
