pub mod ai;
pub mod chart;
pub mod report;
pub mod support;
