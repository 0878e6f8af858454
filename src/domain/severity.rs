//! Severity bands for condition percentages.
//! Each table is a list of (exclusive upper bound, label) pairs checked in order;
//! anything at or above the last bound gets the top label.

use crate::domain::condition::{Condition, ConditionScoreSet};
use serde::Serialize;

pub const UNKNOWN_LABEL: &str = "Unknown";

struct SeverityTable {
    bands: &'static [(i64, &'static str)],
    top: &'static str,
}

impl SeverityTable {
    fn label_for(&self, percentage: i64) -> &'static str {
        self.bands
            .iter()
            .find(|(bound, _)| percentage < *bound)
            .map(|(_, label)| *label)
            .unwrap_or(self.top)
    }

    fn labels(&self) -> Vec<&'static str> {
        self.bands
            .iter()
            .map(|(_, label)| *label)
            .chain(std::iter::once(self.top))
            .collect()
    }
}

const NORMAL: SeverityTable = SeverityTable {
    bands: &[
        (50, "Some risk likely"),
        (70, "Mostly healthy"),
        (85, "Healthy"),
    ],
    top: "Very healthy!",
};

const SCHIZOPHRENIA: SeverityTable = SeverityTable {
    bands: &[
        (10, "Very unlikely"),
        (25, "Mild suspicion"),
        (40, "Moderate risk"),
    ],
    top: "High risk",
};

const DEPRESSION: SeverityTable = SeverityTable {
    bands: &[
        (15, "Very unlikely"),
        (25, "Mild symptoms likely"),
        (40, "Moderate suspicion"),
        (60, "High suspicion"),
    ],
    top: "Severe risk",
};

const ANXIETY: SeverityTable = SeverityTable {
    bands: &[
        (20, "Very unlikely"),
        (30, "Mild anxiety traits"),
        (50, "Moderate suspicion"),
        (70, "High likelihood"),
    ],
    top: "Severe anxiety likely",
};

const ADHD: SeverityTable = SeverityTable {
    bands: &[
        (20, "Very unlikely"),
        (30, "Mild attention difficulties"),
        (45, "Moderate suspicion"),
        (60, "High likelihood"),
    ],
    top: "Severe ADHD highly likely",
};

fn table(condition: Condition) -> &'static SeverityTable {
    match condition {
        Condition::Normal => &NORMAL,
        Condition::Schizophrenia => &SCHIZOPHRENIA,
        Condition::Depression => &DEPRESSION,
        Condition::Anxiety => &ANXIETY,
        Condition::Adhd => &ADHD,
    }
}

/// Severity label for a percentage. Out-of-range values land in the open-ended
/// lowest or highest band.
pub fn classify(percentage: i64, condition: Condition) -> &'static str {
    table(condition).label_for(percentage)
}

/// Same as [`classify`] for a free-form condition name; unrecognized names give
/// [`UNKNOWN_LABEL`].
pub fn classify_name(percentage: i64, condition: &str) -> &'static str {
    match Condition::try_from(condition) {
        Ok(condition) => classify(percentage, condition),
        Err(()) => UNKNOWN_LABEL,
    }
}

/// A percentage next to its label, as listed under "Analysis Results".
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassifiedScore {
    pub condition: String,
    pub percentage: i64,
    pub severity: &'static str,
}

pub fn classify_set(scores: &ConditionScoreSet) -> Vec<ClassifiedScore> {
    scores
        .iter()
        .map(|s| ClassifiedScore {
            condition: s.condition.to_string(),
            percentage: s.percentage,
            severity: classify(s.percentage, s.condition),
        })
        .collect()
}

impl Condition {
    /// Every label this condition can produce, lowest band first.
    pub fn labels(&self) -> Vec<&'static str> {
        table(*self).labels()
    }
}
