use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Normal,
    Depression,
    Anxiety,
    Schizophrenia,
    Adhd,
}

impl Condition {
    /// Report order. Generator output and score sets follow it.
    pub const ALL: [Condition; 5] = [
        Condition::Normal,
        Condition::Depression,
        Condition::Anxiety,
        Condition::Schizophrenia,
        Condition::Adhd,
    ];

    pub const NAMES: [&'static str; 5] =
        ["normal", "depression", "anxiety", "schizophrenia", "adhd"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Normal => "normal",
            Condition::Depression => "depression",
            Condition::Anxiety => "anxiety",
            Condition::Schizophrenia => "schizophrenia",
            Condition::Adhd => "adhd",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Condition {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Ok(Condition::Normal),
            "depression" => Ok(Condition::Depression),
            "anxiety" => Ok(Condition::Anxiety),
            "schizophrenia" => Ok(Condition::Schizophrenia),
            "adhd" => Ok(Condition::Adhd),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionScore {
    pub condition: Condition,
    pub percentage: i64,
}

/// One analysis result: a percentage per condition, kept in insertion order.
///
/// Only generator-produced sets are guaranteed to sum to 100.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionScoreSet {
    scores: Vec<ConditionScore>,
}

impl ConditionScoreSet {
    /// Builds a set from shares in [`Condition::ALL`] order.
    pub fn from_shares(shares: [i64; 5]) -> Self {
        let scores = Condition::ALL
            .iter()
            .zip(shares)
            .map(|(&condition, percentage)| ConditionScore {
                condition,
                percentage,
            })
            .collect();
        Self { scores }
    }

    /// Inserts or overwrites; a new condition goes to the end.
    pub fn insert(&mut self, condition: Condition, percentage: i64) {
        match self.scores.iter_mut().find(|s| s.condition == condition) {
            Some(existing) => existing.percentage = percentage,
            None => self.scores.push(ConditionScore {
                condition,
                percentage,
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn total(&self) -> i64 {
        self.scores.iter().map(|s| s.percentage).sum()
    }
}

// Written as a JSON object so keys keep report order on the wire.
impl Serialize for ConditionScoreSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for score in &self.scores {
            map.serialize_entry(score.condition.as_str(), &score.percentage)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConditionScoreSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoreSetVisitor;

        impl<'de> Visitor<'de> for ScoreSetVisitor {
            type Value = ConditionScoreSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of condition name to percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = ConditionScoreSet::default();
                while let Some((name, percentage)) = access.next_entry::<String, i64>()? {
                    let condition = Condition::try_from(name.as_str()).map_err(|()| {
                        <A::Error as de::Error>::unknown_variant(name.trim(), &Condition::NAMES)
                    })?;
                    set.insert(condition, percentage);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(ScoreSetVisitor)
    }
}
