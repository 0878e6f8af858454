use crate::domain::ConditionScoreSet;
use serde_json::{json, Value};

pub const CHART_TITLE: &str = "Brain Wave Analysis Results";
const BACKGROUND: &str = "#f5f3ff";
const SIZE: u32 = 350;

/// Vega-Lite pie chart for a score set: one arc per condition, legend titled
/// "Conditions", tooltip with condition and value.
pub fn pie_chart_spec(scores: &ConditionScoreSet) -> Value {
    let values: Vec<Value> = scores
        .iter()
        .map(|s| json!({ "Condition": s.condition.as_str(), "Value": s.percentage }))
        .collect();

    json!({
        "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
        "title": CHART_TITLE,
        "width": SIZE,
        "height": SIZE,
        "background": BACKGROUND,
        "config": { "view": { "strokeWidth": 0 } },
        "data": { "values": values },
        "mark": { "type": "arc" },
        "encoding": {
            "theta": { "field": "Value", "type": "quantitative" },
            "color": {
                "field": "Condition",
                "type": "nominal",
                "legend": { "title": "Conditions" }
            },
            "tooltip": [
                { "field": "Condition", "type": "nominal" },
                { "field": "Value", "type": "quantitative" }
            ]
        }
    })
}
