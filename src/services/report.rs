//! Summary, self-care tips and support chat built on top of a `TextGenerator`.

use crate::domain::ConditionScoreSet;
use crate::services::ai::{ChatTurn, TextGenerator};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const SUPPORT_CHAT_SYSTEM_PROMPT: &str =
    "You are a compassionate support assistant offering emotional support.";

const SUMMARY_TEMPLATE: &str = r#"
You are a compassionate AI health assistant. Always speak warmly, supportively, and as if you are a caring friend.

Task:
Given this brain wave analysis:
{diagnoses}
Identify the top two conditions with the highest percentages Only include the second if its percentage is 40% or more. Otherwise, focus only on the first.
For each included condition, provide:
A brief, friendly interpretation (1–2 sentences).
Specific, practical advice tailored to the severity.
Format each condition exactly as:
"[Condition Name]: [Brief interpretation]. [Practical advice]."

Rules:
Start with the condition that has the highest percentage.
Keep the entire response under 200 words.
DO NOT repeat the percentage or severity terms.
DO NOT use labels like "mild", "moderate", etc.
DO NOT mention "the results" or similar.
DO NOT use bullet points or numbering in the output.
Use warm, easy-to-understand language without medical jargon.
Sound caring and reassuring throughout.
"#;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub summary: String,
    pub summary_lines: Vec<String>,
    pub tips: Vec<String>,
}

/// One `"{condition}: {value}% likelihood"` line per entry, in set order.
pub fn diagnoses_text(scores: &ConditionScoreSet) -> String {
    scores
        .iter()
        .map(|s| format!("{}: {}% likelihood", s.condition, s.percentage))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary_prompt(scores: &ConditionScoreSet) -> String {
    SUMMARY_TEMPLATE.replace("{diagnoses}", &diagnoses_text(scores))
}

pub fn tips_prompt(summary: &str) -> String {
    format!(
        "\nThe user has the following situation:\n{summary}\nSuggest 5 short caring tips to feel better. Start each tip with \"- \".\n"
    )
}

/// Splits a tips reply into lines, dropping blanks and the leading "- " markers.
pub fn parse_tips(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_matches(|c| c == '-' || c == ' ').trim().to_string())
        .filter(|tip| !tip.is_empty())
        .collect()
}

pub async fn summarize(generator: &dyn TextGenerator, scores: &ConditionScoreSet) -> Result<String> {
    generator
        .complete(&[ChatTurn::user(summary_prompt(scores))])
        .await
}

pub async fn recommend_tips(generator: &dyn TextGenerator, summary: &str) -> Result<Vec<String>> {
    let reply = generator.complete(&[ChatTurn::user(tips_prompt(summary))]).await?;
    Ok(parse_tips(&reply))
}

/// Summary first, then tips derived from that summary.
pub async fn analyze(generator: &dyn TextGenerator, scores: &ConditionScoreSet) -> Result<AnalysisReport> {
    let summary = summarize(generator, scores).await?;
    let tips = recommend_tips(generator, &summary).await?;
    let summary_lines = summary.split('\n').map(str::to_string).collect();
    Ok(AnalysisReport {
        summary,
        summary_lines,
        tips,
    })
}

/// Answers the last user turn of `history`, which must not contain a system turn.
pub async fn chat_reply(generator: &dyn TextGenerator, history: &[ChatTurn]) -> Result<String> {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(ChatTurn::system(SUPPORT_CHAT_SYSTEM_PROMPT));
    turns.extend_from_slice(history);
    generator.complete(&turns).await
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;
    use crate::services::ai::ChatRole;

    #[test]
    fn test_diagnoses_text_is_ordered() {
        let scores = ConditionScoreSet::from_shares([60, 40, 0, 0, 0]);
        assert_eq!(
            diagnoses_text(&scores),
            "normal: 60% likelihood\ndepression: 40% likelihood\nanxiety: 0% likelihood\nschizophrenia: 0% likelihood\nadhd: 0% likelihood"
        );
    }

    #[test]
    fn test_summary_prompt_embeds_diagnoses() {
        let scores = ConditionScoreSet::from_shares([90, 5, 5, 0, 0]);
        let prompt = summary_prompt(&scores);
        assert!(prompt.contains("Given this brain wave analysis:\nnormal: 90% likelihood\n"));
        assert!(!prompt.contains("{diagnoses}"));
    }

    #[test]
    fn test_parse_tips() {
        let reply = "- Take a short walk outside\n\n-  Drink some water \n   \nCall a friend\n- ";
        assert_eq!(
            parse_tips(reply),
            vec!["Take a short walk outside", "Drink some water", "Call a friend"]
        );
    }

    #[tokio::test]
    async fn test_analyze_feeds_summary_into_tips() {
        let generator = ScriptedGenerator::new(&[
            "Normal: You seem well.\nDepression: Be gentle with yourself.",
            "- Sleep well\n- Stretch",
        ]);
        let scores = ConditionScoreSet::from_shares([55, 45, 0, 0, 0]);

        let report = analyze(&generator, &scores).await.unwrap();
        assert_eq!(report.summary_lines.len(), 2);
        assert_eq!(report.tips, vec!["Sleep well", "Stretch"]);

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1][0].content.contains("Be gentle with yourself."));
    }

    #[tokio::test]
    async fn test_chat_reply_prepends_system_turn() {
        let generator = ScriptedGenerator::new(&["I'm here for you."]);
        let history = vec![ChatTurn::user("I feel tired")];

        let reply = chat_reply(&generator, &history).await.unwrap();
        assert_eq!(reply, "I'm here for you.");
        assert_eq!(generator.roles_of(0), vec![ChatRole::System, ChatRole::User]);
        assert_eq!(
            generator.requests.lock().unwrap()[0][0].content,
            SUPPORT_CHAT_SYSTEM_PROMPT
        );
    }

    #[tokio::test]
    async fn test_generator_errors_propagate() {
        let generator = ScriptedGenerator::new(&[]);
        let scores = ConditionScoreSet::from_shares([100, 0, 0, 0, 0]);
        assert!(analyze(&generator, &scores).await.is_err());
    }
}
