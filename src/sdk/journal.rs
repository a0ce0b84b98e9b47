//! Diary domain types
//!
//! Serde names stay camelCase so the blobs written by the web client remain
//! readable as-is.

use serde::{Deserialize, Serialize};

/// Morning entry: gratitude, today's goal, and the stance for the day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorningEntry {
    pub gratitude: Vec<String>,
    pub today_goal: String,
    pub stance: String,
}

/// Evening entry: what went well, kindness given, insights, and tomorrow's
/// question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EveningEntry {
    pub good_things: Vec<String>,
    pub kindness: String,
    pub insights: String,
    pub follow_up_question: String,
}

/// Structured feedback authored by the AI for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFeedback {
    pub morning_comment: String,
    pub evening_comment: String,
    pub daily_summary: String,
    pub reflection_on_follow_up: String,
    pub one_minute_action: String,
    /// 今日の称号
    pub daily_title: String,
}

/// One day of the diary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    /// ISO date, e.g. `2026-08-07`.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning: Option<MorningEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening: Option<EveningEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<AiFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub souvenir_image_url: Option<String>,
    /// Unix millis of the last mutation.
    pub updated_at: i64,
}

/// A "what if" story generated from the day's entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelStory {
    pub story: String,
    pub divergence_point: String,
    pub world_description: String,
}

/// Named system-instruction preset controlling the feedback tone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Philosopher,
    Jinnai,
}

/// User-tunable settings persisted on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub personality: Personality,
}
