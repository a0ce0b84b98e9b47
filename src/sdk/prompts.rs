//! Prompt construction: personality presets, domain prompts, and the
//! response schemas the structured-output calls attach.
//!
//! Templating only — any behavior that matters to dispatch lives server-side.

use serde_json::{Value, json};

use super::journal::{DailyLog, Personality};
use crate::core::types::{ChatTurn, TurnRole};

pub const PHILOSOPHER_INSTRUCTION: &str = "あなたは、人間の魂の深淵を見つめ、そこに眠る宝石を言葉で磨き上げる「魂の記述者（ソウル・スクライブ）」です。格調高く、詩的で哲学的な言葉を使ってください。";

pub const JINNAI_INSTRUCTION: &str = r#"あなたは伊坂幸太郎の小説『重力ピエロ』や『砂漠』に登場する「陣内（じんない）」という男です。
- 非常にぶっきらぼうで、斜に構えた態度。
- 「世の中のルールなんて関係ねえよ」というのが基本スタンス。
- どんな深刻な悩みも「まあ、なんとかなるだろ」と一蹴する。
- 口は悪いが、最後にはなぜか相手を前向きにさせるような、不思議な説得力がある。
- 常識や正論を嫌い、自分の直感を信じる。
- 自己中心的だが、友人（ユーザー）のことは放っておけない。
- 返答はすべて「です・ます」ではなく「だ・である」調（タメ口）で書く。"#;

/// System instruction for feedback generation.
pub fn feedback_instruction(personality: Personality) -> &'static str {
    match personality {
        Personality::Philosopher => PHILOSOPHER_INSTRUCTION,
        Personality::Jinnai => JINNAI_INSTRUCTION,
    }
}

/// System instruction for the evening chat, with the interviewing goal
/// appended to the personality preset.
pub fn chat_instruction(personality: Personality) -> String {
    match personality {
        Personality::Jinnai => format!(
            "{}\n目的：ユーザーと会話しながら、今日あった「良いこと」「親切にしたこと」「気づき」を聞き出すこと。ただし、尋問調ではなく、自然な会話の中で引き出せ。",
            JINNAI_INSTRUCTION
        ),
        Personality::Philosopher => format!(
            "{}\n目的：対話を通じてユーザーの一日を深掘りし、魂の輝き（良かったこと・善行・洞察）を見つけ出すこと。",
            PHILOSOPHER_INSTRUCTION
        ),
    }
}

/// Response schema for daily feedback.
pub fn feedback_schema() -> Value {
    json!({
        "description": "Feedback structure",
        "type": "OBJECT",
        "properties": {
            "morningComment": { "type": "STRING" },
            "eveningComment": { "type": "STRING" },
            "dailySummary": { "type": "STRING" },
            "reflectionOnFollowUp": { "type": "STRING" },
            "oneMinuteAction": { "type": "STRING" },
            "dailyTitle": { "type": "STRING" },
        },
        "required": [
            "morningComment", "eveningComment", "dailySummary",
            "reflectionOnFollowUp", "oneMinuteAction", "dailyTitle"
        ],
    })
}

/// Response schema for a diary entry extracted from a chat transcript.
pub fn evening_entry_schema() -> Value {
    json!({
        "description": "Extracted diary entry from chat",
        "type": "OBJECT",
        "properties": {
            "goodThings": { "type": "ARRAY", "items": { "type": "STRING" } },
            "kindness": { "type": "STRING" },
            "insights": { "type": "STRING" },
            "followUpQuestion": { "type": "STRING" },
        },
        "required": ["goodThings", "kindness", "insights", "followUpQuestion"],
    })
}

/// Response schema for the parallel-world story.
pub fn parallel_world_schema() -> Value {
    json!({
        "description": "Parallel World Story",
        "type": "OBJECT",
        "properties": {
            "story": { "type": "STRING", "description": "もし別の選択をしていたら...というIFストーリー" },
            "divergencePoint": { "type": "STRING", "description": "運命が分岐した瞬間" },
            "worldDescription": { "type": "STRING", "description": "その並行世界の設定や雰囲気" },
        },
        "required": ["story", "divergencePoint", "worldDescription"],
    })
}

fn join_or_blank(items: &[String]) -> String {
    if items.is_empty() {
        "未入力".to_string()
    } else {
        items.join(", ")
    }
}

fn or_blank(text: &str) -> &str {
    if text.is_empty() { "未入力" } else { text }
}

/// Input context block shared by the feedback prompts.
fn input_context(log: &DailyLog) -> String {
    let (gratitude, goal, stance) = match &log.morning {
        Some(m) => (
            join_or_blank(&m.gratitude),
            or_blank(&m.today_goal).to_string(),
            or_blank(&m.stance).to_string(),
        ),
        None => ("未入力".to_string(), "未入力".to_string(), "未入力".to_string()),
    };
    let (good, kindness, insights, follow_up) = match &log.evening {
        Some(e) => (
            join_or_blank(&e.good_things),
            or_blank(&e.kindness).to_string(),
            or_blank(&e.insights).to_string(),
            or_blank(&e.follow_up_question).to_string(),
        ),
        None => (
            "未入力".to_string(),
            "未入力".to_string(),
            "未入力".to_string(),
            "未入力".to_string(),
        ),
    };

    format!(
        "【朝の記録】\n- 感謝: {}\n- 目標: {}\n- スタンス: {}\n\n【夜の記録】\n- 良かったこと: {}\n- 親切: {}\n- 気づき: {}\n- 問いかけ: {}",
        gratitude, goal, stance, good, kindness, insights, follow_up
    )
}

/// Past titles as reference material for continuity.
fn history_context(history: &[DailyLog]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = history
        .iter()
        .map(|log| {
            let title = log
                .ai_feedback
                .as_ref()
                .map(|f| f.daily_title.as_str())
                .unwrap_or("");
            format!("- {}: {}", log.date, title)
        })
        .collect();

    format!("\n【過去の記録の遍歴（参考資料）】\n{}\n", lines.join("\n"))
}

/// Prompt for the daily feedback call.
pub fn feedback_prompt(log: &DailyLog, personality: Personality, history: &[DailyLog]) -> String {
    let input = input_context(log);
    let past = history_context(history);

    match personality {
        Personality::Jinnai => format!(
            "今日の日記を読んで、陣内としてコメントしろ。\n表面的な褒め言葉はいらねえ。「お前、昨日はこんなこと書いてたのに今日はこれかよ」みたいな、過去の記録 {} との繋がりがあればそこも突っ込め。\nとにかくお前らしい、ぶっきらぼうだが本質を突いた言葉を頼むぜ。\n\nユーザーの入力データ:\n{}",
            past, input
        ),
        Personality::Philosopher => format!(
            "ユーザーの日記を読み解き、その一日の固有の美しさを哲学的な言葉で伝えてください。\n過去の遍歴 {} を踏まえ、ユーザーの魂がどう進化しているか深く洞察してください。\n\n【執筆の掟】\n1. **具体性の徹底:** ユーザーが書いた「具体的な言葉」を必ず引用してください。\n2. **物語の結合:** 朝の意図と夜の結果を繋ぎ、一日のストーリーを完結させてください。\n\nユーザーの入力データ:\n{}",
            past, input
        ),
    }
}

/// Prompt for the souvenir image.
pub fn souvenir_prompt(log: &DailyLog) -> Option<String> {
    let evening = log.evening.as_ref()?;
    Some(format!(
        "A masterpiece artistic illustration capturing the essence of this feeling: \"{}\".\nThe mood is \"{}\".\nStyle: Whimsical, warm lighting, Studio Ghibli meets Monet, soft pastel colors, dreamy atmosphere, high quality digital art.\nNo text. A visual metaphor for a fulfilling day.",
        evening.good_things.join(", "),
        evening.insights
    ))
}

/// Prompt for the parallel-world story.
pub fn parallel_story_prompt(log: &DailyLog) -> Option<String> {
    let evening = log.evening.as_ref()?;
    Some(format!(
        "ユーザーの今日の日記をもとに、「もし今日、別の些細な選択をしていたら？」という並行世界（パラレルワールド）のエピソードを生成してください。\n\n【条件】\n- 些細な選択の違い（例：コーヒーではなく紅茶を頼んだ、一本早い電車に乗った、等）から生じる、意外な展開を描く。\n- バタフライエフェクトのように、小さな違いが大きな結果（ファンタジーでもSF的でも可）に繋がる様子を描写する。\n- 少し不気味でミステリアスな、「世にも奇妙な物語」のような雰囲気で。\n\n日記の内容:\n- 良かったこと: {}\n- 気づき: {}",
        evening.good_things.join(", "),
        evening.insights
    ))
}

/// Prompt asking for structured extraction from a chat transcript.
pub fn extraction_prompt(messages: &[ChatTurn]) -> String {
    let transcript: Vec<String> = messages
        .iter()
        .map(|turn| {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Model => "model",
            };
            format!("{}: {}", role, turn.text)
        })
        .collect();

    format!(
        "以下の会話ログから、ユーザーの「今日の日記」として記録すべき要素を抽出して構造化データにせよ。\n\n【会話ログ】\n{}\n\n【抽出項目】\n- goodThings: 良かったこと・楽しかったこと（3つ程度、配列で）\n- kindness: 誰かに親切にしたこと、優しさを与えたこと\n- insights: 新しい発見、教訓、感情の動き\n- followUpQuestion: 会話の内容を踏まえた、明日への問いかけ",
        transcript.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::journal::{AiFeedback, EveningEntry};

    fn log_with_evening() -> DailyLog {
        DailyLog {
            date: "2026-08-07".to_string(),
            evening: Some(EveningEntry {
                good_things: vec!["朝の散歩".to_string(), "友人との電話".to_string()],
                kindness: "席を譲った".to_string(),
                insights: "焦らなくていい".to_string(),
                follow_up_question: "明日は？".to_string(),
            }),
            ..DailyLog::default()
        }
    }

    #[test]
    fn feedback_prompt_quotes_entries() {
        let prompt = feedback_prompt(&log_with_evening(), Personality::Philosopher, &[]);
        assert!(prompt.contains("朝の散歩, 友人との電話"));
        assert!(prompt.contains("席を譲った"));
        // No history block when there is no history.
        assert!(!prompt.contains("過去の記録の遍歴"));
    }

    #[test]
    fn feedback_prompt_lists_past_titles() {
        let mut past = log_with_evening();
        past.date = "2026-08-06".to_string();
        past.ai_feedback = Some(AiFeedback {
            daily_title: "小さな勇気の日".to_string(),
            ..AiFeedback::default()
        });

        let prompt = feedback_prompt(&log_with_evening(), Personality::Jinnai, &[past]);
        assert!(prompt.contains("- 2026-08-06: 小さな勇気の日"));
    }

    #[test]
    fn missing_entries_render_as_blank_markers() {
        let log = DailyLog {
            date: "2026-08-07".to_string(),
            ..DailyLog::default()
        };
        let prompt = feedback_prompt(&log, Personality::Philosopher, &[]);
        assert!(prompt.contains("- 感謝: 未入力"));
    }

    #[test]
    fn souvenir_prompt_requires_evening() {
        let log = DailyLog::default();
        assert!(souvenir_prompt(&log).is_none());
        assert!(souvenir_prompt(&log_with_evening()).is_some());
    }

    #[test]
    fn schemas_declare_required_fields() {
        let schema = feedback_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);

        let schema = evening_entry_schema();
        assert_eq!(schema["properties"]["goodThings"]["type"], "ARRAY");
    }

    #[test]
    fn extraction_prompt_includes_transcript() {
        let prompt = extraction_prompt(&[
            ChatTurn::model("今日はどうだった？"),
            ChatTurn::user("散歩した"),
        ]);
        assert!(prompt.contains("model: 今日はどうだった？"));
        assert!(prompt.contains("user: 散歩した"));
    }
}
