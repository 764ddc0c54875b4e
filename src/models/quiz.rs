use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    /// Minimum 2 options; `correct_index` always points into this list.
    pub options: Vec<QuizOption>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// A freshly added question: empty text, two empty options, first one correct.
    pub fn seeded() -> Self {
        Self {
            question: String::new(),
            options: vec![
                QuizOption { text: String::new() },
                QuizOption { text: String::new() },
            ],
            correct_index: 0,
            explanation: None,
        }
    }
}

/// Partial edit of a question. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    pub question: Option<String>,
    pub explanation: Option<String>,
    pub correct_index: Option<usize>,
}
