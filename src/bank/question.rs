use serde::{Deserialize, Deserializer};

pub const UNKNOWN_TOPIC: &'static str = "Unknown Topic";

fn options_from_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(options
        .split("|")
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .map(|option| option.to_owned())
        .collect())
}

fn options_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(options.into_iter().flatten().collect())
}

/// Picks the first key that is present. Banks exported by different tools name the
/// same field differently, and some carry both names.
fn either(primary: Option<String>, alias: Option<String>) -> Option<String> {
    primary.or(alias)
}

/// A question record ready for normalization. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawQuestion {
    pub question: String,
    pub session: Option<String>,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub faculty: String,
}

/// An object in a JSON bank. Keys may be absent or `null`; `question`/`prompt`,
/// `session`/`topic`, `correct_answer`/`correctAnswer` and `faculty`/`attribution` name
/// the same field, the first of each pair wins when both are set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JsonQuestion {
    question: Option<String>,
    prompt: Option<String>,
    session: Option<String>,
    topic: Option<String>,
    #[serde(deserialize_with = "options_or_null")]
    options: Vec<String>,
    correct_answer: Option<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer_camel: Option<String>,
    explanation: Option<String>,
    faculty: Option<String>,
    attribution: Option<String>,
}

impl From<JsonQuestion> for RawQuestion {
    fn from(record: JsonQuestion) -> Self {
        RawQuestion {
            question: either(record.question, record.prompt).unwrap_or_default(),
            session: either(record.session, record.topic),
            options: record.options,
            correct_answer: either(record.correct_answer, record.correct_answer_camel)
                .unwrap_or_default(),
            explanation: record.explanation.unwrap_or_default(),
            faculty: either(record.faculty, record.attribution).unwrap_or_default(),
        }
    }
}

/// CSV rows carry their options in a single `|`-separated column.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsvQuestion {
    question: Option<String>,
    prompt: Option<String>,
    session: Option<String>,
    topic: Option<String>,
    #[serde(deserialize_with = "options_from_string")]
    options: Vec<String>,
    correct_answer: Option<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer_camel: Option<String>,
    explanation: Option<String>,
    faculty: Option<String>,
    attribution: Option<String>,
}

impl From<CsvQuestion> for RawQuestion {
    fn from(row: CsvQuestion) -> Self {
        RawQuestion {
            question: either(row.question, row.prompt).unwrap_or_default(),
            session: either(row.session, row.topic),
            options: row.options,
            correct_answer: either(row.correct_answer, row.correct_answer_camel)
                .unwrap_or_default(),
            explanation: row.explanation.unwrap_or_default(),
            faculty: either(row.faculty, row.attribution).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: usize,
    pub topic: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub attribution: String,
}

impl Question {
    pub fn from_raw(id: usize, raw_question: RawQuestion) -> Self {
        let topic = raw_question
            .session
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_TOPIC.to_owned());

        Question {
            id,
            topic,
            prompt: raw_question.question,
            options: raw_question.options,
            correct_answer: raw_question.correct_answer,
            explanation: raw_question.explanation,
            attribution: raw_question.faculty,
        }
    }

    pub fn is_choice_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }

    pub fn has_option(&self, choice: &str) -> bool {
        self.options.iter().any(|o| o == choice)
    }
}
