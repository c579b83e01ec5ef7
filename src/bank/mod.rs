use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use thiserror::Error;

pub mod question;

pub use question::{CsvQuestion, JsonQuestion, Question, RawQuestion, UNKNOWN_TOPIC};

#[cfg(test)]
mod tests;

/// Data quality problems found in a loaded bank. They are reported, never raised:
/// a question with a bad answer key can still be presented.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataIssue {
    #[error("question {0} has no options")]
    NoOptions(usize),
    #[error("question {0} has a correct answer that is not one of its options")]
    MissingCorrectAnswer(usize),
    #[error("question {0} lists the option `{1}` more than once")]
    DuplicateOption(usize, String),
    #[error("question {0} has no prompt")]
    EmptyPrompt(usize),
}

#[derive(Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Concatenates the sources in order. Ids are positions in the concatenation.
    pub fn from_sources(sources: Vec<Vec<RawQuestion>>) -> QuestionBank {
        let questions = sources
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(id, raw_question)| Question::from_raw(id, raw_question))
            .collect();
        QuestionBank { questions }
    }

    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<QuestionBank> {
        let mut sources = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let source = read_source(path)
                .with_context(|| format!("Could not load questions from {}", path.display()))?;
            info!("Loaded {} questions from {}", source.len(), path.display());
            sources.push(source);
        }
        Ok(QuestionBank::from_sources(sources))
    }

    pub fn get_questions(&self) -> &Vec<Question> {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn topics(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.topic.clone())
            .unique()
            .sorted()
            .collect()
    }

    pub fn count_for_topic(&self, topic: &str) -> usize {
        self.questions.iter().filter(|q| q.topic == topic).count()
    }

    pub fn audit(&self) -> Vec<DataIssue> {
        let mut issues = Vec::new();
        for question in &self.questions {
            if question.prompt.trim().is_empty() {
                issues.push(DataIssue::EmptyPrompt(question.id));
            }
            if question.options.is_empty() {
                issues.push(DataIssue::NoOptions(question.id));
                continue;
            }
            if !question.has_option(&question.correct_answer) {
                issues.push(DataIssue::MissingCorrectAnswer(question.id));
            }
            let mut seen = HashSet::new();
            for option in &question.options {
                if !seen.insert(option.as_str()) {
                    issues.push(DataIssue::DuplicateOption(question.id, option.clone()));
                }
            }
        }
        issues
    }
}

fn read_source(path: &Path) -> Result<Vec<RawQuestion>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Question file {} does not exist", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => read_json(BufReader::new(file)),
        "csv" => read_csv(file),
        _ => Err(anyhow!("Unsupported question file format: `{}`", extension)),
    }
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawQuestion>> {
    let questions: Vec<JsonQuestion> = serde_json::from_reader(reader)?;
    Ok(questions.into_iter().map(|q| q.into()).collect())
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawQuestion>> {
    let mut questions = Vec::new();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (row, question) in csv_reader.deserialize().enumerate() {
        let csv_question: CsvQuestion =
            question.with_context(|| format!("Invalid question on row {}", row + 1))?;
        questions.push(csv_question.into());
    }
    Ok(questions)
}
