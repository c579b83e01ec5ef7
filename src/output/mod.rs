use std::time::Duration;

use crate::bank::Question;
use crate::session::{TopicFilter, TopicReport};

#[cfg(test)]
pub mod mock;
pub mod terminal;

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    AlreadyAnswered,
    AnswerCorrect,
    AnswerIncorrect(String),
    AutoAdvance(Duration, u32),
    Explanation {
        explanation: String,
        topic: String,
        attribution: String,
    },
    Help,
    LockedAnswer(String),
    NoProgress,
    NoQuestions,
    NoSelection,
    ProgressReport(Vec<TopicReport>),
    ProgressReset,
    QuestionBegins {
        position: usize,
        total: usize,
        question: Question,
    },
    SetCompleted,
    TopicChanged(TopicFilter, usize),
    Topics(Vec<(String, usize)>),
    UnknownCommand(String),
    UnknownOption(String),
    UnknownTopic(String),
}

pub trait QuizOutput {
    fn say(&self, message: &Message);
}
