use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::bank::{Question, QuestionBank};

pub mod builder;
pub mod scoreboard;

pub use self::scoreboard::{Scoreboard, TopicReport, TopicScore};


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicFilter {
    All,
    Topic(String),
}

impl TopicFilter {
    pub fn topic(name: &str) -> Self {
        TopicFilter::Topic(name.to_owned())
    }

    pub fn matches(&self, question: &Question) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(topic) => question.topic == *topic,
        }
    }
}

impl Default for TopicFilter {
    fn default() -> Self {
        TopicFilter::All
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicFilter::All => write!(f, "All Topics"),
            TopicFilter::Topic(topic) => write!(f, "{}", topic),
        }
    }
}

/// Rejected answer submissions. None of these change the session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please select an option first")]
    NoSelection,
    #[error("This question has already been answered")]
    AlreadyAnswered,
    #[error("`{0}` is not one of the options")]
    UnknownOption(String),
    #[error("There is no question at this position")]
    NoQuestion,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub choice: String,
    pub correct_answer: String,
    pub explanation: String,
    pub attribution: String,
    pub topic: String,
}

pub struct Session<R: Rng = ThreadRng> {
    bank: Arc<QuestionBank>,
    filter: TopicFilter,
    working_set: Vec<Question>,
    cursor: usize,
    answers: HashMap<usize, String>,
    scoreboard: Scoreboard,
    rng: R,
}

impl Session<ThreadRng> {
    pub fn new(bank: Arc<QuestionBank>, filter: TopicFilter) -> Self {
        Session::with_rng(bank, filter, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(bank: Arc<QuestionBank>, filter: TopicFilter, mut rng: R) -> Self {
        let working_set = builder::build(bank.get_questions(), &filter, &mut rng);
        info!(
            "Starting session for {} with {} questions",
            filter,
            working_set.len()
        );
        Session {
            bank,
            filter,
            working_set,
            cursor: 0,
            answers: HashMap::new(),
            scoreboard: Scoreboard::default(),
            rng,
        }
    }

    pub fn submit_answer(
        &mut self,
        position: usize,
        choice: Option<&str>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .working_set
            .get(position)
            .ok_or(SessionError::NoQuestion)?;

        if self.answers.contains_key(&position) {
            debug!("Ignoring answer for locked position {}", position);
            return Err(SessionError::AlreadyAnswered);
        }

        let choice = match choice.filter(|c| !c.trim().is_empty()) {
            Some(choice) => choice,
            None => return Err(SessionError::NoSelection),
        };

        if !question.has_option(choice) {
            return Err(SessionError::UnknownOption(choice.to_owned()));
        }

        let is_correct = question.is_choice_correct(choice);
        let outcome = AnswerOutcome {
            is_correct,
            choice: choice.to_owned(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
            attribution: question.attribution.clone(),
            topic: question.topic.clone(),
        };

        self.answers.insert(position, outcome.choice.clone());
        self.scoreboard.record(&outcome.topic, is_correct);
        debug!(
            "Position {} answered ({})",
            position,
            if is_correct { "correct" } else { "incorrect" }
        );

        Ok(outcome)
    }

    pub fn submit_current(&mut self, choice: Option<&str>) -> Result<AnswerOutcome, SessionError> {
        self.submit_answer(self.cursor, choice)
    }

    pub fn advance(&mut self) -> bool {
        if self.cursor >= self.working_set.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Moves on without answering. The skipped position stays unanswered.
    pub fn skip(&mut self) -> bool {
        self.advance()
    }

    /// Rebuilds the working set for `filter`. The scoreboard is kept.
    pub fn change_topic_filter(&mut self, filter: TopicFilter) -> bool {
        if filter == self.filter && !self.working_set.is_empty() {
            return false;
        }
        self.working_set = builder::build(self.bank.get_questions(), &filter, &mut self.rng);
        self.filter = filter;
        self.cursor = 0;
        self.answers.clear();
        info!(
            "Switched to {} with {} questions",
            self.filter,
            self.working_set.len()
        );
        true
    }

    /// Reshuffles the current working set and goes back to the first position.
    /// Locks are keyed by position, so they keep applying to whatever question now
    /// sits at each position.
    pub fn restart_set(&mut self) {
        builder::reshuffle(&mut self.working_set, &mut self.rng);
        self.cursor = 0;
        info!("Restarted {}", self.filter);
    }

    pub fn reset_scoreboard(&mut self) {
        self.scoreboard.reset();
        self.answers.clear();
        info!("Progress reset");
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.working_set.get(self.cursor)
    }

    pub fn is_locked(&self, position: usize) -> bool {
        self.answers.contains_key(&position)
    }

    pub fn locked_choice(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(|c| c.as_str())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        !self.working_set.is_empty() && self.cursor == self.working_set.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn working_set(&self) -> &[Question] {
        &self.working_set
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn topics(&self) -> Vec<String> {
        self.bank.topics()
    }
}
