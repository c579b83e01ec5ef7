use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::time::Duration;

use crate::commands::{match_topic, Command, TopicChoice};
use crate::output::{Message, QuizOutput};
use crate::session::{AnswerOutcome, Session, SessionError, TopicFilter};
use crate::settings::Settings;


/// Delay between feedback and the next question.
#[derive(Debug)]
struct Countdown {
    time_elapsed: Duration,
    time_to_wait: Duration,
}

impl Countdown {
    fn new(duration: Duration) -> Self {
        Countdown {
            time_elapsed: Duration::default(),
            time_to_wait: duration,
        }
    }

    fn on_tick(&mut self, dt: Duration) {
        self.time_elapsed += dt;
    }

    fn time_remaining(&self) -> Duration {
        self.time_to_wait
            .checked_sub(self.time_elapsed)
            .unwrap_or_default()
    }

    fn percent_complete(&self) -> u32 {
        if self.time_to_wait.as_nanos() == 0 {
            return 100;
        }
        let ratio = self.time_elapsed.as_secs_f64() / self.time_to_wait.as_secs_f64();
        (ratio.min(1.0) * 100.0) as u32
    }

    fn is_over(&self) -> bool {
        self.time_elapsed >= self.time_to_wait
    }
}

/// Drives a session from learner commands and renders the result. The engine never
/// waits: auto-advance after an answer is armed here and fired from `tick`.
pub struct Drill<O: QuizOutput, R: Rng = ThreadRng> {
    session: Session<R>,
    settings: Settings,
    output: O,
    countdown: Option<Countdown>,
    is_over: bool,
}

impl<O: QuizOutput, R: Rng> Drill<O, R> {
    pub fn new(session: Session<R>, settings: Settings, output: O) -> Self {
        Drill {
            session,
            settings,
            output,
            countdown: None,
            is_over: false,
        }
    }

    pub fn begin(&mut self) {
        self.output.say(&Message::TopicChanged(
            self.session.filter().clone(),
            self.session.len(),
        ));
        self.show_current();
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn is_waiting(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn handle(&mut self, command: Command) {
        debug!("Handling command: {:?}", command);
        match command {
            Command::Answer(choice) => self.answer(choice),
            Command::Unknown(text) => match self.resolve_option(&text, false) {
                Some(choice) => self.answer(Some(choice)),
                None => self.output.say(&Message::UnknownCommand(text)),
            },
            Command::Next | Command::Skip => {
                self.cancel_countdown();
                self.session.advance();
                self.show_current();
            }
            Command::Back => {
                self.cancel_countdown();
                self.session.retreat();
                self.show_current();
            }
            Command::Topic(choice) => self.change_topic(choice),
            Command::Topics => {
                let bank = self.session.bank();
                let topics = bank
                    .topics()
                    .into_iter()
                    .map(|t| {
                        let count = bank.count_for_topic(&t);
                        (t, count)
                    })
                    .collect();
                self.output.say(&Message::Topics(topics));
            }
            Command::Restart => {
                self.cancel_countdown();
                self.session.restart_set();
                self.show_current();
            }
            Command::Reset => {
                self.cancel_countdown();
                self.session.reset_scoreboard();
                self.output.say(&Message::ProgressReset);
                self.show_current();
            }
            Command::Stats => {
                let report = self.session.scoreboard().report();
                if report.is_empty() {
                    self.output.say(&Message::NoProgress);
                } else {
                    self.output.say(&Message::ProgressReport(report));
                }
            }
            Command::Help => self.output.say(&Message::Help),
            Command::Quit => {
                info!("Leaving drill");
                self.cancel_countdown();
                self.is_over = true;
            }
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        let countdown = match self.countdown.as_mut() {
            Some(countdown) => countdown,
            None => return,
        };

        let seconds_before = countdown.time_remaining().as_secs_f64().ceil() as u64;
        countdown.on_tick(dt);
        let seconds_after = countdown.time_remaining().as_secs_f64().ceil() as u64;

        if countdown.is_over() {
            self.countdown = None;
            self.session.advance();
            self.show_current();
        } else if seconds_after < seconds_before {
            let message = Message::AutoAdvance(countdown.time_remaining(), countdown.percent_complete());
            self.output.say(&message);
        }
    }

    fn answer(&mut self, choice: Option<String>) {
        let choice = choice.map(|c| self.resolve_option(&c, true).unwrap_or(c));
        match self.session.submit_current(choice.as_deref()) {
            Ok(outcome) => self.reveal(outcome),
            Err(SessionError::AlreadyAnswered) => self.output.say(&Message::AlreadyAnswered),
            Err(SessionError::NoSelection) => self.output.say(&Message::NoSelection),
            Err(SessionError::UnknownOption(choice)) => {
                self.output.say(&Message::UnknownOption(choice))
            }
            Err(SessionError::NoQuestion) => self.show_current(),
        }
    }

    fn reveal(&mut self, outcome: AnswerOutcome) {
        if outcome.is_correct {
            self.output.say(&Message::AnswerCorrect);
        } else {
            self.output
                .say(&Message::AnswerIncorrect(outcome.correct_answer.clone()));
        }
        self.output.say(&Message::Explanation {
            explanation: outcome.explanation,
            topic: outcome.topic,
            attribution: outcome.attribution,
        });

        let delay = self.settings.auto_advance_delay;
        if delay == Duration::default() {
            self.session.advance();
            self.show_current();
            return;
        }
        let countdown = Countdown::new(delay);
        self.output.say(&Message::AutoAdvance(
            countdown.time_remaining(),
            countdown.percent_complete(),
        ));
        self.countdown = Some(countdown);
    }

    /// Maps learner input to one of the current question's options: the exact text, a
    /// 1-based option number (when `allow_number` is set), or the text ignoring case.
    /// Exact text wins so that options which are themselves numbers stay reachable.
    fn resolve_option(&self, input: &str, allow_number: bool) -> Option<String> {
        let question = self.session.current_question()?;
        let input = input.trim();
        if let Some(option) = question.options.iter().find(|o| o.as_str() == input) {
            return Some(option.clone());
        }
        if allow_number {
            if let Ok(number) = input.parse::<usize>() {
                return number
                    .checked_sub(1)
                    .and_then(|i| question.options.get(i))
                    .cloned();
            }
        }
        let input = input.to_lowercase();
        question
            .options
            .iter()
            .find(|o| o.to_lowercase() == input)
            .cloned()
    }

    fn change_topic(&mut self, choice: TopicChoice) {
        let filter = match choice {
            TopicChoice::All => TopicFilter::All,
            TopicChoice::Named(name) => {
                let topics = self.session.topics();
                match match_topic(&name, &topics) {
                    Some(topic) => TopicFilter::Topic(topic.clone()),
                    None => {
                        self.output.say(&Message::UnknownTopic(name));
                        return;
                    }
                }
            }
        };

        self.cancel_countdown();
        if self.session.change_topic_filter(filter) {
            self.output.say(&Message::TopicChanged(
                self.session.filter().clone(),
                self.session.len(),
            ));
        }
        self.show_current();
    }

    fn cancel_countdown(&mut self) {
        if self.countdown.take().is_some() {
            debug!("Auto-advance cancelled");
        }
    }

    fn show_current(&mut self) {
        if self.session.is_empty() {
            self.output.say(&Message::NoQuestions);
            return;
        }
        let position = self.session.cursor();
        let question = match self.session.current_question() {
            Some(question) => question.clone(),
            None => {
                self.output.say(&Message::SetCompleted);
                return;
            }
        };
        self.output.say(&Message::QuestionBegins {
            position,
            total: self.session.len(),
            question,
        });
        if let Some(choice) = self.session.locked_choice(position) {
            self.output.say(&Message::LockedAnswer(choice.to_owned()));
        }
    }
}
