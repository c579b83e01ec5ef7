use parking_lot::Mutex;
use std::io::Write;

use crate::output::{Message, QuizOutput};


const PROGRESS_BAR_WIDTH: usize = 20;

const HELP: &'static str = "\
Commands:
  <number> or <option text>  answer the current question
  next / n                   go to the next question
  back / b                   go to the previous question
  skip / s                   skip the current question
  topic <name> | topic all   study a single topic, or all of them
  topics                     list topics
  restart                    reshuffle the current set and start over
  stats                      show the progress report
  reset                      reset progress
  help                       show this message
  quit / q                   leave";

fn progress_bar(ratio: f64) -> String {
    let ratio = ratio.max(0.0).min(1.0);
    let filled = (ratio * PROGRESS_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

pub struct TerminalOutput {
    pass_threshold: u32,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TerminalOutput {
    pub fn new(pass_threshold: u32) -> Self {
        TerminalOutput::with_writer(pass_threshold, Box::new(std::io::stdout()))
    }

    pub fn with_writer(pass_threshold: u32, writer: Box<dyn Write + Send>) -> Self {
        TerminalOutput {
            pass_threshold,
            writer: Mutex::new(writer),
        }
    }

    pub fn render(&self, message: &Message) -> String {
        match message {
            Message::AlreadyAnswered => "This question is already answered.".to_owned(),
            Message::AnswerCorrect => "Correct!".to_owned(),
            Message::AnswerIncorrect(correct_answer) => {
                format!("Incorrect. The correct answer is: {}", correct_answer)
            }
            Message::AutoAdvance(remaining, percent) => format!(
                "{} Moving to next question in {} seconds...",
                progress_bar(*percent as f64 / 100.0),
                remaining.as_secs_f64().ceil() as u64
            ),
            Message::Explanation {
                explanation,
                topic,
                attribution,
            } => {
                let source = if attribution.is_empty() {
                    topic.clone()
                } else {
                    format!("{} ({})", topic, attribution)
                };
                format!("Explanation: {}\nSource: {}", explanation, source)
            }
            Message::Help => HELP.to_owned(),
            Message::LockedAnswer(choice) => format!("You answered: {}", choice),
            Message::NoProgress => "Start answering to see your stats!".to_owned(),
            Message::NoQuestions => "No questions available for this selection.".to_owned(),
            Message::NoSelection => "Please select an option first.".to_owned(),
            Message::ProgressReport(reports) => {
                let mut lines = vec!["Progress Report".to_owned()];
                for report in reports {
                    let percent = (report.accuracy * 100.0).round() as u32;
                    let flag = if percent >= self.pass_threshold {
                        ""
                    } else {
                        " (needs review)"
                    };
                    lines.push(format!(
                        "  {}: {}% ({}/{}) {}{}",
                        report.topic,
                        percent,
                        report.score.correct,
                        report.score.total,
                        progress_bar(report.accuracy),
                        flag
                    ));
                }
                lines.join("\n")
            }
            Message::ProgressReset => "Progress reset.".to_owned(),
            Message::QuestionBegins {
                position,
                total,
                question,
            } => {
                let mut lines = vec![
                    format!(
                        "Topic: {} | Question: {} of {}",
                        question.topic,
                        position + 1,
                        total
                    ),
                    progress_bar((position + 1) as f64 / *total as f64),
                    String::new(),
                    format!("Question {}", position + 1),
                    question.prompt.clone(),
                ];
                for (i, option) in question.options.iter().enumerate() {
                    lines.push(format!("  {}. {}", i + 1, option));
                }
                lines.join("\n")
            }
            Message::SetCompleted => {
                "You have completed all questions in this set! Type `restart` to go again."
                    .to_owned()
            }
            Message::TopicChanged(filter, count) => {
                format!("Studying {} ({} questions)", filter, count)
            }
            Message::Topics(topics) => {
                let mut lines = vec!["Topics:".to_owned()];
                for (topic, count) in topics {
                    lines.push(format!("  {} ({})", topic, count));
                }
                lines.join("\n")
            }
            Message::UnknownCommand(command) => {
                format!("Unknown command `{}`. Type `help` for a list of commands.", command)
            }
            Message::UnknownOption(choice) => format!("`{}` is not one of the options.", choice),
            Message::UnknownTopic(topic) => format!("There is no topic named `{}`.", topic),
        }
    }
}

impl QuizOutput for TerminalOutput {
    fn say(&self, message: &Message) {
        let text = self.render(message);
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{}", text).and_then(|_| writer.flush()) {
            log::error!("Could not write to terminal: {}", e);
        }
    }
}
