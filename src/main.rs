use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use rand::Rng;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use quiz_review::bank::QuestionBank;
use quiz_review::commands::{match_topic, Command};
use quiz_review::drill::Drill;
use quiz_review::output::terminal::TerminalOutput;
use quiz_review::output::QuizOutput;
use quiz_review::session::{Session, TopicFilter};
use quiz_review::settings::Settings;

#[derive(Debug, Default)]
struct Arguments {
    bank_paths: Vec<PathBuf>,
    topic: Option<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Arguments> {
    let mut arguments = Arguments::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--topic" | "-t" => {
                let topic = args.next().context("Expected a topic name after --topic")?;
                arguments.topic = Some(topic);
            }
            flag if flag.starts_with('-') => return Err(anyhow!("Unknown flag `{}`", flag)),
            _ => arguments.bank_paths.push(PathBuf::from(arg)),
        }
    }
    Ok(arguments)
}

fn initial_filter(bank: &QuestionBank, topic: Option<&str>) -> TopicFilter {
    let topic = match topic {
        Some(topic) if !topic.eq_ignore_ascii_case("all") => topic,
        _ => return TopicFilter::All,
    };
    match match_topic(topic, &bank.topics()) {
        Some(topic) => TopicFilter::Topic(topic.clone()),
        None => {
            warn!("No topic named `{}`, studying all topics", topic);
            TopicFilter::All
        }
    }
}

fn run() -> Result<()> {
    let mut settings = Settings::load()?;
    let arguments = parse_args(std::env::args().skip(1))?;
    if !arguments.bank_paths.is_empty() {
        settings.bank_paths = arguments.bank_paths.clone();
    }

    let bank = QuestionBank::open(&settings.bank_paths)?;
    for issue in bank.audit() {
        warn!("{}", issue);
    }
    info!(
        "Question bank ready: {} questions across {} topics",
        bank.len(),
        bank.topics().len()
    );

    let filter = initial_filter(&bank, arguments.topic.as_deref());
    let session = Session::new(Arc::new(bank), filter);
    let output = TerminalOutput::new(settings.pass_threshold);
    let tick_interval = settings.tick_interval;
    let mut drill = Drill::new(session, settings, output);
    drill.begin();

    drive(&mut drill, &spawn_stdin_reader(), tick_interval)
}

/// Stdin is read on its own thread so that commands typed during an auto-advance
/// countdown reach the drill (and can cancel it) instead of waiting for it to finish.
fn spawn_stdin_reader() -> Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn drive<O: QuizOutput, R: Rng>(
    drill: &mut Drill<O, R>,
    lines: &Receiver<io::Result<String>>,
    tick_interval: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    while !drill.is_over() {
        let line = if drill.is_waiting() {
            match lines.recv_timeout(tick_interval) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match lines.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            }
        };

        let now = Instant::now();
        drill.tick(now - last_tick);
        last_tick = now;

        if let Some(line) = line {
            let line = line.context("Could not read from terminal")?;
            if let Some(command) = Command::parse(&line) {
                drill.handle(command);
            }
        }
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
