use lazy_static::lazy_static;
use regex::Regex;
use unidecode::unidecode;


lazy_static! {
    static ref COMMAND_REGEX: Regex = Regex::new(r"^(?P<keyword>\S+)(?:\s+(?P<argument>.*))?$").unwrap();
    static ref FORBIDDEN_TOPIC_CHARACTERS_REGEX: Regex = Regex::new("[^a-z0-9]").unwrap();
}

/// Lowercase ascii letters and digits only, so `Cardio-Vascular` and `cardiovascular`
/// name the same topic.
pub fn sanitize_topic(topic: &str) -> String {
    let topic = unidecode(topic);
    FORBIDDEN_TOPIC_CHARACTERS_REGEX
        .replace_all(&topic.to_lowercase(), "")
        .into()
}

/// Finds the topic the learner meant. An exact label wins over a sanitized match.
pub fn match_topic<'a>(input: &str, topics: &'a [String]) -> Option<&'a String> {
    let input = input.trim();
    if let Some(topic) = topics.iter().find(|t| t.as_str() == input) {
        return Some(topic);
    }
    let sanitized_input = sanitize_topic(input);
    if sanitized_input.is_empty() {
        return None;
    }
    topics.iter().find(|t| sanitize_topic(t) == sanitized_input)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicChoice {
    All,
    Named(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Answer(Option<String>),
    Back,
    Help,
    Next,
    Quit,
    Reset,
    Restart,
    Skip,
    Stats,
    Topic(TopicChoice),
    Topics,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if line.parse::<usize>().is_ok() {
            return Some(Command::Answer(Some(line.to_owned())));
        }

        let captures = COMMAND_REGEX.captures(line)?;
        let keyword = captures.name("keyword")?.as_str().to_lowercase();
        let argument = captures
            .name("argument")
            .map(|a| a.as_str().trim().to_owned())
            .filter(|a| !a.is_empty());

        let command = match (keyword.as_str(), argument) {
            ("answer", argument) | ("check", argument) => Command::Answer(argument),
            ("back", None) | ("b", None) => Command::Back,
            ("help", None) | ("?", None) => Command::Help,
            ("next", None) | ("n", None) => Command::Next,
            ("quit", None) | ("q", None) | ("exit", None) => Command::Quit,
            ("reset", None) => Command::Reset,
            ("restart", None) => Command::Restart,
            ("skip", None) | ("s", None) => Command::Skip,
            ("stats", None) => Command::Stats,
            ("topics", None) => Command::Topics,
            ("topic", Some(name)) => {
                if name.eq_ignore_ascii_case("all") {
                    Command::Topic(TopicChoice::All)
                } else {
                    Command::Topic(TopicChoice::Named(name))
                }
            }
            ("topic", None) => Command::Topics,
            _ => Command::Unknown(line.to_owned()),
        };
        Some(command)
    }
}
