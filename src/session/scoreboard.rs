use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopicScore {
    pub correct: u32,
    pub total: u32,
}

impl TopicScore {
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopicReport {
    pub topic: String,
    pub score: TopicScore,
    pub accuracy: f64,
}

/// Per-topic answer counters. Counters only ever go up, until `reset`.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    scores: BTreeMap<String, TopicScore>,
}

impl Scoreboard {
    pub fn record(&mut self, topic: &str, is_correct: bool) {
        let score = self.scores.entry(topic.to_owned()).or_default();
        score.total += 1;
        if is_correct {
            score.correct += 1;
        }
    }

    pub fn get(&self, topic: &str) -> Option<TopicScore> {
        self.scores.get(topic).copied()
    }

    pub fn accuracy(&self, topic: &str) -> Option<f64> {
        self.scores.get(topic).and_then(|s| s.accuracy())
    }

    /// Topics with at least one answer, sorted by name.
    pub fn report(&self) -> Vec<TopicReport> {
        self.scores
            .iter()
            .filter_map(|(topic, score)| {
                score.accuracy().map(|accuracy| TopicReport {
                    topic: topic.clone(),
                    score: *score,
                    accuracy,
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(|s| s.total == 0)
    }

    pub fn reset(&mut self) {
        self.scores.clear();
    }
}
