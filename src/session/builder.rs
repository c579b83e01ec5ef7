use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::Question;
use crate::session::TopicFilter;

/// Builds a fresh working set: owned copies of the matching questions, in random order,
/// each with its options in random order. The bank itself is left untouched.
pub fn build<R: Rng + ?Sized>(bank: &[Question], filter: &TopicFilter, rng: &mut R) -> Vec<Question> {
    let mut working_set: Vec<Question> = bank
        .iter()
        .filter(|q| filter.matches(q))
        .cloned()
        .collect();
    reshuffle(&mut working_set, rng);
    working_set
}

pub fn reshuffle<R: Rng + ?Sized>(working_set: &mut [Question], rng: &mut R) {
    working_set.shuffle(rng);
    for question in working_set.iter_mut() {
        question.options.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{QuestionBank, RawQuestion};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank() -> QuestionBank {
        let topics = ["A", "B", "A", "C", "A", "B"];
        let questions = topics
            .iter()
            .enumerate()
            .map(|(i, topic)| RawQuestion {
                question: format!("question {}", i),
                session: Some(topic.to_string()),
                options: (0..5).map(|o| format!("option {}-{}", i, o)).collect(),
                correct_answer: format!("option {}-0", i),
                ..Default::default()
            })
            .collect();
        QuestionBank::from_sources(vec![questions])
    }

    #[test]
    fn filters_by_topic() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        let working_set = build(bank.get_questions(), &TopicFilter::topic("A"), &mut rng);
        assert_eq!(working_set.len(), 3);
        assert!(working_set.iter().all(|q| q.topic == "A"));
    }

    #[test]
    fn all_keeps_every_question() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        let working_set = build(bank.get_questions(), &TopicFilter::All, &mut rng);
        let mut ids: Vec<usize> = working_set.iter().map(|q| q.id).collect();
        ids.sort();
        assert_eq!(ids, (0..bank.len()).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_topic_builds_empty_set() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        let working_set = build(bank.get_questions(), &TopicFilter::topic("Z"), &mut rng);
        assert!(working_set.is_empty());
    }

    #[test]
    fn options_are_permuted_not_changed() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(3);
        let working_set = build(bank.get_questions(), &TopicFilter::All, &mut rng);
        for question in &working_set {
            let original = &bank.get_questions()[question.id];
            let mut shuffled = question.options.clone();
            let mut expected = original.options.clone();
            shuffled.sort();
            expected.sort();
            assert_eq!(shuffled, expected);
            assert_eq!(question.correct_answer, original.correct_answer);
        }
    }

    #[test]
    fn does_not_touch_bank() {
        let bank = bank();
        let before = bank.get_questions().clone();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            build(bank.get_questions(), &TopicFilter::All, &mut rng);
        }
        assert_eq!(&before, bank.get_questions());
    }

    #[test]
    fn shuffles_question_order() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(5);
        let original_order: Vec<usize> = bank.get_questions().iter().map(|q| q.id).collect();
        let reordered = (0..20).any(|_| {
            let working_set = build(bank.get_questions(), &TopicFilter::All, &mut rng);
            working_set.iter().map(|q| q.id).collect::<Vec<_>>() != original_order
        });
        assert!(reordered);
    }
}
