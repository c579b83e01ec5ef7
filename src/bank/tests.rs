use super::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn raw_question(prompt: &str, topic: Option<&str>) -> RawQuestion {
    RawQuestion {
        question: prompt.to_owned(),
        session: topic.map(|t| t.to_owned()),
        options: vec!["x".to_owned(), "y".to_owned()],
        correct_answer: "y".to_owned(),
        explanation: "because".to_owned(),
        faculty: "Dr. Example".to_owned(),
    }
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn assigns_ids_across_sources() {
    let bank = QuestionBank::from_sources(vec![
        vec![raw_question("a", Some("A")), raw_question("b", Some("A"))],
        vec![],
        vec![raw_question("c", Some("B"))],
    ]);
    let ids: Vec<usize> = bank.get_questions().iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(bank.get_questions()[2].prompt, "c");
}

#[test]
fn ids_are_stable_across_loads() {
    let sources = || vec![vec![raw_question("a", None), raw_question("b", Some("B"))]];
    let first = QuestionBank::from_sources(sources());
    let second = QuestionBank::from_sources(sources());
    assert_eq!(first.get_questions(), second.get_questions());
}

#[test]
fn missing_topic_gets_sentinel() {
    let bank = QuestionBank::from_sources(vec![vec![
        raw_question("a", None),
        raw_question("b", Some("   ")),
    ]]);
    assert!(bank.get_questions().iter().all(|q| q.topic == UNKNOWN_TOPIC));
}

#[test]
fn lists_sorted_unique_topics() {
    let bank = QuestionBank::from_sources(vec![vec![
        raw_question("a", Some("Renal")),
        raw_question("b", Some("Cardio")),
        raw_question("c", Some("Renal")),
    ]]);
    assert_eq!(bank.topics(), vec!["Cardio".to_owned(), "Renal".to_owned()]);
    assert_eq!(bank.count_for_topic("Renal"), 2);
    assert_eq!(bank.count_for_topic("Pulmonary"), 0);
}

#[test]
fn reads_json_with_missing_fields() {
    let json = r#"[
        {"id": 42, "question": "What?", "session": "Cardio", "options": ["a", "b"],
         "correct_answer": "a", "explanation": "Because", "faculty": "Dr. A"},
        {"prompt": "Who?", "options": ["c"], "correctAnswer": "c"}
    ]"#;
    let questions = read_json(json.as_bytes()).unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].session.as_deref(), Some("Cardio"));
    assert_eq!(questions[1].question, "Who?");
    assert_eq!(questions[1].correct_answer, "c");
    assert_eq!(questions[1].session, None);
    assert_eq!(questions[1].explanation, "");

    let bank = QuestionBank::from_sources(vec![questions]);
    assert_eq!(bank.get_questions()[0].id, 0);
    assert_eq!(bank.get_questions()[0].attribution, "Dr. A");
    assert_eq!(bank.get_questions()[1].topic, UNKNOWN_TOPIC);
}

#[test]
fn reads_csv_with_piped_options() {
    let csv = "question,session,options,correct_answer,explanation,faculty\n\
               What?,Renal,a | b|c,b,Because,Dr. B\n";
    let questions = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].options, vec!["a", "b", "c"]);
    assert_eq!(questions[0].session.as_deref(), Some("Renal"));
    assert_eq!(questions[0].faculty, "Dr. B");
}

#[test]
fn missing_file_is_an_empty_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("questions.json");
    let bank = QuestionBank::open(&[path]).unwrap();
    assert!(bank.is_empty());
}

#[test]
fn opens_files_by_extension() {
    let dir = TempDir::new().unwrap();
    let json = write_file(
        &dir,
        "bank.json",
        r#"[{"question": "One", "options": ["a"], "correct_answer": "a"}]"#,
    );
    let csv = write_file(
        &dir,
        "bank.csv",
        "question,options,correct_answer\nTwo,a|b,b\n",
    );
    let bank = QuestionBank::open(&[json, csv]).unwrap();
    assert_eq!(bank.len(), 2);
    assert_eq!(bank.get_questions()[1].prompt, "Two");
    assert_eq!(bank.get_questions()[1].id, 1);
}

#[test]
fn rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bank.txt", "whatever");
    assert!(QuestionBank::open(&[path]).is_err());
}

#[test]
fn null_fields_do_not_drop_the_file() {
    let json = r#"[
        {"session": "Renal", "question": "Where?", "options": ["a", null, "b"],
         "correct_answer": "a", "explanation": null, "faculty": null},
        {"session": null, "question": null, "options": null, "correct_answer": null},
        {"session": "Cardio", "question": "What?", "options": ["c", "d"],
         "correct_answer": "d", "explanation": "Because", "faculty": "Dr. C"}
    ]"#;
    let questions = read_json(json.as_bytes()).unwrap();
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].options, vec!["a", "b"]);
    assert_eq!(questions[0].explanation, "");
    assert_eq!(questions[0].faculty, "");
    assert_eq!(questions[1], RawQuestion::default());
    assert_eq!(questions[2].explanation, "Because");

    let bank = QuestionBank::from_sources(vec![questions]);
    assert_eq!(bank.get_questions()[1].topic, UNKNOWN_TOPIC);
    assert_eq!(bank.get_questions()[2].id, 2);
}

#[test]
fn both_field_names_in_one_record() {
    let json = r#"[{"question": "Kept", "prompt": "Ignored", "options": ["a"],
                    "correct_answer": "a", "faculty": "Dr. A", "attribution": "Ignored",
                    "topic": "Renal"}]"#;
    let questions = read_json(json.as_bytes()).unwrap();
    assert_eq!(questions[0].question, "Kept");
    assert_eq!(questions[0].faculty, "Dr. A");
    assert_eq!(questions[0].session.as_deref(), Some("Renal"));

    let csv = "prompt,topic,options,correctAnswer,attribution\nWhich?,Cardio,a|b,b,Dr. B\n";
    let questions = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(questions[0].question, "Which?");
    assert_eq!(questions[0].session.as_deref(), Some("Cardio"));
    assert_eq!(questions[0].correct_answer, "b");
    assert_eq!(questions[0].faculty, "Dr. B");
}

#[test]
fn audit_reports_data_issues() {
    let mut broken_key = raw_question("a", Some("A"));
    broken_key.correct_answer = "z".to_owned();
    let mut no_options = raw_question("b", Some("A"));
    no_options.options.clear();
    let mut duplicated = raw_question("", Some("A"));
    duplicated.options.push("x".to_owned());
    let bank = QuestionBank::from_sources(vec![vec![
        raw_question("fine", Some("A")),
        broken_key,
        no_options,
        duplicated,
    ]]);

    assert_eq!(
        bank.audit(),
        vec![
            DataIssue::MissingCorrectAnswer(1),
            DataIssue::NoOptions(2),
            DataIssue::EmptyPrompt(3),
            DataIssue::DuplicateOption(3, "x".to_owned()),
        ]
    );
}
