use std::collections::BTreeSet;

use serde::Serialize;

use super::super::domain::{Answer, Question, QuestionKind};

/// Per-question grading result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Correct,
    Incorrect,
    /// Answered, but nothing to compare against.
    Ungraded,
    Skipped,
}

impl Correctness {
    pub fn is_attempted(self) -> bool {
        !matches!(self, Correctness::Skipped)
    }
}

const AFFIRMATIVE: &str = "Yes";

/// Grades one answer.
///
/// A question with an answer key is judged against the key whether or not it carries marks.
/// Without a key, a single-choice question offering `Yes` treats `Yes` as the correct answer.
/// Everything else that was answered is ungraded.
pub(crate) fn grade(question: &Question, answer: Option<&Answer>) -> Correctness {
    let answer = match answer {
        Some(answer) if !answer.is_blank() => answer,
        _ => return Correctness::Skipped,
    };

    if let Some(correct) = match_key(&question.kind, answer) {
        return verdict(correct);
    }

    match &question.kind {
        QuestionKind::SingleChoice { options, .. }
            if options.iter().any(|option| option == AFFIRMATIVE) =>
        {
            verdict(single_value(answer) == Some(AFFIRMATIVE))
        }
        _ => Correctness::Ungraded,
    }
}

fn verdict(correct: bool) -> Correctness {
    if correct {
        Correctness::Correct
    } else {
        Correctness::Incorrect
    }
}

/// `None` when the question carries no key to compare against.
fn match_key(kind: &QuestionKind, answer: &Answer) -> Option<bool> {
    match kind {
        QuestionKind::SingleChoice {
            correct_option: Some(key),
            ..
        } => Some(single_value(answer) == Some(key.as_str())),
        QuestionKind::MultiChoice {
            correct_options: Some(keys),
            ..
        } => {
            let expected: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
            Some(chosen(answer).map_or(false, |given| given == expected))
        }
        QuestionKind::Numeric {
            correct_value: Some(key),
            ..
        } => Some(numeric_value(answer) == Some(*key)),
        _ => None,
    }
}

fn single_value(answer: &Answer) -> Option<&str> {
    match answer {
        Answer::Text(text) => Some(text.as_str()),
        Answer::Choices(values) if values.len() == 1 => values.first().map(String::as_str),
        _ => None,
    }
}

fn chosen(answer: &Answer) -> Option<BTreeSet<&str>> {
    match answer {
        Answer::Choices(values) => Some(values.iter().map(String::as_str).collect()),
        Answer::Text(text) => Some(std::iter::once(text.as_str()).collect()),
        _ => None,
    }
}

fn numeric_value(answer: &Answer) -> Option<f64> {
    match answer {
        Answer::Number(value) => Some(*value),
        Answer::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}
