//! Assessment scoring: grade each question, then aggregate counts and marks.

mod rules;

pub use rules::Correctness;

use serde::Serialize;

use super::domain::{Answers, Assessment, QuestionId, ScoreSummary};

/// Grading of one question, kept for audits and the demo output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuestion {
    pub question_id: QuestionId,
    pub outcome: Correctness,
    pub marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringOutcome {
    pub summary: ScoreSummary,
    pub graded: Vec<GradedQuestion>,
}

/// Scores `answers` against every question of `assessment`. Answers keyed by unknown
/// question ids are ignored. Negative totals are reported as-is.
pub fn score(assessment: &Assessment, answers: &Answers) -> ScoringOutcome {
    let mut summary = ScoreSummary::zero();
    let mut graded = Vec::new();

    for question in assessment.questions() {
        let outcome = rules::grade(question, answers.get(question.id.as_str()));
        let awarded = match outcome {
            Correctness::Correct if question.marking.has_marks => question.marking.marks_correct,
            Correctness::Incorrect if question.marking.has_marks => {
                question.marking.marks_incorrect
            }
            _ => 0.0,
        };

        match outcome {
            Correctness::Correct => summary.correct += 1,
            Correctness::Incorrect => summary.incorrect += 1,
            Correctness::Ungraded => {}
            Correctness::Skipped => summary.skipped += 1,
        }
        if outcome.is_attempted() {
            summary.attempted += 1;
        }
        summary.marks += awarded;

        graded.push(GradedQuestion {
            question_id: question.id.clone(),
            outcome,
            marks: awarded,
        });
    }

    ScoringOutcome { summary, graded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessments::domain::{
        Answer, Marking, Question, QuestionKind, Section, SectionId,
    };
    use crate::workflows::jobs::JobId;

    fn marked(id: &str, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId::from(id),
            label: id.to_string(),
            required: true,
            kind,
            marking: Marking {
                has_marks: true,
                marks_correct: 2.0,
                marks_incorrect: -0.5,
            },
        }
    }

    fn single(key: Option<&str>) -> QuestionKind {
        QuestionKind::SingleChoice {
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_option: key.map(str::to_string),
        }
    }

    fn assessment(questions: Vec<Question>) -> Assessment {
        Assessment {
            job_id: JobId::from("job-1"),
            sections: vec![Section {
                id: SectionId::from("s1"),
                title: "Core".to_string(),
                questions,
            }],
        }
    }

    fn answers(pairs: &[(&str, Answer)]) -> Answers {
        pairs
            .iter()
            .map(|(id, answer)| (id.to_string(), answer.clone()))
            .collect()
    }

    #[test]
    fn single_choice_key_awards_and_penalizes() {
        let assessment = assessment(vec![marked("q", single(Some("B")))]);

        let right = score(&assessment, &answers(&[("q", Answer::text("B"))])).summary;
        assert_eq!((right.correct, right.attempted, right.marks), (1, 1, 2.0));

        let wrong = score(&assessment, &answers(&[("q", Answer::text("A"))])).summary;
        assert_eq!((wrong.incorrect, wrong.attempted, wrong.marks), (1, 1, -0.5));

        let skipped = score(&assessment, &Answers::new()).summary;
        assert_eq!(
            (skipped.skipped, skipped.attempted, skipped.marks),
            (1, 0, 0.0)
        );
    }

    #[test]
    fn multi_choice_compares_as_sets() {
        let assessment = assessment(vec![marked(
            "q",
            QuestionKind::MultiChoice {
                options: vec!["Heap".into(), "Stack".into(), "Queue".into()],
                correct_options: Some(vec!["Heap".into(), "Queue".into()]),
            },
        )]);

        let reordered = score(
            &assessment,
            &answers(&[("q", Answer::choices(&["Queue", "Heap"]))]),
        );
        assert_eq!(reordered.graded[0].outcome, Correctness::Correct);

        let partial = score(&assessment, &answers(&[("q", Answer::choices(&["Heap"]))]));
        assert_eq!(partial.graded[0].outcome, Correctness::Incorrect);
    }

    #[test]
    fn numeric_key_accepts_numbers_and_numeric_text() {
        let assessment = assessment(vec![marked(
            "q",
            QuestionKind::Numeric {
                min: Some(0.0),
                max: Some(100.0),
                correct_value: Some(31.0),
            },
        )]);
        for answer in [Answer::Number(31.0), Answer::text(" 31 ")] {
            let outcome = score(&assessment, &answers(&[("q", answer)]));
            assert_eq!(outcome.graded[0].outcome, Correctness::Correct);
        }
    }

    #[test]
    fn yes_no_heuristic_applies_without_key() {
        let mut question = marked(
            "q",
            QuestionKind::SingleChoice {
                options: vec!["Yes".into(), "No".into()],
                correct_option: None,
            },
        );
        question.marking.has_marks = false;
        let assessment = assessment(vec![question]);

        let yes = score(&assessment, &answers(&[("q", Answer::text("Yes"))]));
        assert_eq!(yes.summary.correct, 1);
        assert_eq!(yes.summary.marks, 0.0);

        let no = score(&assessment, &answers(&[("q", Answer::text("No"))]));
        assert_eq!(no.summary.incorrect, 1);
    }

    #[test]
    fn key_outranks_yes_heuristic_on_unmarked_question() {
        let mut question = marked(
            "q",
            QuestionKind::SingleChoice {
                options: vec!["Yes".into(), "No".into()],
                correct_option: Some("No".to_string()),
            },
        );
        question.marking.has_marks = false;
        let assessment = assessment(vec![question]);

        let yes = score(&assessment, &answers(&[("q", Answer::text("Yes"))]));
        assert_eq!(yes.graded[0].outcome, Correctness::Incorrect);
        assert_eq!((yes.summary.correct, yes.summary.incorrect), (0, 1));
        assert_eq!(yes.summary.marks, 0.0);

        let no = score(&assessment, &answers(&[("q", Answer::text("No"))]));
        assert_eq!(no.graded[0].outcome, Correctness::Correct);
        assert_eq!(no.summary.marks, 0.0);
    }

    #[test]
    fn free_text_is_attempted_but_ungraded() {
        let mut essay = marked("essay", QuestionKind::LongText { max_length: None });
        essay.marking = Marking::default();
        let assessment = assessment(vec![essay, marked("q", single(None))]);

        let summary = score(
            &assessment,
            &answers(&[
                ("essay", Answer::text("I like trees")),
                ("q", Answer::text("   ")),
                ("unknown", Answer::text("ignored")),
            ]),
        )
        .summary;

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.correct + summary.incorrect, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn counts_always_partition_the_questions() {
        let assessment = assessment(vec![
            marked("a", single(Some("A"))),
            marked("b", single(Some("B"))),
            marked("c", single(None)),
            marked("d", single(Some("C"))),
        ]);
        let summary = score(
            &assessment,
            &answers(&[
                ("a", Answer::text("A")),
                ("b", Answer::text("C")),
                ("c", Answer::text("A")),
            ]),
        )
        .summary;

        assert_eq!(summary.attempted + summary.skipped, 4);
        assert!(summary.correct + summary.incorrect <= summary.attempted);
        assert_eq!(summary.marks, 1.5);
    }
}
