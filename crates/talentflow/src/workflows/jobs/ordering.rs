//! Drag-to-reorder: move one job to a new 1-based position and renumber the whole board.

use serde::Serialize;
use serde_json::Value;

use super::domain::{Job, JobId};
use crate::error::TalentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    pub from_order: u32,
    pub to_order: u32,
}

impl ReorderRequest {
    pub fn new(from_order: u32, to_order: u32) -> Result<Self, TalentError> {
        if from_order == 0 || to_order == 0 {
            return Err(TalentError::validation(
                "fromOrder and toOrder must be positive integers",
            ));
        }
        Ok(Self {
            from_order,
            to_order,
        })
    }

    /// Decodes `{ "fromOrder": n, "toOrder": m }` without trusting the client's types.
    pub fn from_json(body: &Value) -> Result<Self, TalentError> {
        let from_order = positive_integer(body, "fromOrder")?;
        let to_order = positive_integer(body, "toOrder")?;
        Self::new(from_order, to_order)
    }
}

fn positive_integer(body: &Value, field: &str) -> Result<u32, TalentError> {
    body.get(field)
        .and_then(Value::as_u64)
        .filter(|value| *value > 0)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| TalentError::validation(format!("{field} must be a positive integer")))
}

/// New position of one job after a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAssignment {
    pub job_id: JobId,
    pub order: u32,
}

/// Removes `moved` from the order-sorted board, reinserts it at `to_order - 1` (clamped to the
/// end) and numbers every job by its new index. Returns `None` when the job is absent.
pub fn reposition(jobs: &[Job], moved: &JobId, to_order: u32) -> Option<Vec<OrderAssignment>> {
    let mut board: Vec<&Job> = jobs.iter().collect();
    board.sort_by_key(|job| job.order);

    let index = board.iter().position(|job| &job.id == moved)?;
    let job = board.remove(index);
    let target = usize::try_from(to_order.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .min(board.len());
    board.insert(target, job);

    Some(
        board
            .into_iter()
            .zip(1u32..)
            .map(|(job, order)| OrderAssignment {
                job_id: job.id.clone(),
                order,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::jobs::domain::JobStatus;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn job(id: &str, order: u32) -> Job {
        Job {
            id: JobId::from(id),
            title: id.to_string(),
            slug: id.to_string(),
            status: JobStatus::Active,
            order,
            tags: BTreeSet::new(),
            description: String::new(),
            salary: None,
            attachments: Vec::new(),
            start_date: None,
            end_date: None,
            assessment_date: None,
            assessment_duration: None,
        }
    }

    fn sequence(plan: &[OrderAssignment]) -> Vec<&str> {
        plan.iter().map(|a| a.job_id.as_str()).collect()
    }

    #[test]
    fn moves_job_down_and_renumbers_densely() {
        let jobs = vec![job("a", 1), job("b", 2), job("c", 3), job("d", 4)];
        let plan = reposition(&jobs, &JobId::from("a"), 3).expect("job present");
        assert_eq!(sequence(&plan), vec!["b", "c", "a", "d"]);
        let orders: Vec<u32> = plan.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn moves_job_up_from_unsorted_input() {
        let jobs = vec![job("c", 3), job("a", 1), job("d", 4), job("b", 2)];
        let plan = reposition(&jobs, &JobId::from("d"), 1).expect("job present");
        assert_eq!(sequence(&plan), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn target_past_the_end_appends() {
        let jobs = vec![job("a", 1), job("b", 2), job("c", 3)];
        let plan = reposition(&jobs, &JobId::from("a"), 99).expect("job present");
        assert_eq!(sequence(&plan), vec!["b", "c", "a"]);
    }

    #[test]
    fn missing_job_yields_none() {
        let jobs = vec![job("a", 1)];
        assert!(reposition(&jobs, &JobId::from("zzz"), 1).is_none());
    }

    #[test]
    fn request_body_requires_positive_integers() {
        let ok = ReorderRequest::from_json(&json!({ "fromOrder": 2, "toOrder": 5 }));
        assert_eq!(
            ok.expect("valid body"),
            ReorderRequest {
                from_order: 2,
                to_order: 5
            }
        );

        for body in [
            json!({ "fromOrder": "2", "toOrder": 5 }),
            json!({ "fromOrder": 0, "toOrder": 5 }),
            json!({ "fromOrder": 2, "toOrder": -1 }),
            json!({ "fromOrder": 2.5, "toOrder": 1 }),
            json!({ "toOrder": 1 }),
        ] {
            assert!(
                matches!(ReorderRequest::from_json(&body), Err(TalentError::Validation(_))),
                "body {body} should be rejected"
            );
        }
    }
}
