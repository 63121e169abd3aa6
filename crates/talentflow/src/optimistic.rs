//! Client-side optimistic mutation: show the change immediately, roll it back when the
//! server refuses, and always re-synchronize with the authoritative listing afterwards.

use std::future::Future;

use tracing::{debug, warn};

use crate::workflows::jobs::Job;
use crate::workflows::PageRequest;

/// A locally held view of server state.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticView<T> {
    current: T,
}

impl<T> OptimisticView<T>
where
    T: Clone,
{
    pub fn new(initial: T) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Applies `change` locally, sends the request, restores the snapshot if the request
    /// fails, then replaces the view with whatever `resync` returns. The dispatch result is
    /// returned; a failed resync keeps the local view.
    pub async fn mutate<E, Change, Dispatch, DispatchFut, Resync, ResyncFut>(
        &mut self,
        change: Change,
        dispatch: Dispatch,
        resync: Resync,
    ) -> Result<(), E>
    where
        E: std::fmt::Display,
        Change: FnOnce(&mut T),
        Dispatch: FnOnce() -> DispatchFut,
        DispatchFut: Future<Output = Result<(), E>>,
        Resync: FnOnce() -> ResyncFut,
        ResyncFut: Future<Output = Result<T, E>>,
    {
        let snapshot = self.current.clone();
        change(&mut self.current);

        let outcome = dispatch().await;
        if let Err(err) = &outcome {
            warn!(error = %err, "optimistic change rejected, restoring snapshot");
            self.current = snapshot;
        }

        match resync().await {
            Ok(fresh) => {
                debug!("view re-synchronized");
                self.current = fresh;
            }
            Err(err) => warn!(error = %err, "re-synchronization failed"),
        }
        outcome
    }
}

/// Moves the job at board position `from_order` to `to_order` within the visible page and
/// renumbers the page as `(page - 1) * page_size + index + 1`.
///
/// Returns false (leaving `jobs` untouched) when no visible job holds `from_order`.
pub fn move_job(jobs: &mut Vec<Job>, page: PageRequest, from_order: u32, to_order: u32) -> bool {
    let Some(from) = jobs.iter().position(|job| job.order == from_order) else {
        return false;
    };
    let offset = (page.page - 1).saturating_mul(page.page_size);
    let job = jobs.remove(from);
    let target = usize::try_from(to_order)
        .unwrap_or(usize::MAX)
        .saturating_sub(offset + 1)
        .min(jobs.len());
    jobs.insert(target, job);

    for (index, job) in jobs.iter_mut().enumerate() {
        job.order = u32::try_from(offset + index + 1).unwrap_or(u32::MAX);
    }
    true
}
