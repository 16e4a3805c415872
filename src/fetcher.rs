//! Bounded-concurrency fetch of the paginated canteen listing.
//!
//! OpenMensa only advertises how many pages exist through the `X-Total-Pages`
//! header of each page response. Page 1 is therefore requested on its own;
//! once it reveals the total, pages 2 through the total are fetched with at
//! most `concurrency` requests in flight. No page past the total is issued.
//!
//! Results are buffered per page and concatenated in ascending page order, no
//! matter in which order responses arrive. The first failing page aborts the
//! whole fetch: outstanding tasks are cancelled and no partial listing is
//! returned.

use crate::error::{MensaError, Result};
use crate::models::{Canteen, CanteenPage};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of simultaneous page requests
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Aggregation state for one listing fetch.
///
/// Build a fresh fetcher per call; nothing is shared between fetches.
pub struct PageFetcher {
    slots: Arc<Semaphore>,
    next_page: u32,
    total_pages: Option<u32>,
    pages: BTreeMap<u32, Vec<Canteen>>,
}

impl PageFetcher {
    /// Create a fetcher allowing `concurrency` pages in flight (at least one).
    pub fn new(concurrency: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(concurrency.max(1))),
            next_page: 1,
            total_pages: None,
            pages: BTreeMap::new(),
        }
    }

    /// Fetch every page through `source` and return the canteens in page order.
    ///
    /// `source` is called once per page number, starting at 1.
    pub async fn fetch_all<F, Fut>(mut self, source: F) -> Result<Vec<Canteen>>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = Result<CanteenPage>> + Send + 'static,
    {
        let mut tasks: JoinSet<(u32, Result<CanteenPage>)> = JoinSet::new();

        while !self.all_issued() {
            tokio::select! {
                biased;

                Some(joined) = tasks.join_next() => {
                    self.collect(joined?)?;
                }
                permit = self.slots.clone().acquire_owned(), if self.may_issue() => {
                    let permit = permit.map_err(|e| {
                        MensaError::Validation(format!("page slot pool closed: {}", e))
                    })?;
                    let page = self.next_page;
                    self.next_page += 1;

                    tracing::debug!(page, "requesting canteen page");
                    let request = source(page);
                    tasks.spawn(async move {
                        let result = request.await;
                        drop(permit);
                        (page, result)
                    });
                }
                else => break,
            }
        }

        while let Some(joined) = tasks.join_next().await {
            self.collect(joined?)?;
        }

        self.finish()
    }

    /// True once every page up to the advertised total has been issued.
    fn all_issued(&self) -> bool {
        match self.total_pages {
            Some(total) => self.next_page > total,
            None => false,
        }
    }

    /// Until the total is known only page 1 may be outstanding.
    fn may_issue(&self) -> bool {
        self.total_pages.is_some() || self.next_page == 1
    }

    fn in_range(&self, page: u32) -> bool {
        self.total_pages.is_none_or(|total| page <= total)
    }

    fn collect(&mut self, (page, result): (u32, Result<CanteenPage>)) -> Result<()> {
        match result {
            Ok(listing) => {
                if !self.in_range(page) {
                    tracing::debug!(page, "discarding page past the end of the listing");
                    return Ok(());
                }
                tracing::debug!(
                    page,
                    count = listing.canteens.len(),
                    total_pages = listing.total_pages,
                    "received canteen page"
                );
                self.total_pages = Some(listing.total_pages);
                if page <= listing.total_pages {
                    self.pages.insert(page, listing.canteens);
                }
                Ok(())
            }
            Err(e) if !self.in_range(page) => {
                tracing::debug!(page, error = %e, "ignoring failure past the end of the listing");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "canteen page failed, aborting listing");
                Err(e)
            }
        }
    }

    fn finish(mut self) -> Result<Vec<Canteen>> {
        let total = self.total_pages.unwrap_or(0);
        let mut canteens = Vec::new();
        for page in 1..=total {
            let listing = self
                .pages
                .remove(&page)
                .ok_or(MensaError::MissingPage(page))?;
            canteens.extend(listing);
        }
        Ok(canteens)
    }
}
