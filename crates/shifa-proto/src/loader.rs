//! PageLoader: owns the current page and decides which responses may land.
//!
//! Every `begin` bumps a generation counter. A completion is applied only
//! if it carries the latest generation and the loader has not been closed,
//! so a slow response for page 2 can never overwrite page 3.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::client::FetchError;
use crate::pagination::{self, PageRequest};

/// Handle for one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: PageRequest,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued after this one.
    Stale,
    /// The loader was closed (view torn down).
    Discarded,
}

#[derive(Debug)]
pub struct PageLoader<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    request: Option<PageRequest>,
    fetched_at: Option<DateTime<Local>>,
    closed: bool,
}

impl<T> PageLoader<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            request: None,
            fetched_at: None,
            closed: false,
        }
    }

    /// Register a new request; any earlier in-flight request becomes stale.
    pub fn begin(&mut self, request: PageRequest) -> Ticket {
        self.generation += 1;
        self.loading = true;
        self.request = Some(request);
        debug!(
            "[loader] begin gen={} page={} size={}",
            self.generation, request.page_index, request.page_size
        );
        Ticket {
            generation: self.generation,
            request,
        }
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<T>, FetchError>) -> Completion {
        if self.closed {
            debug!("[loader] gen={} discarded after close", ticket.generation);
            return Completion::Discarded;
        }
        if ticket.generation != self.generation {
            debug!(
                "[loader] gen={} stale (latest={})",
                ticket.generation, self.generation
            );
            return Completion::Stale;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                self.fetched_at = Some(Local::now());
            }
            Err(e) => {
                self.items.clear();
                self.error = Some(e.user_message().to_string());
            }
        }
        self.loading = false;
        Completion::Applied
    }

    /// Tear down: later completions are ignored.
    pub fn close(&mut self) {
        self.closed = true;
        self.loading = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn request(&self) -> Option<PageRequest> {
        self.request
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    /// True when the latest load succeeded and returned nothing.
    pub fn is_end_of_data(&self) -> bool {
        !self.loading
            && self.error.is_none()
            && self.fetched_at.is_some()
            && pagination::is_end_of_data(&self.items)
    }
}

impl<T> Default for PageLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FETCH_ERROR_MESSAGE;

    fn req(page_index: usize) -> PageRequest {
        PageRequest {
            page_index,
            page_size: 3,
        }
    }

    #[test]
    fn success_replaces_page_wholesale() {
        let mut loader = PageLoader::new();
        let t = loader.begin(req(0));
        assert!(loader.is_loading());
        assert_eq!(loader.complete(t, Ok(vec![1, 2, 3])), Completion::Applied);
        assert_eq!(loader.items(), &[1, 2, 3]);

        let t = loader.begin(req(1));
        assert_eq!(loader.complete(t, Ok(vec![4])), Completion::Applied);
        assert_eq!(loader.items(), &[4]);
        assert!(!loader.is_loading());
        assert!(loader.fetched_at().is_some());
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut loader = PageLoader::new();
        let slow = loader.begin(req(1));
        let fast = loader.begin(req(2));

        assert_eq!(loader.complete(fast, Ok(vec![20, 21])), Completion::Applied);
        assert_eq!(loader.complete(slow, Ok(vec![10, 11])), Completion::Stale);
        assert_eq!(loader.items(), &[20, 21]);
        assert_eq!(loader.request(), Some(req(2)));
    }

    #[test]
    fn stale_response_does_not_clear_loading_of_newer_request() {
        let mut loader: PageLoader<u8> = PageLoader::new();
        let old = loader.begin(req(0));
        let _new = loader.begin(req(1));
        assert_eq!(loader.complete(old, Ok(vec![1])), Completion::Stale);
        assert!(loader.is_loading());
        assert!(loader.items().is_empty());
    }

    #[test]
    fn failure_clears_page_and_sets_generic_message() {
        let mut loader = PageLoader::new();
        let t = loader.begin(req(0));
        loader.complete(t, Ok(vec![1, 2]));

        let t = loader.begin(req(1));
        assert_eq!(
            loader.complete(t, Err(FetchError::Status(502))),
            Completion::Applied
        );
        assert!(loader.items().is_empty());
        assert_eq!(loader.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(!loader.is_loading());

        let t = loader.begin(req(1));
        loader.complete(t, Ok(vec![3]));
        assert_eq!(loader.error(), None);
    }

    #[test]
    fn completions_after_close_are_discarded() {
        let mut loader = PageLoader::new();
        let t = loader.begin(req(0));
        loader.close();
        assert_eq!(loader.complete(t, Ok(vec![9])), Completion::Discarded);
        assert!(loader.items().is_empty());
        assert!(!loader.is_loading());
        assert!(loader.is_closed());
    }

    #[test]
    fn empty_successful_page_is_end_of_data() {
        let mut loader: PageLoader<u8> = PageLoader::new();
        assert!(!loader.is_end_of_data());
        let t = loader.begin(req(4));
        loader.complete(t, Ok(Vec::new()));
        assert!(loader.is_end_of_data());
    }
}
