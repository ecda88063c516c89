//! Per-session browsing state.
//!
//! Remembers where the user was in the list (page position and active
//! filter) so that list -> edit -> back, and list -> delete -> back, land
//! on the same page with the same filter. Each browser session owns one
//! [`BrowseState`]; the API layer loads it by session id, applies one
//! transition per request and stores it again.

use crate::criteria::FilterCriteria;
use crate::pagination::PageRequest;

/// Where to send the browser after a create, update, delete or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTarget {
    /// The unfiltered list, at its stored position.
    List,
    /// The filtered list at this page.
    Query(PageRequest),
}

impl ReturnTarget {
    /// Path (with query string) to redirect to.
    pub fn location(&self) -> String {
        match self {
            ReturnTarget::List => "/todo".to_string(),
            ReturnTarget::Query(page) => {
                format!("/todo/query?page={}&size={}", page.page, page.size)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    prev_page: Option<PageRequest>,
    criteria: FilterCriteria,
    return_page: Option<PageRequest>,
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prev_page(&self) -> Option<&PageRequest> {
        self.prev_page.as_ref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn return_page(&self) -> Option<&PageRequest> {
        self.return_page.as_ref()
    }

    /// Visit the unfiltered list.
    ///
    /// An explicitly requested page is stored and used. Without one, the
    /// stored position is reused; on the very first visit `default` is
    /// adopted and stored. The active filter is cleared and any pending
    /// return page dropped.
    pub fn enter_list(
        &mut self,
        requested: Option<PageRequest>,
        default: PageRequest,
    ) -> PageRequest {
        let page = requested.or(self.prev_page).unwrap_or(default);
        self.prev_page = Some(page);
        self.criteria = FilterCriteria::default();
        self.return_page = None;
        page
    }

    /// Re-display the filtered list using the stored filter.
    ///
    /// The page shown becomes the stored position and the page to return
    /// to after editing.
    pub fn enter_query(
        &mut self,
        requested: Option<PageRequest>,
        default: PageRequest,
    ) -> (PageRequest, FilterCriteria) {
        let page = requested.or(self.prev_page).unwrap_or(default);
        self.prev_page = Some(page);
        self.return_page = Some(page);
        (page, self.criteria.clone())
    }

    /// Apply a newly submitted filter.
    ///
    /// The submitted page always becomes the stored position. `None` marks
    /// a rejected submission, which leaves the stored filter and return
    /// page untouched.
    pub fn submit_query(
        &mut self,
        requested: Option<PageRequest>,
        accepted: Option<FilterCriteria>,
        default: PageRequest,
    ) -> PageRequest {
        let page = requested.unwrap_or(default);
        self.prev_page = Some(page);
        if let Some(criteria) = accepted {
            self.criteria = criteria;
            self.return_page = Some(page);
        }
        page
    }

    /// Consume the pending return page, if any.
    pub fn take_return_target(&mut self) -> ReturnTarget {
        match self.return_page.take() {
            Some(page) => ReturnTarget::Query(page),
            None => ReturnTarget::List,
        }
    }
}
