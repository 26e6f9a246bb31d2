//! Tenant directory: filter predicate, fallback pagination and the
//! per-visitor listing controller.
//!
//! The controller owns the state a directory page needs between fetches:
//! the active filters, a debounced pending search, the accumulated result
//! list and the request currently in flight. Every issued request carries a
//! generation number; [`DirectoryController::apply`] discards responses that
//! belong to a superseded request, so the last-issued request always wins.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::data::{DataOrigin, Sourced};
use crate::models::tenant;

/// Filters and paging for a tenant listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantQuery {
    pub search: String,
    pub category_id: Option<i32>,
    pub floor: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl TenantQuery {
    pub fn new(page_size: u64) -> Self {
        Self {
            search: String::new(),
            category_id: None,
            floor: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Trimmed search text, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search.trim()).filter(|term| !term.is_empty())
    }

    /// Trimmed floor label, `None` when blank.
    pub fn floor_filter(&self) -> Option<&str> {
        self.floor
            .as_deref()
            .map(str::trim)
            .filter(|floor| !floor.is_empty())
    }

    pub fn has_filters(&self) -> bool {
        self.search_term().is_some() || self.category_id.is_some() || self.floor_filter().is_some()
    }

    /// Zero-based row offset of the requested page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Highest page whose row offset a SQL `OFFSET` can still express.
    pub fn max_page(page_size: u64) -> u64 {
        i64::MAX as u64 / page_size.max(1)
    }

    /// Category, floor and search all have to agree.
    pub fn matches(&self, tenant: &tenant::Model) -> bool {
        if let Some(category_id) = self.category_id
            && tenant.category_id != Some(category_id)
        {
            return false;
        }

        if let Some(floor) = self.floor_filter() {
            match tenant.floor.as_deref() {
                Some(tenant_floor) if tenant_floor.trim().eq_ignore_ascii_case(floor) => {}
                _ => return false,
            }
        }

        let Some(term) = self.search_term() else {
            return true;
        };
        // ASCII folding, as SQL `lower()` does on SQLite.
        let needle = term.to_ascii_lowercase();

        [
            Some(tenant.name.as_str()),
            tenant.brand_name.as_deref(),
            tenant.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_ascii_lowercase().contains(&needle))
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }
}

/// Filters the bundled tenant list the same way the database query does.
///
/// Unlisted records (inactive or nameless) are skipped. Featured tenants come
/// first, then alphabetical by name.
pub fn filter_fallback(tenants: &[tenant::Model], query: &TenantQuery) -> Page<tenant::Model> {
    let mut matching: Vec<&tenant::Model> = tenants
        .iter()
        .filter(|tenant| tenant.is_listable() && query.matches(tenant))
        .collect();

    matching.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| a.name.to_ascii_lowercase().cmp(&b.name.to_ascii_lowercase()))
    });

    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.page_size as usize)
        .cloned()
        .collect();

    Page {
        items,
        total,
        page: query.page.max(1),
        page_size: query.page_size,
    }
}

/// A listing fetch issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: TenantQuery,
}

/// Read-only snapshot of the controller for rendering.
#[derive(Debug)]
pub struct DirectoryView<'a> {
    pub tenants: &'a [tenant::Model],
    pub total: u64,
    pub has_more: bool,
    pub loading: bool,
    /// No results after a completed load.
    pub is_empty: bool,
    /// A filter is active, so a "clear filters" action makes sense.
    pub can_clear_filters: bool,
    pub error: Option<&'a str>,
    pub origin: Option<DataOrigin>,
    pub filters: &'a TenantQuery,
}

#[derive(Debug, Clone)]
struct PendingSearch {
    text: String,
    due_at: DateTime<Utc>,
}

/// Listing state for one directory visitor.
///
/// This models an interactive session: debounced search input, filter changes
/// and load-more all issue generation-tagged requests. The `/directory` page
/// builds one per request from the query string and only drives `load` and
/// `load_more`; an interactive client drives the rest.
#[derive(Debug)]
pub struct DirectoryController<C: Clock> {
    clock: C,
    debounce: Duration,
    filters: TenantQuery,
    pending_search: Option<PendingSearch>,
    tenants: Vec<tenant::Model>,
    total: u64,
    loaded_page: u64,
    generation: u64,
    in_flight: Option<u64>,
    loaded_once: bool,
    error: Option<String>,
    origin: Option<DataOrigin>,
}

impl<C: Clock> DirectoryController<C> {
    pub fn new(clock: C, page_size: u64, debounce: Duration) -> Self {
        Self::with_filters(clock, TenantQuery::new(page_size), debounce)
    }

    /// Starts from filters already known, e.g. from a page's query string.
    pub fn with_filters(clock: C, mut filters: TenantQuery, debounce: Duration) -> Self {
        filters.page = 1;
        filters.page_size = filters.page_size.max(1);
        Self {
            clock,
            debounce,
            filters,
            pending_search: None,
            tenants: Vec::new(),
            total: 0,
            loaded_page: 0,
            generation: 0,
            in_flight: None,
            loaded_once: false,
            error: None,
            origin: None,
        }
    }

    /// First page with the current filters.
    pub fn load(&mut self) -> FetchRequest {
        self.issue(1)
    }

    /// Records search input; the fetch happens once the debounce window passes
    /// without further input.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.pending_search = Some(PendingSearch {
            text: text.into(),
            due_at: self.clock.now() + self.debounce,
        });
    }

    /// Issues the debounced search once it is due.
    pub fn poll(&mut self) -> Option<FetchRequest> {
        let due = self
            .pending_search
            .as_ref()
            .is_some_and(|pending| pending.due_at <= self.clock.now());
        if !due {
            return None;
        }
        self.flush_pending_search();
        Some(self.issue(1))
    }

    pub fn set_category(&mut self, category_id: Option<i32>) -> FetchRequest {
        self.flush_pending_search();
        self.filters.category_id = category_id;
        self.issue(1)
    }

    pub fn set_floor(&mut self, floor: Option<String>) -> FetchRequest {
        self.flush_pending_search();
        self.filters.floor = floor;
        self.issue(1)
    }

    pub fn clear_filters(&mut self) -> FetchRequest {
        self.pending_search = None;
        self.filters.search.clear();
        self.filters.category_id = None;
        self.filters.floor = None;
        self.issue(1)
    }

    /// Next page, only when more results exist and nothing is loading.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        Some(self.issue(self.loaded_page + 1))
    }

    /// Applies a fetch result. Returns `false` when the response belongs to a
    /// superseded request and was dropped.
    pub fn apply(
        &mut self,
        request: &FetchRequest,
        result: Result<Sourced<Page<tenant::Model>>, String>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                generation = request.generation,
                current = self.generation,
                "Discarding stale directory response"
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(Sourced { data: page, origin }) => {
                let listable = page.items.into_iter().filter(tenant::Model::is_listable);
                if request.query.page <= 1 {
                    self.tenants = listable.collect();
                } else {
                    self.tenants.extend(listable);
                }
                self.total = page.total;
                self.loaded_page = request.query.page.max(1);
                self.loaded_once = true;
                self.error = None;
                self.origin = Some(origin);
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    pub fn filters(&self) -> &TenantQuery {
        &self.filters
    }

    pub fn has_more(&self) -> bool {
        (self.tenants.len() as u64) < self.total
    }

    pub fn view(&self) -> DirectoryView<'_> {
        DirectoryView {
            tenants: &self.tenants,
            total: self.total,
            has_more: self.has_more(),
            loading: self.in_flight.is_some(),
            is_empty: self.loaded_once && self.tenants.is_empty(),
            can_clear_filters: self.filters.has_filters(),
            error: self.error.as_deref(),
            origin: self.origin,
            filters: &self.filters,
        }
    }

    fn flush_pending_search(&mut self) {
        if let Some(pending) = self.pending_search.take() {
            self.filters.search = pending.text;
        }
    }

    fn issue(&mut self, page: u64) -> FetchRequest {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        let mut query = self.filters.clone();
        query.page = page;
        FetchRequest {
            generation: self.generation,
            query,
        }
    }
}
