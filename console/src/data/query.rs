use payloads::requests::ListQuery;
use payloads::responses::PageMeta;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Local pagination state for one screen. `total_pages`/`total_count`
/// start at zero and track whatever the server last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            total_count: 0,
        }
    }
}

impl Pagination {
    /// Overwrite local values with the keys present in a server response.
    pub fn merge_meta(&mut self, meta: &PageMeta) {
        if let Some(page) = meta.page {
            self.page = page.max(1);
        }
        if let Some(limit) = meta.limit {
            self.limit = limit;
        }
        if let Some(total_pages) = meta.total_pages {
            self.total_pages = total_pages;
        }
        if let Some(total_count) = meta.total_count {
            self.total_count = total_count;
        }
    }
}

/// Filter and pagination coordinator for one screen.
///
/// Every mutation bumps `revision`, which the collection hook watches to
/// drive the dependency-based re-fetch: screens never fetch manually
/// outside that path apart from the initial mount and poll ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<F> {
    filters: F,
    pagination: Pagination,
    revision: u64,
}

impl<F: Default> Default for QueryState<F> {
    fn default() -> Self {
        Self {
            filters: F::default(),
            pagination: Pagination::default(),
            revision: 0,
        }
    }
}

impl<F: Clone + Default> QueryState<F> {
    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a partial update to the filter set. Any filter change sends
    /// the screen back to the first page.
    pub fn update_filters(&mut self, apply: impl FnOnce(&mut F)) {
        apply(&mut self.filters);
        self.pagination.page = 1;
        self.revision += 1;
    }

    /// Restore the screen's default filters.
    pub fn clear_filters(&mut self) {
        self.filters = F::default();
        self.pagination.page = 1;
        self.revision += 1;
    }

    /// Move to another page. The one mutation that leaves the filter set
    /// and the page reset alone.
    pub fn change_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
        self.revision += 1;
    }

    pub fn change_limit(&mut self, limit: u32) {
        self.pagination.limit = limit;
        self.pagination.page = 1;
        self.revision += 1;
    }

    /// Fold server-reported pagination metadata into local state. Does
    /// not bump the revision: a fetch result must not schedule another
    /// fetch.
    pub fn merge_page_meta(&mut self, meta: &PageMeta) {
        self.pagination.merge_meta(meta);
    }

    /// The merged query for the next collection fetch.
    pub fn to_list_query(&self) -> ListQuery<F> {
        ListQuery {
            page: self.pagination.page,
            limit: self.pagination.limit,
            filters: self.filters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use payloads::requests::{CompanyFilters, StatusFilter};
    use serde_json::json;

    use super::*;

    #[test]
    fn filter_updates_merge_in_order_and_reset_page() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.change_page(4);

        query.update_filters(|f| f.search = Some("acme".to_string()));
        query.update_filters(|f| f.status = Some(StatusFilter::Active));
        query.update_filters(|f| f.search = Some("initech".to_string()));

        assert_eq!(query.filters().search, Some("initech".to_string()));
        assert_eq!(query.filters().status, Some(StatusFilter::Active));
        assert_eq!(query.pagination().page, 1);
    }

    #[test]
    fn change_page_leaves_filters_alone() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.update_filters(|f| f.search = Some("acme".to_string()));

        query.change_page(3);

        assert_eq!(query.pagination().page, 3);
        assert_eq!(query.filters().search, Some("acme".to_string()));
    }

    #[test]
    fn page_never_drops_below_one() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.change_page(0);
        assert_eq!(query.pagination().page, 1);
    }

    #[test]
    fn clear_filters_restores_defaults_and_resets_page() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.update_filters(|f| f.status = Some(StatusFilter::Suspended));
        query.change_page(2);

        query.clear_filters();

        assert_eq!(*query.filters(), CompanyFilters::default());
        assert_eq!(query.pagination().page, 1);
    }

    #[test]
    fn change_limit_resets_page() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.change_page(5);

        query.change_limit(50);

        assert_eq!(query.pagination().limit, 50);
        assert_eq!(query.pagination().page, 1);
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut query = QueryState::<CompanyFilters>::default();
        let start = query.revision();

        query.update_filters(|f| f.search = Some("a".to_string()));
        query.change_page(2);
        query.change_limit(10);
        query.clear_filters();

        assert_eq!(query.revision(), start + 4);
    }

    #[test]
    fn merge_page_meta_overwrites_only_present_keys() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.change_page(2);
        let revision = query.revision();

        query.merge_page_meta(&PageMeta {
            total_pages: Some(3),
            total_count: Some(45),
            ..PageMeta::default()
        });

        let pagination = query.pagination();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total_count, 45);
        assert_eq!(query.revision(), revision);
    }

    #[test]
    fn list_query_serializes_merged_filters_and_pagination() {
        let mut query = QueryState::<CompanyFilters>::default();
        query.update_filters(|f| f.status = Some(StatusFilter::Active));

        assert_eq!(
            serde_json::to_value(query.to_list_query()).unwrap(),
            json!({"status": "active", "page": 1, "limit": 20})
        );
    }
}
