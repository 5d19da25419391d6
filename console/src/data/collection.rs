use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use payloads::ClientError;
use payloads::requests::ListQuery;
use payloads::responses::{Envelope, Page};

use super::query::{Pagination, QueryState};
use super::reconcile::{self, Identified};
use super::request::{Notify, RequestCell};

/// Optimistic patches tolerated before the owning hook forces a full
/// reload, bounding divergence from the server.
pub const STALE_PATCH_LIMIT: u32 = 5;

/// One entity type's working set for a single screen: the items, the
/// currently open entity, the filter/pagination coordinator and the
/// request cell performing the fetches. Owned exclusively by that
/// screen; nothing is shared across screens.
pub struct CollectionCell<T, F> {
    query: RefCell<QueryState<F>>,
    items: RefCell<Vec<T>>,
    selected: RefCell<Option<T>>,
    request: Rc<RequestCell<Page<T>>>,
    stale_patches: Cell<u32>,
    redraw: Rc<dyn Fn()>,
}

impl<T, F> CollectionCell<T, F>
where
    T: Clone + Identified,
    F: Clone + Default,
{
    pub fn new(notifier: Rc<dyn Notify>, redraw: Rc<dyn Fn()>) -> Rc<Self> {
        Rc::new(Self {
            query: RefCell::new(QueryState::default()),
            items: RefCell::new(Vec::new()),
            selected: RefCell::new(None),
            request: RequestCell::new(notifier, redraw.clone()),
            stale_patches: Cell::new(0),
            redraw,
        })
    }

    pub fn items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    pub fn selected(&self) -> Option<T> {
        self.selected.borrow().clone()
    }

    pub fn filters(&self) -> F {
        self.query.borrow().filters().clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.query.borrow().pagination()
    }

    pub fn revision(&self) -> u64 {
        self.query.borrow().revision()
    }

    pub fn loading(&self) -> bool {
        self.request.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.request.error()
    }

    /// Whether any fetch has ever succeeded for this collection.
    pub fn has_loaded(&self) -> bool {
        self.request.has_loaded()
    }

    pub fn update_filters(&self, apply: impl FnOnce(&mut F)) {
        self.query.borrow_mut().update_filters(apply);
        (*self.redraw)();
    }

    pub fn clear_filters(&self) {
        self.query.borrow_mut().clear_filters();
        (*self.redraw)();
    }

    pub fn change_page(&self, page: u32) {
        self.query.borrow_mut().change_page(page);
        (*self.redraw)();
    }

    pub fn change_limit(&self, limit: u32) {
        self.query.borrow_mut().change_limit(limit);
        (*self.redraw)();
    }

    /// Fetch with the current filters and pagination, surfacing failures
    /// through the notifier.
    pub async fn load<Op, Fut>(&self, fetch: Op)
    where
        Op: FnOnce(ListQuery<F>) -> Fut,
        Fut: Future<Output = Result<Envelope<Page<T>>, ClientError>>,
    {
        self.load_inner(fetch, None::<fn(&mut ListQuery<F>)>, false)
            .await;
    }

    /// Fetch without notifying on failure; used by poll ticks.
    pub async fn load_silent<Op, Fut>(&self, fetch: Op)
    where
        Op: FnOnce(ListQuery<F>) -> Fut,
        Fut: Future<Output = Result<Envelope<Page<T>>, ClientError>>,
    {
        self.load_inner(fetch, None::<fn(&mut ListQuery<F>)>, true)
            .await;
    }

    /// Fetch with per-call overrides applied to the merged query last,
    /// so they win over coordinator state on conflict.
    pub async fn load_with<Op, Fut, O>(&self, fetch: Op, overrides: O)
    where
        Op: FnOnce(ListQuery<F>) -> Fut,
        Fut: Future<Output = Result<Envelope<Page<T>>, ClientError>>,
        O: FnOnce(&mut ListQuery<F>),
    {
        self.load_inner(fetch, Some(overrides), false).await;
    }

    async fn load_inner<Op, Fut, O>(
        &self,
        fetch: Op,
        overrides: Option<O>,
        silent: bool,
    ) where
        Op: FnOnce(ListQuery<F>) -> Fut,
        Fut: Future<Output = Result<Envelope<Page<T>>, ClientError>>,
        O: FnOnce(&mut ListQuery<F>),
    {
        let mut query = self.query.borrow().to_list_query();
        if let Some(overrides) = overrides {
            overrides(&mut query);
        }

        let operation = fetch(query);
        let page = if silent {
            self.request.run_silent(operation).await
        } else {
            self.request.run(operation).await
        };

        // A failed fetch leaves the previous items and pagination alone.
        if let Some(page) = page {
            *self.items.borrow_mut() = page.items;
            self.query.borrow_mut().merge_page_meta(&page.pagination);
            self.stale_patches.set(0);
            (*self.redraw)();
        }
    }

    /// Apply a mutation's known field changes to the matching item and
    /// the selected entity, then drop any duplicate identifiers.
    pub fn reconcile(&self, id: T::Id, patch: impl Fn(&mut T)) {
        {
            let mut items = self.items.borrow_mut();
            let mut selected = self.selected.borrow_mut();
            reconcile::reconcile(&mut items, &mut selected, id, &patch);
            reconcile::dedup_by_id(&mut items);
        }
        self.stale_patches.set(self.stale_patches.get() + 1);
        tracing::debug!(
            "reconciled entity after mutation ({} unfetched patches)",
            self.stale_patches.get()
        );
        (*self.redraw)();
    }

    /// Optimistic patches applied since the last successful fetch.
    pub fn stale_patches(&self) -> u32 {
        self.stale_patches.get()
    }

    /// Whether enough optimistic patches have accumulated that the
    /// owning screen should force a full reload.
    pub fn is_stale(&self) -> bool {
        self.stale_patches.get() >= STALE_PATCH_LIMIT
    }

    /// Mark the entity with `id` as the screen's open entity, if loaded.
    pub fn select(&self, id: T::Id) {
        let selected =
            self.items.borrow().iter().find(|item| item.id() == id).cloned();
        *self.selected.borrow_mut() = selected;
        (*self.redraw)();
    }

    pub fn clear_selected(&self) {
        *self.selected.borrow_mut() = None;
        (*self.redraw)();
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;
    use payloads::requests::{CompanyFilters, StatusFilter};
    use payloads::responses::{Company, EnvelopeData, PageMeta};
    use payloads::{CompanyId, StatusAction, SubscriptionStatus};
    use serde_json::json;
    use uuid::Uuid;

    use crate::data::reconcile::apply_status_action;
    use crate::data::request::tests::RecordingNotifier;

    use super::*;

    fn company_id(n: u128) -> CompanyId {
        CompanyId(Uuid::from_u128(n))
    }

    fn company(n: u128) -> Company {
        let mut company =
            crate::data::reconcile::tests::company(company_id(n), "acme");
        company.name = format!("company-{n}");
        company
    }

    fn page(
        items: Vec<Company>,
        pagination: PageMeta,
    ) -> Result<Envelope<Page<Company>>, ClientError> {
        Ok(Envelope {
            success: true,
            data: Some(EnvelopeData::Flat(Page { items, pagination })),
            message: None,
            error: None,
        })
    }

    fn cell() -> Rc<CollectionCell<Company, CompanyFilters>> {
        CollectionCell::new(RecordingNotifier::new(), Rc::new(|| {}))
    }

    #[test]
    fn load_replaces_items_and_merges_pagination() {
        let cell = cell();
        cell.update_filters(|f| f.status = Some(StatusFilter::Active));

        block_on(cell.load(|query| {
            assert_eq!(
                serde_json::to_value(&query).unwrap(),
                json!({"status": "active", "page": 1, "limit": 20})
            );
            async {
                page(
                    vec![company(1), company(2), company(3)],
                    PageMeta {
                        total_pages: Some(3),
                        total_count: Some(45),
                        ..PageMeta::default()
                    },
                )
            }
        }));

        assert_eq!(cell.items().len(), 3);
        assert_eq!(cell.pagination().total_pages, 3);
        assert_eq!(cell.pagination().total_count, 45);
        assert!(cell.has_loaded());
    }

    #[test]
    fn failed_load_leaves_previous_items_untouched() {
        let cell = cell();
        block_on(cell.load(|_| async {
            page(
                vec![company(1)],
                PageMeta {
                    total_pages: Some(5),
                    ..PageMeta::default()
                },
            )
        }));

        block_on(cell.load_silent(|_| async {
            Ok(Envelope {
                success: false,
                data: None,
                message: Some("backend unavailable".to_string()),
                error: None,
            })
        }));

        assert_eq!(cell.items().len(), 1);
        assert_eq!(cell.pagination().total_pages, 5);
        assert_eq!(cell.error(), Some("backend unavailable".to_string()));
    }

    #[test]
    fn overrides_win_over_coordinator_state() {
        let cell = cell();
        cell.change_page(3);

        block_on(cell.load_with(
            |query| {
                assert_eq!(query.page, 1);
                assert_eq!(query.limit, 100);
                async { page(vec![], PageMeta::default()) }
            },
            |query| {
                query.page = 1;
                query.limit = 100;
            },
        ));
    }

    #[test]
    fn overlapping_loads_resolve_last_write_wins() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let cell = cell();
        let (page1_tx, page1_rx) = oneshot::channel();
        let (page2_tx, page2_rx) = oneshot::channel();

        // A page-1 load fires, then a page-2 load while it is in flight.
        for rx in [page1_rx, page2_rx] {
            let cell = cell.clone();
            spawner
                .spawn_local(async move {
                    cell.load(|_| async { rx.await.expect("sender dropped") })
                        .await;
                })
                .unwrap();
        }
        pool.run_until_stalled();

        // The page-2 call resolves first, the page-1 call last: the
        // page-1 data is what stays on screen.
        page2_tx.send(page(vec![company(2)], PageMeta::default())).ok();
        pool.run_until_stalled();
        assert_eq!(cell.items()[0].name, "company-2");

        page1_tx.send(page(vec![company(1)], PageMeta::default())).ok();
        pool.run_until_stalled();
        assert_eq!(cell.items()[0].name, "company-1");
    }

    #[test]
    fn reconcile_patches_item_and_selected_and_counts_staleness() {
        let cell = cell();
        let c1 = company_id(1);
        block_on(cell.load(|_| async {
            page(vec![company(1), company(2)], PageMeta::default())
        }));
        cell.select(c1);

        cell.reconcile(c1, |c| apply_status_action(c, StatusAction::Suspend));

        let items = cell.items();
        assert!(!items[0].is_active);
        assert_eq!(
            items[0].subscription_status,
            SubscriptionStatus::Suspended
        );
        assert!(items[1].is_active);
        let selected = cell.selected().unwrap();
        assert!(!selected.is_active);
        assert_eq!(cell.stale_patches(), 1);
        assert!(!cell.is_stale());
    }

    #[test]
    fn reconciliation_pass_drops_duplicate_identifiers() {
        let cell = cell();
        block_on(cell.load(|_| async {
            page(
                vec![company(1), company(2), company(1)],
                PageMeta::default(),
            )
        }));

        cell.reconcile(company_id(2), |c| c.employee_count = 11);

        let ids: Vec<CompanyId> =
            cell.items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![company_id(1), company_id(2)]);
    }

    #[test]
    fn successful_load_resets_staleness() {
        let cell = cell();
        block_on(
            cell.load(|_| async { page(vec![company(1)], PageMeta::default()) }),
        );

        for _ in 0..STALE_PATCH_LIMIT {
            cell.reconcile(company_id(1), |c| c.employee_count += 1);
        }
        assert!(cell.is_stale());

        block_on(
            cell.load(|_| async { page(vec![company(1)], PageMeta::default()) }),
        );
        assert_eq!(cell.stale_patches(), 0);
        assert!(!cell.is_stale());
    }

    #[test]
    fn select_picks_from_loaded_items() {
        let cell = cell();
        block_on(cell.load(|_| async {
            page(vec![company(1), company(2)], PageMeta::default())
        }));

        cell.select(company_id(2));
        assert_eq!(cell.selected().map(|c| c.id), Some(company_id(2)));

        cell.select(company_id(9));
        assert_eq!(cell.selected(), None);

        cell.clear_selected();
        assert_eq!(cell.selected(), None);
    }
}
