use std::future::Future;
use std::rc::Rc;

use payloads::ClientError;
use payloads::requests::ListQuery;
use payloads::responses::{Envelope, Page};
use yew::prelude::*;

use crate::contexts::toast::{ToastNotifier, use_toast};
use crate::data::collection::CollectionCell;
use crate::data::query::Pagination;
use crate::data::reconcile::Identified;

/// Handle returned by [`use_collection`]: one entity type's working set
/// with its filter/pagination coordinator and refresh plumbing.
pub struct UseCollectionHandle<T, F>
where
    T: Clone + Identified + 'static,
    F: Clone + Default + 'static,
{
    cell: Rc<CollectionCell<T, F>>,
    /// Spawns a load with the current query; the payload is the silent
    /// flag.
    loader: Callback<bool>,
}

impl<T, F> Clone for UseCollectionHandle<T, F>
where
    T: Clone + Identified + 'static,
    F: Clone + Default + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<T, F> UseCollectionHandle<T, F>
where
    T: Clone + Identified + 'static,
    F: Clone + Default + 'static,
{
    pub fn items(&self) -> Vec<T> {
        self.cell.items()
    }

    pub fn selected(&self) -> Option<T> {
        self.cell.selected()
    }

    pub fn filters(&self) -> F {
        self.cell.filters()
    }

    pub fn pagination(&self) -> Pagination {
        self.cell.pagination()
    }

    pub fn loading(&self) -> bool {
        self.cell.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.cell.error()
    }

    /// True during the very first load, before any fetch has succeeded.
    pub fn is_initial_loading(&self) -> bool {
        self.cell.loading() && !self.cell.has_loaded()
    }

    pub fn update_filters(&self, apply: impl FnOnce(&mut F)) {
        self.cell.update_filters(apply);
    }

    pub fn clear_filters(&self) {
        self.cell.clear_filters();
    }

    pub fn change_page(&self, page: u32) {
        self.cell.change_page(page);
    }

    pub fn change_limit(&self, limit: u32) {
        self.cell.change_limit(limit);
    }

    /// Re-run the current fetch, notifying on failure.
    pub fn refresh(&self) {
        self.loader.emit(false);
    }

    /// Poll-tick refresh: a failure is stored for inline display but not
    /// toasted.
    pub fn refresh_silent(&self) {
        self.loader.emit(true);
    }

    pub fn silent_refresh_callback(&self) -> Callback<()> {
        self.loader.reform(|_| true)
    }

    /// Mark the entity with `id` as the screen's open entity.
    pub fn select(&self, id: T::Id) {
        self.cell.select(id);
    }

    pub fn clear_selected(&self) {
        self.cell.clear_selected();
    }

    /// Reconcile a successful mutation into local state. Once enough
    /// optimistic patches accumulate, a full reload is forced to bound
    /// divergence from the server.
    pub fn reconcile(&self, id: T::Id, patch: impl Fn(&mut T)) {
        self.cell.reconcile(id, patch);
        if self.cell.is_stale() {
            self.loader.emit(true);
        }
    }

    pub fn stale_patches(&self) -> u32 {
        self.cell.stale_patches()
    }
}

/// Bind a collection cell to the component. The fetch runs on mount and
/// again whenever the coordinator revision changes (filters, page or
/// limit); that revision-driven path is the only automatic fetch.
#[hook]
pub fn use_collection<T, F, Op, Fut>(fetch: Op) -> UseCollectionHandle<T, F>
where
    T: Clone + Identified + 'static,
    F: Clone + Default + 'static,
    Op: Fn(ListQuery<F>) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<Page<T>>, ClientError>> + 'static,
{
    let update = use_force_update();
    let toast = use_toast();
    let cell = use_state(|| {
        CollectionCell::new(
            Rc::new(ToastNotifier::new(toast)),
            Rc::new(move || update.force_update()),
        )
    });
    let cell = (*cell).clone();

    // The first render's closure wins; later renders pass an equivalent
    // one.
    let fetch = use_mut_ref(|| Rc::new(fetch));

    let loader: Callback<bool> = {
        let cell = cell.clone();
        let fetch = fetch.borrow().clone();
        Callback::from(move |silent| {
            let cell = cell.clone();
            let fetch = fetch.clone();
            yew::platform::spawn_local(async move {
                if silent {
                    cell.load_silent(|query| (*fetch)(query)).await;
                } else {
                    cell.load(|query| (*fetch)(query)).await;
                }
            });
        })
    };

    {
        let loader = loader.clone();
        use_effect_with(cell.revision(), move |_| {
            loader.emit(false);
        });
    }

    UseCollectionHandle { cell, loader }
}
