use std::future::Future;
use std::rc::Rc;

use payloads::ClientError;
use payloads::responses::Envelope;
use yew::prelude::*;

use crate::contexts::toast::{ToastNotifier, use_toast};
use crate::data::request::{RequestCell, RequestState};

/// Handle returned by [`use_request`]: one bound remote operation and
/// its tracked `{data, loading, error}` state.
pub struct UseRequestHandle<T> {
    cell: Rc<RequestCell<T>>,
}

impl<T> Clone for UseRequestHandle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + 'static> UseRequestHandle<T> {
    pub fn state(&self) -> RequestState<T> {
        self.cell.snapshot()
    }

    pub fn data(&self) -> Option<T> {
        self.cell.data()
    }

    pub fn loading(&self) -> bool {
        self.cell.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.cell.error()
    }

    /// True during the very first load, before any call has succeeded.
    pub fn is_initial_loading(&self) -> bool {
        self.cell.loading() && !self.cell.has_loaded()
    }

    /// True once loading has finished without any call ever succeeding.
    /// Screens render their not-found fallback off this.
    pub fn is_absent(&self) -> bool {
        !self.cell.loading() && !self.cell.has_loaded()
    }

    pub fn reset(&self) {
        self.cell.reset();
    }

    /// Mutate the stored data in place, if any.
    pub fn patch_data(&self, patch: impl FnOnce(&mut T)) {
        self.cell.patch_data(patch);
    }

    /// The operation as a future, for callers composing fan-out joins.
    pub fn run<Fut>(
        &self,
        operation: Fut,
    ) -> impl Future<Output = Option<T>> + 'static
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
    {
        let cell = self.cell.clone();
        async move { cell.run(operation).await }
    }

    /// Like [`Self::run`], without notifying on failure.
    pub fn run_silent<Fut>(
        &self,
        operation: Fut,
    ) -> impl Future<Output = Option<T>> + 'static
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
    {
        let cell = self.cell.clone();
        async move { cell.run_silent(operation).await }
    }

    /// Run the operation on the local spawner.
    pub fn spawn<Fut>(&self, operation: Fut)
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
    {
        let run = self.run(operation);
        yew::platform::spawn_local(async move {
            run.await;
        });
    }

    /// Run the operation and hand the unwrapped result to `and_then`;
    /// mutations use this to reconcile local state on success.
    pub fn spawn_then<Fut, C>(&self, operation: Fut, and_then: C)
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
        C: FnOnce(Option<T>) + 'static,
    {
        let run = self.run(operation);
        yew::platform::spawn_local(async move {
            and_then(run.await);
        });
    }
}

/// Bind a request cell to the component: state transitions schedule a
/// re-render, and failures surface as error toasts.
#[hook]
pub fn use_request<T: Clone + 'static>() -> UseRequestHandle<T> {
    let update = use_force_update();
    let toast = use_toast();
    let cell = use_state(|| {
        RequestCell::new(
            Rc::new(ToastNotifier::new(toast)),
            Rc::new(move || update.force_update()),
        )
    });

    UseRequestHandle {
        cell: (*cell).clone(),
    }
}
