use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use payloads::ClientError;
use payloads::responses::Envelope;

/// Fallback for transport failures whose message renders empty.
const UNEXPECTED_ERROR: &str = "Unexpected error";

/// User-facing notification capability injected into the data layer. The
/// console wires this to the toast store; tests record messages.
pub trait Notify {
    fn notify(&self, message: &str);
}

/// Tracked state of one bound remote operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Executes remote operations and tracks their `{data, loading, error}`
/// state. One cell exists per bound operation per consuming screen.
///
/// Overlapping `run` calls on the same cell are not ordered: whichever
/// resolves last overwrites the state.
pub struct RequestCell<T> {
    state: RefCell<RequestState<T>>,
    loaded: Cell<bool>,
    notifier: Rc<dyn Notify>,
    redraw: Rc<dyn Fn()>,
}

impl<T: Clone> RequestCell<T> {
    pub fn new(notifier: Rc<dyn Notify>, redraw: Rc<dyn Fn()>) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(RequestState::default()),
            loaded: Cell::new(false),
            notifier,
            redraw,
        })
    }

    /// Current state, cloned out of the cell.
    pub fn snapshot(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Whether any call on this cell has ever succeeded. Distinguishes
    /// "refreshing" from the very first load, since `data` is cleared
    /// while a call is in flight.
    pub fn has_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Clear data, error and loading back to their initial values.
    ///
    /// Does not cancel an in-flight call: a call that resolves after the
    /// reset still writes its outcome into the cell.
    pub fn reset(&self) {
        *self.state.borrow_mut() = RequestState::default();
        self.loaded.set(false);
        (*self.redraw)();
    }

    /// Mutate the stored data in place, if any. Reconciliation path for
    /// screens whose selected entity lives inside this cell.
    pub fn patch_data(&self, patch: impl FnOnce(&mut T)) {
        if let Some(data) = self.state.borrow_mut().data.as_mut() {
            patch(data);
        }
        (*self.redraw)();
    }

    /// Run a remote operation, surfacing failures through the notifier.
    pub async fn run<Fut>(&self, operation: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>>,
    {
        self.run_inner(operation, false).await
    }

    /// Run a remote operation without notifying on failure. The error is
    /// still stored for inline display.
    pub async fn run_silent<Fut>(&self, operation: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>>,
    {
        self.run_inner(operation, true).await
    }

    async fn run_inner<Fut>(&self, operation: Fut, silent: bool) -> Option<T>
    where
        Fut: Future<Output = Result<Envelope<T>, ClientError>>,
    {
        {
            let mut state = self.state.borrow_mut();
            state.data = None;
            state.loading = true;
            state.error = None;
        }
        (*self.redraw)();

        let outcome = match operation.await {
            Ok(envelope) => envelope.into_outcome(),
            Err(err) => {
                let message = err.to_string();
                Err(if message.is_empty() {
                    UNEXPECTED_ERROR.to_string()
                } else {
                    message
                })
            }
        };

        let value = match outcome {
            Ok(value) => {
                let mut state = self.state.borrow_mut();
                state.data = value.clone();
                state.error = None;
                drop(state);
                self.loaded.set(true);
                value
            }
            Err(message) => {
                tracing::warn!("remote operation failed: {message}");
                if !silent {
                    self.notifier.notify(&message);
                }
                let mut state = self.state.borrow_mut();
                state.data = None;
                state.error = Some(message);
                None
            }
        };
        // Both arms above fall through to here, so loading is released on
        // every exit path.
        self.state.borrow_mut().loading = false;
        (*self.redraw)();
        value
    }
}
