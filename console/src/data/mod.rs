//! The orchestration core: request execution, collection aggregation,
//! filter/pagination coordination and mutation reconciliation. Framework
//! free; the `hooks` module binds it to Yew screens.

pub mod collection;
pub mod query;
pub mod reconcile;
pub mod request;

pub use collection::{CollectionCell, STALE_PATCH_LIMIT};
pub use query::{Pagination, QueryState};
pub use reconcile::Identified;
pub use request::{Notify, RequestCell, RequestState};
