use payloads::requests::SecurityEventFilters;
use payloads::responses::SecurityEvent;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::use_collection::{UseCollectionHandle, use_collection};
use crate::hooks::use_polling::{PollInterval, use_polling};

/// The security events screen is a read-only collection; there are no
/// mutations to reconcile.
pub type SecurityEventsHandle =
    UseCollectionHandle<SecurityEvent, SecurityEventFilters>;

#[hook]
pub fn use_security_events() -> SecurityEventsHandle {
    let collection = use_collection(|query| async move {
        get_api_client().list_security_events(&query).await
    });
    use_polling(
        Some(PollInterval::LIST),
        collection.silent_refresh_callback(),
    );

    collection
}
