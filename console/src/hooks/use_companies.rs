use jiff::civil::Date;
use payloads::requests::{CompanyFilters, StatusChange, SubscriptionChange};
use payloads::responses::Company;
use payloads::{CompanyId, Plan, StatusAction};
use yew::prelude::*;

use crate::data::reconcile::apply_status_action;
use crate::get_api_client;
use crate::hooks::use_collection::{UseCollectionHandle, use_collection};
use crate::hooks::use_polling::{PollInterval, use_polling};
use crate::hooks::use_request::{UseRequestHandle, use_request};

/// Aggregated state for the companies list screen: the collection plus
/// the status and subscription mutations, each with its own request
/// state, reconciled into the collection on success.
#[derive(Clone)]
pub struct CompaniesHandle {
    pub collection: UseCollectionHandle<Company, CompanyFilters>,
    status_request: UseRequestHandle<Company>,
    subscription_request: UseRequestHandle<Company>,
}

impl CompaniesHandle {
    /// Suspend or activate a company. On success the matching item and
    /// the selected entity are patched from the action alone, without a
    /// reload.
    pub fn toggle_status(
        &self,
        id: CompanyId,
        action: StatusAction,
        reason: Option<String>,
    ) {
        let collection = self.collection.clone();
        self.status_request.spawn_then(
            async move {
                let details = StatusChange { action, reason };
                get_api_client().update_company_status(&id, &details).await
            },
            move |updated| {
                if updated.is_some() {
                    collection.reconcile(id, |company| {
                        apply_status_action(company, action)
                    });
                }
            },
        );
    }

    /// Move a company to a new plan, patching the plan field locally on
    /// success.
    pub fn change_plan(
        &self,
        id: CompanyId,
        new_plan: Plan,
        effective_date: Date,
        reason: Option<String>,
    ) {
        let collection = self.collection.clone();
        self.subscription_request.spawn_then(
            async move {
                let details = SubscriptionChange {
                    new_plan,
                    effective_date,
                    reason,
                };
                get_api_client()
                    .update_company_subscription(&id, &details)
                    .await
            },
            move |updated| {
                if updated.is_some() {
                    collection
                        .reconcile(id, |company| company.plan = new_plan);
                }
            },
        );
    }

    /// Whether either mutation is still in flight.
    pub fn mutating(&self) -> bool {
        self.status_request.loading() || self.subscription_request.loading()
    }
}

#[hook]
pub fn use_companies() -> CompaniesHandle {
    let collection = use_collection(|query| async move {
        get_api_client().list_companies(&query).await
    });
    use_polling(
        Some(PollInterval::LIST),
        collection.silent_refresh_callback(),
    );

    CompaniesHandle {
        collection,
        status_request: use_request(),
        subscription_request: use_request(),
    }
}
