use jiff::civil::Date;
use payloads::requests::{StatusChange, SubscriptionChange};
use payloads::responses::{Company, CompanyDetail};
use payloads::{CompanyId, Plan, StatusAction};
use yew::prelude::*;

use crate::data::reconcile::apply_status_action;
use crate::get_api_client;
use crate::hooks::use_request::{UseRequestHandle, use_request};

/// Aggregated state for the company detail screen. The fetched detail is
/// the screen's open entity; successful mutations patch it in place.
#[derive(Clone)]
pub struct CompanyHandle {
    id: CompanyId,
    detail_request: UseRequestHandle<CompanyDetail>,
    status_request: UseRequestHandle<Company>,
    subscription_request: UseRequestHandle<Company>,
}

impl CompanyHandle {
    pub fn detail(&self) -> Option<CompanyDetail> {
        self.detail_request.data()
    }

    pub fn loading(&self) -> bool {
        self.detail_request.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.detail_request.error()
    }

    pub fn is_initial_loading(&self) -> bool {
        self.detail_request.is_initial_loading()
    }

    /// Loading finished and no company was ever obtained; the screen
    /// renders its not-found fallback.
    pub fn not_found(&self) -> bool {
        self.detail_request.is_absent()
    }

    pub fn refresh(&self) {
        let id = self.id;
        self.detail_request
            .spawn(async move { get_api_client().get_company(&id).await });
    }

    /// Suspend or activate the open company, patching the detail from
    /// the action alone on success.
    pub fn toggle_status(&self, action: StatusAction, reason: Option<String>) {
        let id = self.id;
        let detail_request = self.detail_request.clone();
        self.status_request.spawn_then(
            async move {
                let details = StatusChange { action, reason };
                get_api_client().update_company_status(&id, &details).await
            },
            move |updated| {
                if updated.is_some() {
                    detail_request.patch_data(|detail| {
                        apply_status_action(&mut detail.company, action)
                    });
                }
            },
        );
    }

    pub fn change_plan(
        &self,
        new_plan: Plan,
        effective_date: Date,
        reason: Option<String>,
    ) {
        let id = self.id;
        let detail_request = self.detail_request.clone();
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
                    detail_request
                        .patch_data(|detail| detail.company.plan = new_plan);
                }
            },
        );
    }

    pub fn mutating(&self) -> bool {
        self.status_request.loading() || self.subscription_request.loading()
    }
}

#[hook]
pub fn use_company(id: CompanyId) -> CompanyHandle {
    let detail_request: UseRequestHandle<CompanyDetail> = use_request();

    // Fetch on mount and whenever the id changes.
    {
        let detail_request = detail_request.clone();
        use_effect_with(id, move |id| {
            let id = *id;
            detail_request.spawn(async move {
                get_api_client().get_company(&id).await
            });
        });
    }

    CompanyHandle {
        id,
        detail_request,
        status_request: use_request(),
        subscription_request: use_request(),
    }
}
