use payloads::requests::{EmployeeFilters, StatusChange};
use payloads::responses::Employee;
use payloads::{EmployeeId, StatusAction};
use yew::prelude::*;

use crate::data::reconcile::apply_status_action;
use crate::get_api_client;
use crate::hooks::use_collection::{UseCollectionHandle, use_collection};
use crate::hooks::use_polling::{PollInterval, use_polling};
use crate::hooks::use_request::{UseRequestHandle, use_request};

/// Aggregated state for the employees list screen.
#[derive(Clone)]
pub struct EmployeesHandle {
    pub collection: UseCollectionHandle<Employee, EmployeeFilters>,
    status_request: UseRequestHandle<Employee>,
}

impl EmployeesHandle {
    /// Suspend or activate an employee account, patching the matching
    /// item and the selected entity on success.
    pub fn toggle_status(
        &self,
        id: EmployeeId,
        action: StatusAction,
        reason: Option<String>,
    ) {
        let collection = self.collection.clone();
        self.status_request.spawn_then(
            async move {
                let details = StatusChange { action, reason };
                get_api_client().update_employee_status(&id, &details).await
            },
            move |updated| {
                if updated.is_some() {
                    collection.reconcile(id, |employee| {
                        apply_status_action(employee, action)
                    });
                }
            },
        );
    }

    pub fn mutating(&self) -> bool {
        self.status_request.loading()
    }
}

#[hook]
pub fn use_employees() -> EmployeesHandle {
    let collection = use_collection(|query| async move {
        get_api_client().list_employees(&query).await
    });
    use_polling(
        Some(PollInterval::LIST),
        collection.silent_refresh_callback(),
    );

    EmployeesHandle {
        collection,
        status_request: use_request(),
    }
}
