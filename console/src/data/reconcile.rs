use payloads::{StatusAction, SubscriptionStatus};
use payloads::responses::{Company, Employee};

/// Entities addressable by a stable identifier.
pub trait Identified {
    type Id: Copy + PartialEq;

    fn id(&self) -> Self::Id;
}

impl Identified for Company {
    type Id = payloads::CompanyId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Identified for Employee {
    type Id = payloads::EmployeeId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Identified for payloads::responses::SecurityEvent {
    type Id = payloads::SecurityEventId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Patch the entity matching `id` (and the selected entity, when its id
/// matches) in place, then drop duplicate identifiers.
///
/// Best-effort and local-only: the known effect of a just-completed
/// mutation is applied without re-validating against the server. A view
/// stays stale until the next full fetch if the server diverged.
pub fn reconcile<T: Identified>(
    items: &mut [T],
    selected: &mut Option<T>,
    id: T::Id,
    patch: &impl Fn(&mut T),
) {
    for item in items.iter_mut() {
        if item.id() == id {
            patch(item);
        }
    }
    if let Some(selected) = selected.as_mut() {
        if selected.id() == id {
            patch(selected);
        }
    }
}

/// Drop every later occurrence of an already-seen identifier, keeping
/// the server-returned order of the survivors.
pub fn dedup_by_id<T: Identified>(items: &mut Vec<T>) {
    let mut seen: Vec<T::Id> = Vec::with_capacity(items.len());
    items.retain(|item| {
        let id = item.id();
        if seen.contains(&id) {
            false
        } else {
            seen.push(id);
            true
        }
    });
}

/// Entities carrying the activation pair a status mutation toggles.
pub trait StatusBearing {
    fn set_status(&mut self, is_active: bool, status: SubscriptionStatus);
}

impl StatusBearing for Company {
    fn set_status(&mut self, is_active: bool, status: SubscriptionStatus) {
        self.is_active = is_active;
        self.subscription_status = status;
    }
}

impl StatusBearing for Employee {
    fn set_status(&mut self, is_active: bool, status: SubscriptionStatus) {
        self.is_active = is_active;
        self.subscription_status = status;
    }
}

/// The status-toggle mutation shape: the field changes are derived from
/// the action alone, never from the mutation's response body.
pub fn apply_status_action<T: StatusBearing>(
    entity: &mut T,
    action: StatusAction,
) {
    let (is_active, status) = action.applied();
    entity.set_status(is_active, status);
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;
    use payloads::{CompanyId, Plan};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    pub(crate) fn company(id: CompanyId, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            contact_email: format!("ops@{name}.example"),
            plan: Plan::Starter,
            is_active: true,
            subscription_status: SubscriptionStatus::Active,
            employee_count: 10,
            monthly_spend: Decimal::ZERO,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn company_id(n: u128) -> CompanyId {
        CompanyId(Uuid::from_u128(n))
    }

    #[test]
    fn suspend_derives_inactive_and_suspended() {
        let c1 = company_id(1);
        let mut items = vec![company(c1, "acme"), company(company_id(2), "b")];
        let mut selected = None;

        reconcile(&mut items, &mut selected, c1, &|c| {
            apply_status_action(c, StatusAction::Suspend)
        });

        assert!(!items[0].is_active);
        assert_eq!(
            items[0].subscription_status,
            SubscriptionStatus::Suspended
        );
        assert!(items[1].is_active);
    }

    #[test]
    fn activate_derives_active_pair() {
        let c1 = company_id(1);
        let mut suspended = company(c1, "acme");
        apply_status_action(&mut suspended, StatusAction::Suspend);

        apply_status_action(&mut suspended, StatusAction::Activate);

        assert!(suspended.is_active);
        assert_eq!(
            suspended.subscription_status,
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn selected_entity_receives_the_identical_patch() {
        let c1 = company_id(1);
        let mut items = vec![company(c1, "acme")];
        let mut selected = Some(company(c1, "acme"));

        reconcile(&mut items, &mut selected, c1, &|c| {
            apply_status_action(c, StatusAction::Suspend)
        });

        assert_eq!(selected.as_ref(), Some(&items[0]));
    }

    #[test]
    fn selected_entity_with_other_id_is_untouched() {
        let c1 = company_id(1);
        let mut items = vec![company(c1, "acme")];
        let mut selected = Some(company(company_id(2), "b"));

        reconcile(&mut items, &mut selected, c1, &|c| c.plan = Plan::Free);

        assert_eq!(selected.as_ref().map(|c| c.plan), Some(Plan::Starter));
    }

    #[test]
    fn attribute_change_sets_the_single_field() {
        let c1 = company_id(1);
        let mut items = vec![company(c1, "acme")];
        let mut selected = None;

        reconcile(&mut items, &mut selected, c1, &|c| {
            c.plan = Plan::Enterprise
        });

        assert_eq!(items[0].plan, Plan::Enterprise);
        assert!(items[0].is_active);
    }

    #[test]
    fn dedup_keeps_the_first_occurrence_in_order() {
        let mut items = vec![
            company(company_id(1), "a"),
            company(company_id(2), "b"),
            company(company_id(1), "a-dup"),
            company(company_id(3), "c"),
        ];

        dedup_by_id(&mut items);

        let names: Vec<&str> =
            items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
