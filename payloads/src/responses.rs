use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    CompanyId, EmployeeId, EmployeeRole, HealthStatus, Plan, SecurityEventId,
    Severity, StatsPeriod, SubscriptionStatus,
};

/// A company on the platform, as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub contact_email: String,
    pub plan: Plan,
    pub is_active: bool,
    pub subscription_status: SubscriptionStatus,
    pub employee_count: u32,
    pub monthly_spend: Decimal,
    pub created_at: Timestamp,
}

/// Usage figures nested under a company detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAnalytics {
    pub seats_used: u32,
    pub active_employees: u32,
    pub api_calls_30d: u64,
    pub storage_bytes: u64,
}

/// `GET companies/{id}`: the company with its analytics nested alongside
/// the flat entity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub analytics: CompanyAnalytics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub is_active: bool,
    pub subscription_status: SubscriptionStatus,
    pub created_at: Timestamp,
}

/// Aggregate statistics for one [`StatsPeriod`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub period: StatsPeriod,
    pub total_companies: u64,
    pub active_companies: u64,
    pub suspended_companies: u64,
    pub total_employees: u64,
    pub new_signups: u64,
    pub monthly_revenue: Decimal,
    pub churn_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub latency_ms: u32,
    pub last_checked: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealth>,
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: SecurityEventId,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub actor_email: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// The discriminated result wrapper every admin API operation returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<EnvelopeData<T>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Payload slot of an [`Envelope`]. Some endpoints wrap the payload a
/// second time under a `data` key; both forms must unwrap identically.
/// `Wrapped` is tried first, matching `data.data ?? data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeData<T> {
    Wrapped { data: T },
    Flat(T),
}

impl<T> EnvelopeData<T> {
    pub fn into_inner(self) -> T {
        match self {
            EnvelopeData::Wrapped { data } => data,
            EnvelopeData::Flat(data) => data,
        }
    }
}

impl<T> Envelope<T> {
    /// Normalize the envelope into either its unwrapped payload or the
    /// message to report. Performed once at the request-executor
    /// boundary; nothing downstream re-checks the envelope shape.
    pub fn into_outcome(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data.map(EnvelopeData::into_inner))
        } else {
            Err(self
                .message
                .or(self.error)
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
        }
    }
}

/// One page of a collection fetch, carried inside the envelope's data.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: PageMeta,
}

/// Server-reported pagination metadata. Every field is optional: only
/// keys present in a response overwrite the screen's local pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_flat_data() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#)
                .unwrap();
        assert_eq!(envelope.into_outcome(), Ok(Some(vec![1, 2, 3])));
    }

    #[test]
    fn envelope_unwraps_double_wrapped_data() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(
            r#"{"success": true, "data": {"data": [1, 2, 3]}}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_outcome(), Ok(Some(vec![1, 2, 3])));
    }

    #[test]
    fn wrapped_form_wins_when_payload_also_has_a_data_key() {
        // A Page deserializes from `{"data": ...}` too (all fields have
        // defaults), so the variant order is what keeps the nested form
        // from being mistaken for a flat one.
        let envelope: Envelope<Page<u32>> = serde_json::from_str(
            r#"{"success": true,
                "data": {"data": {"items": [7], "pagination": {"totalCount": 1}}}}"#,
        )
        .unwrap();
        let page = envelope.into_outcome().unwrap().unwrap();
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.pagination.total_count, Some(1));
    }

    #[test]
    fn failure_message_prefers_message_then_error_then_fallback() {
        let envelope: Envelope<()> = serde_json::from_str(
            r#"{"success": false, "message": "m", "error": "e"}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_outcome(), Err("m".to_string()));

        let envelope: Envelope<()> =
            serde_json::from_str(r#"{"success": false, "error": "e"}"#)
                .unwrap();
        assert_eq!(envelope.into_outcome(), Err("e".to_string()));

        let envelope: Envelope<()> =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            envelope.into_outcome(),
            Err("Unknown error occurred".to_string())
        );
    }

    #[test]
    fn page_defaults_missing_items_and_pagination() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination, PageMeta::default());

        let page: Page<u32> = serde_json::from_str(
            r#"{"items": [1], "pagination": {"totalPages": 3}}"#,
        )
        .unwrap();
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.pagination.total_pages, Some(3));
        assert_eq!(page.pagination.total_count, None);
    }

    #[test]
    fn company_parses_wire_format() {
        let company: Company = serde_json::from_str(
            r#"{
                "id": "0e4b4b7c-26ae-4a7e-a905-ad4f30a5a07b",
                "name": "Acme",
                "contactEmail": "ops@acme.example",
                "plan": "growth",
                "isActive": true,
                "subscriptionStatus": "Active",
                "employeeCount": 42,
                "monthlySpend": 2450.5,
                "createdAt": "2024-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(company.plan, Plan::Growth);
        assert!(company.is_active);
        assert_eq!(company.subscription_status, SubscriptionStatus::Active);
    }

    #[test]
    fn company_detail_flattens_entity_fields() {
        let detail: CompanyDetail = serde_json::from_str(
            r#"{
                "id": "0e4b4b7c-26ae-4a7e-a905-ad4f30a5a07b",
                "name": "Acme",
                "contactEmail": "ops@acme.example",
                "plan": "free",
                "isActive": false,
                "subscriptionStatus": "Suspended",
                "employeeCount": 3,
                "monthlySpend": 0,
                "createdAt": "2024-03-01T12:00:00Z",
                "analytics": {
                    "seatsUsed": 3,
                    "activeEmployees": 2,
                    "apiCalls30d": 1200,
                    "storageBytes": 1048576
                }
            }"#,
        )
        .unwrap();
        assert_eq!(detail.company.name, "Acme");
        assert_eq!(detail.analytics.seats_used, 3);
    }
}
