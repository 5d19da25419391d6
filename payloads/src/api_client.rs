use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    CompanyId, EmployeeId, requests,
    responses::{self, Envelope, Page},
};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the admin backend.
pub struct ApiClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl ApiClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn get(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path));

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn get_query(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> ReqwestResult {
        let request =
            self.inner_client.get(self.format_url(path)).query(query);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.put(self.format_url(path)).json(body);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }
}

/// Methods on the admin API
impl ApiClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.get("health_check").await?;
        ok_empty(response).await
    }

    /// List companies matching the merged filter and pagination query.
    pub async fn list_companies(
        &self,
        query: &requests::ListQuery<requests::CompanyFilters>,
    ) -> Result<Envelope<Page<responses::Company>>, ClientError> {
        let response = self.get_query("companies", query).await?;
        ok_envelope(response).await
    }

    /// Get a single company with its nested analytics.
    pub async fn get_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Envelope<responses::CompanyDetail>, ClientError> {
        let response = self.get(&format!("companies/{company_id}")).await?;
        ok_envelope(response).await
    }

    /// Activate or suspend a company.
    pub async fn update_company_status(
        &self,
        company_id: &CompanyId,
        details: &requests::StatusChange,
    ) -> Result<Envelope<responses::Company>, ClientError> {
        let response = self
            .put(&format!("companies/{company_id}/status"), details)
            .await?;
        ok_envelope(response).await
    }

    /// Move a company to a different plan.
    pub async fn update_company_subscription(
        &self,
        company_id: &CompanyId,
        details: &requests::SubscriptionChange,
    ) -> Result<Envelope<responses::Company>, ClientError> {
        let response = self
            .put(&format!("companies/{company_id}/subscription"), details)
            .await?;
        ok_envelope(response).await
    }

    /// Aggregate platform statistics for a time window.
    pub async fn company_stats(
        &self,
        query: &requests::StatsQuery,
    ) -> Result<Envelope<responses::PlatformStats>, ClientError> {
        let response = self.get_query("companies/stats", query).await?;
        ok_envelope(response).await
    }

    pub async fn list_employees(
        &self,
        query: &requests::ListQuery<requests::EmployeeFilters>,
    ) -> Result<Envelope<Page<responses::Employee>>, ClientError> {
        let response = self.get_query("employees", query).await?;
        ok_envelope(response).await
    }

    pub async fn update_employee_status(
        &self,
        employee_id: &EmployeeId,
        details: &requests::StatusChange,
    ) -> Result<Envelope<responses::Employee>, ClientError> {
        let response = self
            .put(&format!("employees/{employee_id}/status"), details)
            .await?;
        ok_envelope(response).await
    }

    pub async fn system_health(
        &self,
    ) -> Result<Envelope<responses::SystemHealth>, ClientError> {
        let response = self.get("system/health").await?;
        ok_envelope(response).await
    }

    pub async fn list_security_events(
        &self,
        query: &requests::ListQuery<requests::SecurityEventFilters>,
    ) -> Result<Envelope<Page<responses::SecurityEvent>>, ClientError> {
        let response = self.get_query("security/events", query).await?;
        ok_envelope(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

/// Deserialize a successful response into the operation's envelope, or
/// return an appropriate error.
pub async fn ok_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Envelope<T>, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<Envelope<T>>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
