//! Typed wrappers for each backend endpoint.

use fintrack_api_models::{
    Category, ChartData, LoginRequest, ProfileUpdate, RecordId, RegistrationRequest,
    ReportPeriod, Summary, Transaction, User,
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::request::{HttpMethod, RequestOptions};

/// One method per backend operation, all routed through the gateway.
#[derive(Debug, Clone)]
pub struct FinanceApi {
    gateway: ApiGateway,
}

impl FinanceApi {
    /// Wrap a gateway.
    #[must_use]
    pub const fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// `POST /api/auth/login`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<User> {
        self.send(HttpMethod::Post, "/api/auth/login", credentials).await
    }

    /// `POST /api/auth/register`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn register(&self, registration: &RegistrationRequest) -> ApiResult<User> {
        self.send(HttpMethod::Post, "/api/auth/register", registration)
            .await
    }

    /// `GET /api/users/{id}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn profile(&self, user_id: RecordId) -> ApiResult<User> {
        self.gateway.get_json(&user_path(user_id, "")).await
    }

    /// `PUT /api/users/{id}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn update_profile(&self, user_id: RecordId, update: &ProfileUpdate) -> ApiResult<User> {
        self.send(HttpMethod::Put, &user_path(user_id, ""), update)
            .await
    }

    /// `GET /api/users/{id}/transactions`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn transactions(&self, user_id: RecordId) -> ApiResult<Vec<Transaction>> {
        self.gateway
            .get_json(&user_path(user_id, "/transactions"))
            .await
    }

    /// `GET /api/users/{id}/transactions/{tx}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn transaction(&self, user_id: RecordId, tx_id: RecordId) -> ApiResult<Transaction> {
        self.gateway
            .get_json(&user_path(user_id, &format!("/transactions/{tx_id}")))
            .await
    }

    /// `POST /api/users/{id}/transactions`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn create_transaction(
        &self,
        user_id: RecordId,
        transaction: &Transaction,
    ) -> ApiResult<Transaction> {
        self.send(
            HttpMethod::Post,
            &user_path(user_id, "/transactions"),
            transaction,
        )
        .await
    }

    /// `PUT /api/users/{id}/transactions/{tx}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn update_transaction(
        &self,
        user_id: RecordId,
        tx_id: RecordId,
        transaction: &Transaction,
    ) -> ApiResult<Transaction> {
        self.send(
            HttpMethod::Put,
            &user_path(user_id, &format!("/transactions/{tx_id}")),
            transaction,
        )
        .await
    }

    /// `DELETE /api/users/{id}/transactions/{tx}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete_transaction(&self, user_id: RecordId, tx_id: RecordId) -> ApiResult<()> {
        self.delete(&user_path(user_id, &format!("/transactions/{tx_id}")))
            .await
    }

    /// `GET /api/users/{id}/categories`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn categories(&self, user_id: RecordId) -> ApiResult<Vec<Category>> {
        self.gateway
            .get_json(&user_path(user_id, "/categories"))
            .await
    }

    /// `POST /api/users/{id}/categories`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn create_category(&self, user_id: RecordId, category: &Category) -> ApiResult<Category> {
        self.send(HttpMethod::Post, &user_path(user_id, "/categories"), category)
            .await
    }

    /// `PUT /api/users/{id}/categories/{category}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn rename_category(
        &self,
        user_id: RecordId,
        category_id: RecordId,
        category: &Category,
    ) -> ApiResult<Category> {
        self.send(
            HttpMethod::Put,
            &user_path(user_id, &format!("/categories/{category_id}")),
            category,
        )
        .await
    }

    /// `DELETE /api/users/{id}/categories/{category}`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete_category(&self, user_id: RecordId, category_id: RecordId) -> ApiResult<()> {
        self.delete(&user_path(user_id, &format!("/categories/{category_id}")))
            .await
    }

    /// `GET /api/users/{id}/reports/summary?year=Y[&month=M]`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn summary(&self, user_id: RecordId, period: ReportPeriod) -> ApiResult<Summary> {
        let suffix = format!("/reports/summary?{}", period.query());
        self.gateway.get_json(&user_path(user_id, &suffix)).await
    }

    /// `GET /api/users/{id}/reports/category-chart?year=Y&month=M`
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn category_chart(&self, user_id: RecordId, year: i32, month: u32) -> ApiResult<ChartData> {
        let suffix = format!("/reports/category-chart?year={year}&month={month}");
        self.gateway.get_json(&user_path(user_id, &suffix)).await
    }

    async fn send<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let options = RequestOptions::new().method(method).json(body)?;
        self.gateway.request_json(path, options).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.gateway
            .request_empty(path, RequestOptions::new().method(HttpMethod::Delete))
            .await
    }
}

fn user_path(user_id: RecordId, suffix: &str) -> String {
    format!("/api/users/{user_id}{suffix}")
}
