use crate::endpoints::{health_databases, health_status};
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::model::{DatabaseStatus, HealthStatus};

#[derive(Clone)]
pub struct HealthService {
    http: HttpClient,
}

impl HealthService {
    pub fn new(http: HttpClient) -> Self {
        HealthService { http }
    }

    pub async fn status(&self) -> Result<HealthStatus, ApiError> {
        self.http.get(&health_status(), &[]).await
    }

    /// One entry per backing store.
    pub async fn databases(&self) -> Result<Vec<DatabaseStatus>, ApiError> {
        self.http.get(&health_databases(), &[]).await
    }
}
