use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Wrapping `reqwest::Client` behind this seam
/// lets the backend client run against canned responses in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
