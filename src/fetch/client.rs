use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used to issue report requests; wrappers can adjust the request first.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
