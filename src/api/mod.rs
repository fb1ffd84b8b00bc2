pub mod cms;
pub mod error;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::{
    config::Config,
    content::{Post, PostDraft},
};

pub use error::ApiError;

const RETRY_LIMIT: u32 = 3;

/// Remote side of the post list: everything the feed needs to read and write posts.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;
    async fn create_post(&self, token: &str, draft: &PostDraft) -> Result<Post, ApiError>;
    async fn update_post(&self, token: &str, id: &str, post: &Post) -> Result<Post, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl ContentClient {
    fn new(config: &Config) -> Self {
        let permits = config.limit();
        Self {
            client: Client::new(),
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }
    async fn client(&self) -> (ClientWithMiddleware, SemaphorePermit<'_>) {
        let semaphore = self
            .semaphore
            .acquire()
            .await
            .expect("request semaphore is never closed");
        let client = self.client_without_semaphore();
        (client, semaphore)
    }
    fn client_without_semaphore(&self) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRY_LIMIT);

        ClientBuilder::new(self.client.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[tokio::test]
    async fn smallest_limit_still_grants_requests() {
        let config = Config::try_parse_from(["fanz", "--limit", "1", "index"]).unwrap();
        let client = ContentClient::new(&config);

        let (_, permit) = client.client().await;
        assert_eq!(client.semaphore.available_permits(), 0);
        drop(permit);
        let _second = client.client().await;
    }
}
