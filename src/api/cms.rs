use futures::future::join_all;
use log::{debug, info, log_enabled, trace};
use reqwest::header;
use reqwest_middleware::RequestBuilder;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::Config,
    content::{decode_posts, Post, PostDraft},
    user::{AdminUser, NewUser, ProfileUpdate, Role, Session, UserProfile},
};

use super::{ApiError, ContentClient, ContentStore};

#[derive(Debug, Clone)]
pub struct CmsClient {
    inner: ContentClient,
    base: String,
    page_size: u32,
}

impl CmsClient {
    pub fn new(config: &Config) -> Self {
        let inner = ContentClient::new(config);
        let base = config.api().trim_end_matches('/').to_string();
        let page_size = config.page_size();
        Self {
            inner,
            base,
            page_size,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn wrap_request(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        const USER_AGENT: &str = concat!("fanz/", env!("CARGO_PKG_VERSION"));
        let builder = builder
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.bytes().await?.to_vec();

        debug!("{} {}", status.as_u16(), url);
        if log_enabled!(log::Level::Trace) {
            if let Ok(value) = serde_json::from_slice::<Value>(&body) {
                trace!("{}", serde_json::to_string_pretty(&value)?);
            }
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<CmsErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_page(&self, page: u32) -> Result<PostPage, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client.get(self.url("/posts")).query(&[
            ("page", page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sort", "timestamp:desc".to_string()),
        ]);
        self.send(self.wrap_request(request, None)).await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<AdminUser>, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client.get(self.url("/users"));
        self.send(self.wrap_request(request, Some(token))).await
    }

    pub async fn create_user(&self, token: &str, user: &NewUser) -> Result<AdminUser, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client.post(self.url("/users")).json(user);
        self.send(self.wrap_request(request, Some(token))).await
    }

    pub async fn update_user_role(
        &self,
        token: &str,
        id: &str,
        role: Role,
    ) -> Result<AdminUser, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let path = format!("/users/{}/role", urlencoding::encode(id));
        let request = client.put(self.url(&path)).json(&json!({ "role": role }));
        self.send(self.wrap_request(request, Some(token))).await
    }

    pub async fn delete_user(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let path = format!("/users/{}", urlencoding::encode(id));
        let request = client.delete(self.url(&path));
        self.send_raw(self.wrap_request(request, Some(token)))
            .await
            .map(|_| ())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client
            .post(self.url("/auth/local"))
            .json(&json!({ "identifier": username, "password": password }));
        let session: Session = self.send(self.wrap_request(request, None)).await?;
        info!("Logged in as {}", session.profile.name());
        Ok(session)
    }

    /// A token is valid when the CMS accepts it for `/users/me`.
    pub async fn validate_token(&self, token: &str) -> Result<bool, ApiError> {
        match self.get_current_user(token).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get_current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client.get(self.url("/users/me"));
        self.send(self.wrap_request(request, Some(token))).await
    }

    pub async fn update_current_user(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client.put(self.url("/users/me")).json(update);
        self.send(self.wrap_request(request, Some(token))).await
    }
}

impl ContentStore for CmsClient {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let first = self.fetch_page(1).await?;
        let Pagination { page, page_count } = first.meta.pagination;
        debug!("Post list page {} of {}", page, page_count);

        let mut items = first.data;
        let rest = join_all((2..=page_count).map(|page| self.fetch_page(page))).await;
        for page in rest {
            items.extend(page?.data);
        }

        Ok(decode_posts(items))
    }

    async fn create_post(&self, token: &str, draft: &PostDraft) -> Result<Post, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let request = client
            .post(self.url("/posts"))
            .json(&Envelope { data: draft });
        let created: Envelope<Post> = self.send(self.wrap_request(request, Some(token))).await?;
        Ok(created.data)
    }

    async fn update_post(&self, token: &str, id: &str, post: &Post) -> Result<Post, ApiError> {
        let (client, _semaphore) = self.inner.client().await;
        let path = format!("/posts/{}", urlencoding::encode(id));
        let request = client.put(self.url(&path)).json(&Envelope { data: post });
        let updated: Envelope<Post> = match self.send(self.wrap_request(request, Some(token))).await {
            Err(ApiError::Backend { status: 404, .. }) => {
                return Err(ApiError::PostNotFound(id.to_string()))
            }
            other => other?,
        };
        Ok(updated.data)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostPage {
    pub data: Vec<Value>,
    pub meta: PageMeta,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PageMeta {
    pub pagination: Pagination,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_count: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CmsErrorResponse {
    pub error: CmsError,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CmsError {
    pub message: String,
}
