//! HTTP implementation of the repository traits.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::endpoint::Endpoint;
use super::envelope::{AffectedCount, BatchMoveBody, CreatedId, Envelope, ErrorBody, MoveAccountBody};
use crate::domain::error::DomainError;
use crate::domain::model::{AccountId, Group, GroupId, RawAccount};
use crate::domain::repository::{
    AccountDraft, AccountRepository, GroupDraft, GroupRepository, Result,
};
use crate::infrastructure::config::ApiConfig;

/// Single-attempt JSON client for the local backend
#[derive(Clone)]
pub struct HttpBackendClient {
    base_url: String,
    client: Client,
}

impl HttpBackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint.path);
        self.client
            .request(endpoint.method.clone(), url)
            .query(&endpoint.query)
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Option<T>> {
        tracing::debug!("{} {}", endpoint.method, endpoint.path);
        Self::execute(self.request(&endpoint)).await
    }

    async fn send_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("{} {} (json body)", endpoint.method, endpoint.path);
        Self::execute(self.request(&endpoint).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<Option<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.msg)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(DomainError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        envelope.into_result()
    }
}

fn required<T>(data: Option<T>, what: &str) -> Result<T> {
    data.ok_or_else(|| DomainError::Decode(format!("response is missing {}", what)))
}

#[async_trait]
impl AccountRepository for HttpBackendClient {
    async fn find_all(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        let rows = self.send(Endpoint::valid_accounts(force_check)).await?;
        Ok(rows.unwrap_or_default())
    }

    async fn find_all_with_groups(&self, force_check: bool) -> Result<Vec<RawAccount>> {
        let rows = self
            .send(Endpoint::valid_accounts_with_groups(force_check))
            .await?;
        Ok(rows.unwrap_or_default())
    }

    async fn create(&self, draft: &AccountDraft) -> Result<()> {
        self.send_json::<_, serde_json::Value>(Endpoint::create_account(), draft)
            .await?;
        Ok(())
    }

    async fn update(&self, draft: &AccountDraft) -> Result<()> {
        self.send_json::<_, serde_json::Value>(Endpoint::update_account(), draft)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> Result<()> {
        self.send::<serde_json::Value>(Endpoint::delete_account(id)).await?;
        Ok(())
    }

    async fn move_to_group(&self, account_id: AccountId, group_id: Option<GroupId>) -> Result<()> {
        let body = MoveAccountBody {
            account_id,
            group_id,
        };
        self.send_json::<_, serde_json::Value>(Endpoint::move_account_to_group(), &body)
            .await?;
        Ok(())
    }

    async fn batch_move_to_group(&self, account_ids: &[AccountId], group_id: GroupId) -> Result<u64> {
        let body = BatchMoveBody {
            account_ids,
            group_id,
        };
        let data: Option<AffectedCount> = self
            .send_json(Endpoint::batch_move_accounts_to_group(), &body)
            .await?;
        Ok(required(data, "affected_count")?.affected_count)
    }
}

#[async_trait]
impl GroupRepository for HttpBackendClient {
    async fn find_all(&self) -> Result<Option<Vec<Group>>> {
        self.send(Endpoint::groups()).await
    }

    async fn create(&self, draft: &GroupDraft) -> Result<GroupId> {
        let data: Option<CreatedId> = self.send_json(Endpoint::create_group(), draft).await?;
        Ok(required(data, "group id")?.id)
    }

    async fn update(&self, id: GroupId, draft: &GroupDraft) -> Result<()> {
        self.send_json::<_, serde_json::Value>(Endpoint::update_group(id), draft)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: GroupId) -> Result<()> {
        self.send::<serde_json::Value>(Endpoint::delete_group(id)).await?;
        Ok(())
    }

    async fn find_accounts(&self, group_id: GroupId) -> Result<Vec<RawAccount>> {
        let rows = self.send(Endpoint::group_accounts(group_id)).await?;
        Ok(rows.unwrap_or_default())
    }
}
