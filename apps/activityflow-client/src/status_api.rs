use activityflow_shared::status::{CreateStatusDto, StatusDto, UpdateStatusDto};
use reqwest::Method;

use crate::api_client::ApiClient;
use crate::error::ClientResult;

const BASE: &str = "/api/statuses";

pub struct StatusApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StatusApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> ClientResult<Vec<StatusDto>> {
        self.client.send_json(self.client.request(Method::GET, BASE)?).await
    }

    pub async fn get_by_id(&self, id: i64) -> ClientResult<Option<StatusDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/{id}"))?;
        self.client.send_optional(builder).await
    }

    /// Admin only.
    pub async fn create(&self, dto: &CreateStatusDto) -> ClientResult<StatusDto> {
        let builder = self.client.request(Method::POST, BASE)?.json(dto);
        self.client.send_json(builder).await
    }

    pub async fn update(&self, id: i64, dto: &UpdateStatusDto) -> ClientResult<Option<StatusDto>> {
        let builder = self.client.request(Method::PUT, &format!("{BASE}/{id}"))?.json(dto);
        self.client.send_optional(builder).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<bool> {
        let builder = self.client.request(Method::DELETE, &format!("{BASE}/{id}"))?;
        self.client.send_flag(builder).await
    }
}
