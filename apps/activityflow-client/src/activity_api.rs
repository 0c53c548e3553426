use activityflow_shared::activity::{ActivityDto, CreateActivityDto, UpdateActivityDto};
use activityflow_shared::category::CategoryDto;
use reqwest::Method;
use uuid::Uuid;

use crate::api_client::ApiClient;
use crate::error::ClientResult;

const BASE: &str = "/api/activities";

pub struct ActivityApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ActivityApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> ClientResult<Vec<ActivityDto>> {
        self.client.send_json(self.client.request(Method::GET, BASE)?).await
    }

    pub async fn get_by_id(&self, id: i64) -> ClientResult<Option<ActivityDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/{id}"))?;
        self.client.send_optional(builder).await
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> ClientResult<Vec<ActivityDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/user/{user_id}"))?;
        self.client.send_json(builder).await
    }

    pub async fn get_by_category(&self, category_id: i64) -> ClientResult<Vec<ActivityDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/category/{category_id}"))?;
        self.client.send_json(builder).await
    }

    pub async fn categories(&self) -> ClientResult<Vec<CategoryDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/categories"))?;
        self.client.send_json(builder).await
    }

    pub async fn create(&self, dto: &CreateActivityDto) -> ClientResult<ActivityDto> {
        let builder = self.client.request(Method::POST, BASE)?.json(dto);
        self.client.send_json(builder).await
    }

    pub async fn update(&self, id: i64, dto: &UpdateActivityDto) -> ClientResult<bool> {
        let builder = self.client.request(Method::PUT, &format!("{BASE}/{id}"))?.json(dto);
        self.client.send_flag(builder).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<bool> {
        let builder = self.client.request(Method::DELETE, &format!("{BASE}/{id}"))?;
        self.client.send_flag(builder).await
    }
}
