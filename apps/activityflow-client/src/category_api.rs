use activityflow_shared::category::{CategoryDto, CreateCategoryDto, UpdateCategoryDto};
use reqwest::Method;

use crate::api_client::ApiClient;
use crate::error::ClientResult;

const BASE: &str = "/api/categories";

pub struct CategoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> ClientResult<Vec<CategoryDto>> {
        self.client.send_json(self.client.request(Method::GET, BASE)?).await
    }

    pub async fn get_by_id(&self, id: i64) -> ClientResult<Option<CategoryDto>> {
        let builder = self.client.request(Method::GET, &format!("{BASE}/{id}"))?;
        self.client.send_optional(builder).await
    }

    pub async fn create(&self, dto: &CreateCategoryDto) -> ClientResult<CategoryDto> {
        let builder = self.client.request(Method::POST, BASE)?.json(dto);
        self.client.send_json(builder).await
    }

    /// `None` when the category does not exist.
    pub async fn update(&self, id: i64, dto: &UpdateCategoryDto) -> ClientResult<Option<CategoryDto>> {
        let builder = self.client.request(Method::PUT, &format!("{BASE}/{id}"))?.json(dto);
        self.client.send_optional(builder).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<bool> {
        let builder = self.client.request(Method::DELETE, &format!("{BASE}/{id}"))?;
        self.client.send_flag(builder).await
    }
}
