use crate::error::ApiError;
use crate::http::{HttpClient, RequestOptions};
use crate::models::{
    CreatePostRequest, ModerationActionType, ModeratePostRequest, Post, PostId, PostType,
    PostsSortType, RateAction, RatePostRequest, RateType, SortOrder, UpdatePostRequest,
};
use crate::query::{PostsQueryBuilder, QueryParams};
use crate::shape::{expect_empty, expect_list, expect_object};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

/// Filters accepted by [`PostsApi::get_posts`]. Each field feeds exactly one
/// builder setter. When deserialized, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostFilters {
    pub search_query: Option<String>,
    pub author_id: Option<String>,
    pub only_approved: Option<bool>,
    pub show_declined: Option<bool>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub tags: Option<Vec<String>>,
    pub for_user_id: Option<String>,
    pub only_favorites: Option<bool>,
    pub rating_filter: Option<RateType>,
    pub sort_type: Option<PostsSortType>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PostFilters {
    /// Builds the query for `GET /posts`. Boolean flags are sent whenever
    /// they are set, `false` included. Empty strings and a zero page or limit
    /// count as unset.
    pub fn to_query(&self) -> QueryParams {
        let mut builder = PostsQueryBuilder::new();

        if let Some(query) = non_empty(&self.search_query) {
            builder = builder.search(query);
        }
        if let Some(author) = non_empty(&self.author_id) {
            builder = builder.author(author);
        }
        if let Some(flag) = self.only_approved {
            builder = builder.only_approved(flag);
        }
        if let Some(flag) = self.show_declined {
            builder = builder.show_declined(flag);
        }
        if let Some(post_type) = &self.post_type {
            builder = builder.post_type(post_type.clone());
        }
        if let Some(tags) = &self.tags {
            builder = builder.tags(tags.iter().cloned());
        }
        if let Some(user) = non_empty(&self.for_user_id) {
            builder = builder.for_user(user);
        }
        if let Some(flag) = self.only_favorites {
            builder = builder.only_favorites(flag);
        }
        if let Some(filter) = self.rating_filter {
            builder = builder.rating_filter(filter);
        }
        if let Some(sort) = self.sort_type {
            builder = builder.sort_type(sort);
        }
        if let Some(order) = self.sort_order {
            builder = builder.sort_order(order);
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            builder = builder.page(page);
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            builder = builder.limit(limit);
        }

        let mut query = builder.build();
        query.retain(|_, value| !value.is_null());
        query
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[async_trait]
pub trait PostsApi {
    async fn get_posts(&self, filters: &PostFilters) -> Result<Vec<Post>, ApiError>;
    async fn get_post(&self, post_id: PostId) -> Result<Post, ApiError>;
    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError>;
    async fn update_post(
        &self,
        post_id: PostId,
        request: &UpdatePostRequest,
    ) -> Result<Post, ApiError>;
    async fn delete_post(&self, post_id: PostId) -> Result<(), ApiError>;
    async fn favorite_post(&self, post_id: PostId) -> Result<(), ApiError>;
    async fn unfavorite_post(&self, post_id: PostId) -> Result<(), ApiError>;
    async fn rate_post(&self, post_id: PostId, rating: RateAction) -> Result<(), ApiError>;
    async fn moderate_post(
        &self,
        post_id: PostId,
        action: ModerationActionType,
        note: Option<String>,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl PostsApi for HttpClient {
    async fn get_posts(&self, filters: &PostFilters) -> Result<Vec<Post>, ApiError> {
        let options = RequestOptions::get().params(filters.to_query());
        let response = self.call_api("/posts", options).await?;
        expect_list("get_posts", response)
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, ApiError> {
        let response = self
            .call_api(&format!("/posts/{post_id}"), RequestOptions::get())
            .await?;
        expect_object("get_post", response)
    }

    async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        let options = RequestOptions::new(Method::POST).json(request)?;
        let response = self.call_api("/posts", options).await?;
        expect_object("create_post", response)
    }

    async fn update_post(
        &self,
        post_id: PostId,
        request: &UpdatePostRequest,
    ) -> Result<Post, ApiError> {
        let options = RequestOptions::new(Method::PUT).json(request)?;
        let response = self.call_api(&format!("/posts/{post_id}"), options).await?;
        expect_object("update_post", response)
    }

    async fn delete_post(&self, post_id: PostId) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::DELETE).json(&json!({}))?;
        let response = self.call_api(&format!("/posts/{post_id}"), options).await?;
        expect_empty("delete_post", response)
    }

    async fn favorite_post(&self, post_id: PostId) -> Result<(), ApiError> {
        let response = self
            .call_api(
                &format!("/posts/{post_id}/favorite"),
                RequestOptions::new(Method::POST),
            )
            .await?;
        expect_empty("favorite_post", response)
    }

    async fn unfavorite_post(&self, post_id: PostId) -> Result<(), ApiError> {
        let response = self
            .call_api(
                &format!("/posts/{post_id}/favorite"),
                RequestOptions::new(Method::DELETE),
            )
            .await?;
        expect_empty("unfavorite_post", response)
    }

    async fn rate_post(&self, post_id: PostId, rating: RateAction) -> Result<(), ApiError> {
        let options = RequestOptions::new(Method::POST).json(&RatePostRequest { rating })?;
        let response = self
            .call_api(&format!("/posts/{post_id}/rate"), options)
            .await?;
        expect_empty("rate_post", response)
    }

    async fn moderate_post(
        &self,
        post_id: PostId,
        action: ModerationActionType,
        note: Option<String>,
    ) -> Result<(), ApiError> {
        let payload = ModeratePostRequest { action, note };
        let options = RequestOptions::new(Method::POST).json(&payload)?;
        let response = self
            .call_api(&format!("/posts/{post_id}/moderate"), options)
            .await?;
        expect_empty("moderate_post", response)
    }
}
