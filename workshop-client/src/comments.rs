use crate::error::ApiError;
use crate::http::{HttpClient, RequestOptions};
use crate::models::{AddCommentRequest, Comment, CommentId, PostId, SortOrder, UpdateCommentRequest};
use crate::query::{CommentsQueryBuilder, QueryParams};
use crate::shape::{expect_empty, expect_list, expect_object};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

/// Optional extras for [`CommentsApi::get_comments`] on top of post and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommentFilters {
    pub author_id: Option<String>,
    pub sort_order: Option<SortOrder>,
}

fn comments_query(
    post_id: PostId,
    page: u32,
    limit: u32,
    extra: Option<&CommentFilters>,
) -> QueryParams {
    let mut builder = CommentsQueryBuilder::new()
        .post_id(post_id)
        .page(page)
        .limit(limit);

    if let Some(extra) = extra {
        if let Some(author) = &extra.author_id {
            builder = builder.author(author.as_str());
        }
        if let Some(order) = extra.sort_order {
            builder = builder.sort_order(order);
        }
    }

    builder.build()
}

#[async_trait]
pub trait CommentsApi {
    async fn get_comments(
        &self,
        post_id: PostId,
        page: u32,
        limit: u32,
        extra: Option<&CommentFilters>,
    ) -> Result<Vec<Comment>, ApiError>;
    async fn add_comment(&self, content: &str, post_id: PostId) -> Result<Comment, ApiError>;
    async fn update_comment(&self, comment_id: CommentId, content: &str)
    -> Result<Comment, ApiError>;
    async fn delete_comment(&self, comment_id: CommentId) -> Result<(), ApiError>;
}

#[async_trait]
impl CommentsApi for HttpClient {
    async fn get_comments(
        &self,
        post_id: PostId,
        page: u32,
        limit: u32,
        extra: Option<&CommentFilters>,
    ) -> Result<Vec<Comment>, ApiError> {
        let options = RequestOptions::get().params(comments_query(post_id, page, limit, extra));
        let response = self.call_api("/comments", options).await?;
        expect_list("get_comments", response)
    }

    async fn add_comment(&self, content: &str, post_id: PostId) -> Result<Comment, ApiError> {
        let payload = AddCommentRequest {
            content: content.to_string(),
            post_id,
        };
        let options = RequestOptions::new(Method::POST).json(&payload)?;
        let response = self.call_api("/comments", options).await?;
        expect_object("add_comment", response)
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let payload = UpdateCommentRequest {
            content: content.to_string(),
        };
        let options = RequestOptions::new(Method::PUT).json(&payload)?;
        let response = self
            .call_api(&format!("/comments/{comment_id}"), options)
            .await?;
        expect_object("update_comment", response)
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<(), ApiError> {
        let response = self
            .call_api(
                &format!("/comments/{comment_id}"),
                RequestOptions::new(Method::DELETE),
            )
            .await?;
        expect_empty("delete_comment", response)
    }
}
