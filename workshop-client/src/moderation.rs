use crate::error::ApiError;
use crate::http::{HttpClient, RequestOptions};
use crate::models::{ModerationAction, ModerationActionType, PostId, SortOrder};
use crate::query::{ModerationActionsQueryBuilder, QueryParams};
use crate::shape::expect_list;
use async_trait::async_trait;
use serde::Deserialize;

/// Filters for the moderation log of one post. Requires the `POST_MODERATOR`
/// role on the server side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModerationActionFilters {
    pub moderator_id: Option<String>,
    pub action: Option<ModerationActionType>,
    pub sort_order: Option<SortOrder>,
    pub include_post: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ModerationActionFilters {
    /// The server filters on the `postID` query key, not the path segment,
    /// so the post is repeated here.
    pub fn to_query(&self, post_id: PostId) -> QueryParams {
        let mut builder = ModerationActionsQueryBuilder::new().post_id(post_id);

        if let Some(moderator) = self.moderator_id.as_deref().filter(|m| !m.is_empty()) {
            builder = builder.moderator(moderator);
        }
        if let Some(action) = self.action {
            builder = builder.action(action);
        }
        if let Some(order) = self.sort_order {
            builder = builder.sort_order(order);
        }
        if let Some(flag) = self.include_post {
            builder = builder.include_post(flag);
        }
        if let Some(page) = self.page {
            builder = builder.page(page);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }

        builder.build()
    }
}

#[async_trait]
pub trait ModerationApi {
    async fn get_moderation_actions(
        &self,
        post_id: PostId,
        filters: &ModerationActionFilters,
    ) -> Result<Vec<ModerationAction>, ApiError>;
}

#[async_trait]
impl ModerationApi for HttpClient {
    async fn get_moderation_actions(
        &self,
        post_id: PostId,
        filters: &ModerationActionFilters,
    ) -> Result<Vec<ModerationAction>, ApiError> {
        let options = RequestOptions::get().params(filters.to_query(post_id));
        let endpoint = format!("/posts/{post_id}/moderation-actions");
        let response = self.call_api(&endpoint, options).await?;
        expect_list("get_moderation_actions", response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_map_to_wire_keys() {
        let filters = ModerationActionFilters {
            moderator_id: Some("mod".into()),
            action: Some(ModerationActionType::Decline),
            include_post: Some(false),
            page: Some(1),
            limit: Some(50),
            ..ModerationActionFilters::default()
        };
        let query = filters.to_query(4);
        assert_eq!(query["postID"], json!(4));
        assert_eq!(query["moderator_id"], json!("mod"));
        assert_eq!(query["action"], json!("decline"));
        assert_eq!(query["include_post"], json!(false));
        assert!(!query.contains_key("sort_order"));
    }
}
