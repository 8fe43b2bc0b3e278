//! Fluent builders for list-endpoint query parameters.
//!
//! Every setter overwrites the previous value for its key and hands the
//! builder back, so calls chain in any order. `build` returns the collected
//! mapping as is: nothing is validated, nothing is dropped.

use crate::models::{ModerationActionType, PostId, PostType, PostsSortType, RateType, SortOrder};
use serde_json::Value;
use std::collections::BTreeMap;

/// Query parameter mapping handed to the HTTP client. Null values are skipped
/// when the query string is encoded, arrays become one pair per element.
pub type QueryParams = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsQueryBuilder {
    params: QueryParams,
}

impl PostsQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn search(self, query: impl Into<String>) -> Self {
        self.set("search_query", query.into())
    }

    pub fn author(self, author_id: impl Into<String>) -> Self {
        self.set("author_id", author_id.into())
    }

    pub fn only_approved(self, flag: bool) -> Self {
        self.set("only_approved", flag)
    }

    pub fn show_declined(self, flag: bool) -> Self {
        self.set("show_declined", flag)
    }

    pub fn post_type(self, post_type: PostType) -> Self {
        self.set("type", post_type.as_str())
    }

    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.set("tags", tags)
    }

    pub fn for_user(self, user_id: impl Into<String>) -> Self {
        self.set("for_user_id", user_id.into())
    }

    pub fn only_favorites(self, flag: bool) -> Self {
        self.set("only_favorites", flag)
    }

    pub fn rating_filter(self, filter: RateType) -> Self {
        self.set("rating_filter", filter.as_str())
    }

    pub fn sort_type(self, sort: PostsSortType) -> Self {
        self.set("sort_type", sort.as_str())
    }

    pub fn sort_order(self, order: SortOrder) -> Self {
        self.set("sort_order", order.as_str())
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    pub fn build(self) -> QueryParams {
        self.params
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsQueryBuilder {
    params: QueryParams,
}

impl CommentsQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn post_id(self, post_id: PostId) -> Self {
        self.set("postID", post_id)
    }

    pub fn author(self, author_id: impl Into<String>) -> Self {
        self.set("author_id", author_id.into())
    }

    pub fn sort_order(self, order: SortOrder) -> Self {
        self.set("sort_order", order.as_str())
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    pub fn build(self) -> QueryParams {
        self.params
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModerationActionsQueryBuilder {
    params: QueryParams,
}

impl ModerationActionsQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn post_id(self, post_id: PostId) -> Self {
        self.set("postID", post_id)
    }

    pub fn moderator(self, moderator_id: impl Into<String>) -> Self {
        self.set("moderator_id", moderator_id.into())
    }

    pub fn action(self, action: ModerationActionType) -> Self {
        self.set("action", action.as_str())
    }

    pub fn sort_order(self, order: SortOrder) -> Self {
        self.set("sort_order", order.as_str())
    }

    pub fn include_post(self, flag: bool) -> Self {
        self.set("include_post", flag)
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    pub fn build(self) -> QueryParams {
        self.params
    }
}
