//! Read-side entities, wire enumerations and write-side request bodies.
//!
//! Entities are what the API returns; the `*Request` types are what the client
//! sends. Request types never carry server-assigned fields such as
//! identifiers of the post itself or timestamps.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub type PostId = u64;
pub type PostContentId = u64;
pub type CommentId = u64;
pub type ModerationActionId = u64;
pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` over the wire literals of an
/// enum. The literals must match the serde renames on the type.
///
/// `open` types carry an `Other(String)` variant for literals the server
/// stores without checking; parsing never fails for them.
macro_rules! wire_literals {
    (open $ty:ident { $($variant:ident => $lit:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                match self {
                    $($ty::$variant => $lit,)+
                    $ty::Other(raw) => raw,
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($lit => $ty::$variant,)+
                    other => $ty::Other(other.to_string()),
                })
            }
        }
    };
    ($ty:ident, $kind:literal { $($variant:ident => $lit:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $lit),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok($ty::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    GameMode,
    Map,
    MapAndGameMode,
    MapSuite,
    #[serde(untagged)]
    Other(String),
}

wire_literals!(open PostType {
    GameMode => "game_mode",
    Map => "map",
    MapAndGameMode => "map_and_game_mode",
    MapSuite => "map_suite",
});

impl PostType {
    pub fn label(&self) -> &str {
        match self {
            PostType::GameMode => "Game Mode",
            PostType::Map => "Map",
            PostType::MapAndGameMode => "Map and Game Mode",
            PostType::MapSuite => "Map Suite",
            PostType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    SkinSet,
    CustomMap,
    CustomLogic,
    CustomAsset,
    #[serde(untagged)]
    Other(String),
}

wire_literals!(open ContentType {
    SkinSet => "skin_set",
    CustomMap => "custom_map",
    CustomLogic => "custom_logic",
    CustomAsset => "custom_asset",
});

impl ContentType {
    pub fn label(&self) -> &str {
        match self {
            ContentType::SkinSet => "Skin Set",
            ContentType::CustomMap => "Custom Map",
            ContentType::CustomLogic => "Custom Logic",
            ContentType::CustomAsset => "Custom Assets",
            ContentType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Approved,
    Declined,
    #[default]
    Pending,
}

wire_literals!(ModerationStatus, "moderation status" {
    Approved => "approved",
    Declined => "declined",
    Pending => "pending",
});

/// Vote state of the viewer on a post. Also used as the posts rating filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Upvoted,
    Downvoted,
    Voted,
    #[default]
    None,
}

wire_literals!(RateType, "rate type" {
    Upvoted => "upvoted",
    Downvoted => "downvoted",
    Voted => "voted",
    None => "none",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateAction {
    Upvote,
    Downvote,
    Retract,
}

wire_literals!(RateAction, "rate action" {
    Upvote => "upvote",
    Downvote => "downvote",
    Retract => "retract",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationActionType {
    Approve,
    Decline,
}

wire_literals!(ModerationActionType, "moderation action" {
    Approve => "approve",
    Decline => "decline",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostsSortType {
    Popularity,
    BestRated,
    Newest,
    RecentlyUpdated,
    MostDiscussed,
}

wire_literals!(PostsSortType, "sort type" {
    Popularity => "popularity",
    BestRated => "best_rated",
    Newest => "newest",
    RecentlyUpdated => "recently_updated",
    MostDiscussed => "most_discussed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

wire_literals!(SortOrder, "sort order" {
    Asc => "asc",
    Desc => "desc",
});

/// The server encodes empty lists as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostContentId>,
    pub content_type: ContentType,
    /// Literal payload, or a link when `is_link` is set.
    pub content_data: String,
    #[serde(default)]
    pub is_link: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostModerationData {
    #[serde(default)]
    pub status: ModerationStatus,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInteractionData {
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub vote: RateType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[display("Post {{ id: {}, title: {}, author_id: {} }}", id, title, author_id)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub author_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preview_url: String,
    pub post_type: PostType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Render order; kept exactly as received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: Vec<PostContent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub moderation_data: PostModerationData,
    #[serde(default)]
    pub interaction_data: PostInteractionData,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub favorites_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("Comment {{ id: {}, post_id: {}, author_id: {} }}", id, post_id, author_id)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    #[serde(default)]
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationAction {
    pub id: ModerationActionId,
    #[serde(default)]
    pub post: Option<Post>,
    #[serde(default)]
    pub moderator_id: UserId,
    pub action: ModerationActionType,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostContent {
    pub data: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub is_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    pub preview_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub contents: Vec<CreatePostContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostContentRequest {
    /// Set for contents that already exist on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostContentId>,
    pub content_type: ContentType,
    pub content_data: String,
    pub is_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub description: String,
    pub preview_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub contents: Vec<UpdatePostContentRequest>,
}

impl From<&Post> for UpdatePostRequest {
    /// Starting point for an edit: the post as it is now, contents in order.
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            preview_url: post.preview_url.clone(),
            post_type: post.post_type.clone(),
            tags: post.tags.clone(),
            contents: post
                .contents
                .iter()
                .map(|c| UpdatePostContentRequest {
                    id: c.id,
                    content_type: c.content_type.clone(),
                    content_data: c.content_data.clone(),
                    is_link: c.is_link,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePostRequest {
    pub rating: RateAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratePostRequest {
    pub action: ModerationActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
    #[serde(rename = "postID")]
    pub post_id: PostId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_json() -> serde_json::Value {
        json!({
            "id": 12,
            "author_id": "u1",
            "title": "Arena",
            "description": "A small arena",
            "preview_url": "https://cdn.example/p.png",
            "post_type": "map_suite",
            "tags": ["pvp", "small"],
            "contents": [
                {"id": 3, "content_type": "custom_map", "content_data": "b", "is_link": false},
                {"id": 1, "content_type": "custom_logic", "content_data": "https://x/a", "is_link": true},
                {"id": 2, "content_type": "skin_set", "content_data": "c", "is_link": false}
            ],
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z",
            "moderation_data": {"status": "approved", "note": ""},
            "interaction_data": {"is_favorite": true, "vote": "upvoted"},
            "rating": 7,
            "comments_count": 2,
            "favorites_count": 4
        })
    }

    #[test]
    fn post_keeps_content_order() {
        let post: Post = serde_json::from_value(post_json()).unwrap();
        let ids: Vec<_> = post.contents.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
        assert_eq!(post.post_type, PostType::MapSuite);
        assert_eq!(post.moderation_data.status, ModerationStatus::Approved);
        assert_eq!(post.interaction_data.vote, RateType::Upvoted);
    }

    #[test]
    fn update_request_from_post_preserves_contents() {
        let post: Post = serde_json::from_value(post_json()).unwrap();
        let req = UpdatePostRequest::from(&post);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["type"], "map_suite");
        assert_eq!(body["contents"][0]["id"], 3);
        assert_eq!(body["contents"][1]["content_type"], "custom_logic");
        assert_eq!(body["contents"][2]["content_data"], "c");
    }

    #[test]
    fn create_request_uses_wire_names() {
        let req = CreatePostRequest {
            title: "t".into(),
            description: "d".into(),
            preview_url: String::new(),
            post_type: PostType::GameMode,
            tags: vec![],
            contents: vec![CreatePostContent {
                data: "x".into(),
                content_type: ContentType::CustomAsset,
                is_link: false,
            }],
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["type"], "game_mode");
        assert_eq!(body["contents"][0]["type"], "custom_asset");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn moderate_request_omits_missing_note() {
        let req = ModeratePostRequest {
            action: ModerationActionType::Decline,
            note: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"action": "decline"}));
    }

    #[test]
    fn add_comment_request_uses_post_id_key() {
        let req = AddCommentRequest {
            content: "hi".into(),
            post_id: 7,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"content": "hi", "postID": 7})
        );
    }

    #[test]
    fn demo_post_definition_parses() {
        let req: CreatePostRequest =
            serde_json::from_str(include_str!("../../demos/create_post.json")).unwrap();
        assert_eq!(req.post_type, PostType::MapAndGameMode);
        assert_eq!(req.contents[0].content_type, ContentType::CustomMap);
        assert!(req.contents[0].is_link);
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let mut raw = post_json();
        raw["tags"] = json!(null);
        raw["contents"] = json!(null);
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.tags.is_empty());
        assert!(post.contents.is_empty());
    }

    #[test]
    fn unlisted_type_literals_are_kept() {
        let mut raw = post_json();
        raw["post_type"] = json!("skin_set");
        raw["contents"][0]["content_type"] = json!("custom_skin");
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.post_type, PostType::Other("skin_set".into()));
        assert_eq!(post.post_type.label(), "skin_set");
        assert_eq!(post.contents[0].content_type.as_str(), "custom_skin");
        assert_eq!(post.contents[1].content_type, ContentType::CustomLogic);

        let body = serde_json::to_value(UpdatePostRequest::from(&post)).unwrap();
        assert_eq!(body["type"], "skin_set");
        assert_eq!(body["contents"][0]["content_type"], "custom_skin");
        assert_eq!(
            "custom_assets".parse::<ContentType>().unwrap(),
            ContentType::Other("custom_assets".into())
        );
        assert_eq!("map".parse::<PostType>().unwrap(), PostType::Map);
    }

    #[test]
    fn wire_literals_parse_and_display() {
        for sort in PostsSortType::ALL {
            assert_eq!(sort.as_str().parse::<PostsSortType>().unwrap(), *sort);
        }
        assert_eq!(RateType::None.to_string(), "none");
        let err = "sideways".parse::<SortOrder>().unwrap_err();
        assert_eq!(err.to_string(), "unknown sort order 'sideways'");
    }
}
