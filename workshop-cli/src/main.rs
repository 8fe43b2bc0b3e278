mod logging;

use anyhow::Context;
use clap::Parser;
use logging::init_logging;
use std::path::PathBuf;
use tracing::warn;
use workshop_client::auth::{DEFAULT_AUTH_FILE, roles};
use workshop_client::{
    AuthStore, ClientConfig, CommentFilters, CommentsApi, CreatePostRequest, HttpClient,
    ModerationActionFilters, ModerationActionType, ModerationApi, PostFilters, PostType,
    PostsApi, PostsSortType, RateAction, RateType, SortOrder, UpdatePostRequest,
};

#[derive(Parser, Debug)]
struct Cli {
    /// Full API base URL, overrides WORKSHOP_HOST.
    #[clap(short, long)]
    server: Option<String>,

    #[clap(long, default_value = DEFAULT_AUTH_FILE)]
    auth_file: PathBuf,

    /// Print raw JSON instead of a summary.
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Login {
        #[clap(long)]
        user_id: String,
        #[clap(long = "role")]
        roles: Vec<String>,
    },
    Logout,
    Whoami,
    ListPosts {
        #[clap(long)]
        search: Option<String>,
        #[clap(long)]
        author_id: Option<String>,
        #[clap(long)]
        only_approved: Option<bool>,
        #[clap(long)]
        show_declined: Option<bool>,
        #[clap(long = "type")]
        post_type: Option<PostType>,
        #[clap(long = "tag")]
        tags: Vec<String>,
        #[clap(long)]
        for_user_id: Option<String>,
        #[clap(long)]
        only_favorites: Option<bool>,
        #[clap(long)]
        rating: Option<RateType>,
        #[clap(long)]
        sort_type: Option<PostsSortType>,
        #[clap(long)]
        sort_order: Option<SortOrder>,
        #[clap(long)]
        page: Option<u32>,
        #[clap(long)]
        limit: Option<u32>,
    },
    GetPost {
        id: u64,
    },
    CreatePost {
        /// JSON file holding the post to create.
        #[clap(long)]
        file: PathBuf,
    },
    UpdatePost {
        id: u64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        preview_url: Option<String>,
        #[clap(long = "tag")]
        tags: Vec<String>,
    },
    DeletePost {
        id: u64,
    },
    Favorite {
        id: u64,
    },
    Unfavorite {
        id: u64,
    },
    Rate {
        id: u64,
        rating: RateAction,
    },
    Moderate {
        id: u64,
        action: ModerationActionType,
        #[clap(long)]
        note: Option<String>,
    },
    ListComments {
        post_id: u64,
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 10)]
        limit: u32,
        #[clap(long)]
        author_id: Option<String>,
        #[clap(long)]
        sort_order: Option<SortOrder>,
    },
    AddComment {
        post_id: u64,
        content: String,
    },
    UpdateComment {
        id: u64,
        content: String,
    },
    DeleteComment {
        id: u64,
    },
    ModerationLog {
        post_id: u64,
        #[clap(long)]
        moderator_id: Option<String>,
        #[clap(long)]
        action: Option<ModerationActionType>,
        #[clap(long)]
        sort_order: Option<SortOrder>,
        #[clap(long)]
        include_post: Option<bool>,
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long, default_value_t = 20)]
        limit: u32,
    },
}

/// Role the server checks before running `command`.
fn required_role(command: &Command) -> Option<&'static str> {
    match command {
        Command::CreatePost { .. } | Command::UpdatePost { .. } | Command::DeletePost { .. } => {
            Some(roles::POST_CREATOR)
        }
        Command::Moderate { .. } | Command::ModerationLog { .. } => Some(roles::POST_MODERATOR),
        _ => None,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Cli::parse();
    let store = AuthStore::new(&args.auth_file);

    // Identity commands only touch the local store.
    match &args.command {
        Command::Login { user_id, roles } => {
            let state = store.save(user_id, roles)?;
            println!("Logged in as {} ({})", state.user_id, state.user_roles.join(","));
            return Ok(());
        }
        Command::Logout => {
            store.clear()?;
            println!("Logged out");
            return Ok(());
        }
        Command::Whoami => {
            let state = store.load();
            if state.is_logged_in() {
                println!("{} ({})", state.user_id, state.user_roles.join(","));
            } else {
                println!("Not logged in");
            }
            return Ok(());
        }
        _ => {}
    }

    let config = match args.server.as_deref() {
        Some(server) => ClientConfig::new(server),
        None => ClientConfig::from_env(),
    };
    let state = store.load();
    if let Some(role) = required_role(&args.command) {
        if !state.has_role(role) {
            warn!(user_id = %state.user_id, role, "stored identity lacks the role for this command");
        }
    }
    let client = HttpClient::new(config.with_debug_identity(state.debug_identity()))?;

    match args.command {
        Command::Login { .. } | Command::Logout | Command::Whoami => {}
        Command::ListPosts {
            search,
            author_id,
            only_approved,
            show_declined,
            post_type,
            tags,
            for_user_id,
            only_favorites,
            rating,
            sort_type,
            sort_order,
            page,
            limit,
        } => {
            let filters = PostFilters {
                search_query: search,
                author_id,
                only_approved,
                show_declined,
                post_type,
                tags: (!tags.is_empty()).then_some(tags),
                for_user_id,
                only_favorites,
                rating_filter: rating,
                sort_type,
                sort_order,
                page,
                limit,
            };
            let posts = client.get_posts(&filters).await?;
            if args.json {
                print_json(&posts)?;
            } else {
                println!("Posts ({})", posts.len());
                for post in posts {
                    println!(
                        "- [{}] {} ({}, by {}, rating {})",
                        post.id,
                        post.title,
                        post.post_type.label(),
                        post.author_id,
                        post.rating
                    );
                }
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            if args.json {
                print_json(&post)?;
            } else {
                println!("{}", post);
                for content in &post.contents {
                    let kind = if content.is_link { "link" } else { "data" };
                    println!("  {} [{}]: {}", content.content_type.label(), kind, content.content_data);
                }
            }
        }
        Command::CreatePost { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let request: CreatePostRequest =
                serde_json::from_str(&raw).context("invalid post definition")?;
            let post = client.create_post(&request).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::UpdatePost {
            id,
            title,
            description,
            preview_url,
            tags,
        } => {
            let current = client.get_post(id).await?;
            let mut request = UpdatePostRequest::from(&current);
            if let Some(title) = title {
                request.title = title;
            }
            if let Some(description) = description {
                request.description = description;
            }
            if let Some(preview_url) = preview_url {
                request.preview_url = preview_url;
            }
            if !tags.is_empty() {
                request.tags = tags;
            }
            let post = client.update_post(id, &request).await?;
            println!("Post updated: {}", post);
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
        Command::Favorite { id } => {
            client.favorite_post(id).await?;
            println!("Added to favorites");
        }
        Command::Unfavorite { id } => {
            client.unfavorite_post(id).await?;
            println!("Removed from favorites");
        }
        Command::Rate { id, rating } => {
            client.rate_post(id, rating).await?;
            println!("Rated post {}: {}", id, rating);
        }
        Command::Moderate { id, action, note } => {
            client.moderate_post(id, action, note).await?;
            println!("Post {} moderated: {}", id, action);
        }
        Command::ListComments {
            post_id,
            page,
            limit,
            author_id,
            sort_order,
        } => {
            let extra = CommentFilters {
                author_id,
                sort_order,
            };
            let comments = client
                .get_comments(post_id, page, limit, Some(&extra))
                .await?;
            if args.json {
                print_json(&comments)?;
            } else {
                println!("Comments ({})", comments.len());
                for comment in comments {
                    println!("- [{}] {}: {}", comment.id, comment.author_id, comment.content);
                }
            }
        }
        Command::AddComment { post_id, content } => {
            let comment = client.add_comment(&content, post_id).await?;
            println!("Comment added! ID: {}", comment.id);
        }
        Command::UpdateComment { id, content } => {
            let comment = client.update_comment(id, &content).await?;
            println!("Comment updated: {}", comment);
        }
        Command::DeleteComment { id } => {
            client.delete_comment(id).await?;
            println!("Comment deleted!");
        }
        Command::ModerationLog {
            post_id,
            moderator_id,
            action,
            sort_order,
            include_post,
            page,
            limit,
        } => {
            let filters = ModerationActionFilters {
                moderator_id,
                action,
                sort_order,
                include_post,
                page: Some(page),
                limit: Some(limit),
            };
            let actions = client.get_moderation_actions(post_id, &filters).await?;
            if args.json {
                print_json(&actions)?;
            } else {
                for entry in actions {
                    let post = entry
                        .post
                        .map(|p| p.title)
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "- [{}] {} by {} on {}: {} {}",
                        entry.id, entry.action, entry.moderator_id, entry.created_at, post, entry.note
                    );
                }
            }
        }
    }

    Ok(())
}
