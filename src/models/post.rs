use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::validation::{clean_list, optional_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reaction {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl Reaction {
    pub const ALL: [Reaction; 6] = [
        Reaction::Like,
        Reaction::Love,
        Reaction::Haha,
        Reaction::Wow,
        Reaction::Sad,
        Reaction::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Like => "LIKE",
            Reaction::Love => "LOVE",
            Reaction::Haha => "HAHA",
            Reaction::Wow => "WOW",
            Reaction::Sad => "SAD",
            Reaction::Angry => "ANGRY",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = ApiError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Reaction::ALL
            .into_iter()
            .find(|r| r.as_str() == upper)
            .ok_or_else(|| {
                ApiError::bad_request(format!(
                    "Invalid reaction type: must be one of {}",
                    Reaction::ALL.map(|r| r.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    /// userId -> reaction
    #[serde(default)]
    pub reactions: BTreeMap<Uuid, Reaction>,
    /// reaction name -> count, always derived from `reactions`
    #[serde(default)]
    pub reaction_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;
    const LABEL: &'static str = "Post";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Post {
    pub fn new(author_id: Uuid, body: PostBody) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            content: body.content,
            image_urls: body.image_urls,
            video_url: body.video_url,
            reactions: BTreeMap::new(),
            reaction_counts: BTreeMap::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggle `reaction` for `user_id`. Returns the user's reaction afterwards.
    pub fn react(&mut self, user_id: Uuid, reaction: Reaction) -> Option<Reaction> {
        let current = if self.reactions.get(&user_id) == Some(&reaction) {
            self.reactions.remove(&user_id);
            None
        } else {
            self.reactions.insert(user_id, reaction);
            Some(reaction)
        };
        self.recount_reactions();
        current
    }

    /// Drop whatever reaction `user_id` has. Returns true if one was removed.
    pub fn clear_reaction(&mut self, user_id: Uuid) -> bool {
        let removed = self.reactions.remove(&user_id).is_some();
        self.recount_reactions();
        removed
    }

    fn recount_reactions(&mut self) {
        let mut counts = BTreeMap::new();
        for reaction in self.reactions.values() {
            *counts.entry(reaction.as_str().to_string()).or_insert(0) += 1;
        }
        self.reaction_counts = counts;
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Result<&mut Comment, ApiError> {
        self.comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| ApiError::not_found("Comment not found"))
    }

    /// Remove a comment and every reply beneath it, at any depth.
    /// Returns how many comments were removed.
    pub fn remove_comment_thread(&mut self, comment_id: Uuid) -> usize {
        let mut doomed = BTreeSet::from([comment_id]);
        loop {
            let before = doomed.len();
            for comment in &self.comments {
                if comment.parent_id.is_some_and(|parent| doomed.contains(&parent)) {
                    doomed.insert(comment.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let before = self.comments.len();
        self.comments.retain(|c| !doomed.contains(&c.id));
        before - self.comments.len()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub content: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub video_url: Option<String>,
}

/// Validated post content
#[derive(Debug)]
pub struct PostBody {
    pub content: String,
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
}

impl PostRequest {
    pub fn validate(self) -> Result<PostBody, ApiError> {
        let body = PostBody {
            content: optional_text(self.content).unwrap_or_default(),
            image_urls: clean_list(self.image_urls),
            video_url: optional_text(self.video_url),
        };

        if body.content.is_empty() && body.image_urls.is_empty() && body.video_url.is_none() {
            return Err(ApiError::validation_error(
                "Post must have content, images, or a video",
                None,
            ));
        }
        Ok(body)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReactionRequest {
    pub reaction: Option<String>,
}

impl ReactionRequest {
    pub fn validate(self) -> Result<Reaction, ApiError> {
        match optional_text(self.reaction) {
            Some(value) => value.parse(),
            None => Err(ApiError::bad_request("Reaction is required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::new(
            Uuid::new_v4(),
            PostRequest {
                content: Some("first bowl".into()),
                ..Default::default()
            }
            .validate()
            .unwrap(),
        )
    }

    #[test]
    fn empty_post_is_rejected() {
        let err = PostRequest {
            content: Some("  ".into()),
            image_urls: Some(vec!["".into()]),
            video_url: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn media_only_post_is_fine() {
        let body = PostRequest {
            video_url: Some("/media/clip.mp4".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(body.content.is_empty());
    }

    fn comment(parent_id: Option<Uuid>) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_name: "theo".into(),
            content: "nice".into(),
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn removing_a_comment_takes_nested_replies() {
        let mut post = post();
        let root = comment(None);
        let reply = comment(Some(root.id));
        let grandchild = comment(Some(reply.id));
        let sibling = comment(None);
        // Replies stored ahead of their parents are still found
        post.comments = vec![grandchild.clone(), reply.clone(), root.clone(), sibling.clone()];

        assert_eq!(post.remove_comment_thread(root.id), 3);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].id, sibling.id);
    }

    #[test]
    fn same_reaction_toggles_off() {
        let mut post = post();
        let user = Uuid::new_v4();

        assert_eq!(post.react(user, Reaction::Like), Some(Reaction::Like));
        assert_eq!(post.reaction_counts["LIKE"], 1);

        assert_eq!(post.react(user, Reaction::Like), None);
        assert!(post.reaction_counts.is_empty());
    }

    #[test]
    fn different_reaction_replaces() {
        let mut post = post();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        post.react(user, Reaction::Like);
        post.react(other, Reaction::Like);
        post.react(user, Reaction::Wow);

        assert_eq!(post.reactions[&user], Reaction::Wow);
        assert_eq!(post.reaction_counts["LIKE"], 1);
        assert_eq!(post.reaction_counts["WOW"], 1);
    }

    #[test]
    fn reaction_parsing_is_case_insensitive() {
        assert_eq!("love".parse::<Reaction>().unwrap(), Reaction::Love);
        assert!("HEART".parse::<Reaction>().is_err());
    }

    #[test]
    fn reactions_serialize_with_string_keys() {
        let mut post = post();
        let user = Uuid::new_v4();
        post.react(user, Reaction::Haha);

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["reactions"][user.to_string()], "HAHA");

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back.reactions[&user], Reaction::Haha);
    }
}
