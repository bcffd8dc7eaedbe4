use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's like/dislike signal on an article.
/// Corresponds to the `reaction_kind` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

/// Request payload for reacting to an article.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReactionInput {
    pub reaction: ReactionKind,
}

/// Outcome of submitting a reaction against whatever reaction already exists
/// for the (user, article) pair.
///
/// At most one reaction is live per pair: a first submission creates it, a
/// differing submission replaces it, and resubmitting the identical value
/// removes it (toggle semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Created,
    Updated,
    Removed,
}

impl ReactionOutcome {
    /// The pure three-outcome transition, independent of any store call.
    pub fn resolve(existing: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match existing {
            None => ReactionOutcome::Created,
            Some(current) if current == requested => ReactionOutcome::Removed,
            Some(_) => ReactionOutcome::Updated,
        }
    }

    /// User-facing message for the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            ReactionOutcome::Created => "Successfully added reaction",
            ReactionOutcome::Updated => "Successfully updated reaction",
            ReactionOutcome::Removed => "Successfully removed reaction",
        }
    }
}

/// A saved-article marker, one per (user, article) pair.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: i32,
    pub user_id: i32,
    pub article_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A favorite marker, tracked independently of bookmarks with the same
/// one-per-pair rule.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FavoriteArticle {
    pub id: i32,
    pub user_id: i32,
    pub article_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
