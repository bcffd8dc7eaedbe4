pub mod article;
pub mod engagement;
pub mod user;

pub use article::{Article, ArticleInput, ArticleListItem, ArticleUpdate, TagsInput};
pub use engagement::{Bookmark, FavoriteArticle, ReactionInput, ReactionKind, ReactionOutcome};
pub use user::{AccountType, User};
