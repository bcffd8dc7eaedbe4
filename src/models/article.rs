use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Assumed reading speed when deriving an article's read time.
const WORDS_PER_MINUTE: usize = 200;
/// Extra minute added to the read time when an article carries an image.
const IMAGE_READ_MINUTES: i32 = 1;

/// Input structure for creating an article.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ArticleInput {
    /// The title of the article. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// A short description of the article.
    #[validate(length(min = 1, max = 1000))]
    pub description: String,

    /// The full article body.
    #[validate(length(min = 1))]
    pub body: String,

    /// Optional URL of an image attached to the article.
    /// Image storage itself is handled by an external service.
    pub image: Option<String>,
}

/// Patch structure for updating an article.
///
/// Absent (or empty-string) fields keep their prior values; the read time is
/// recomputed from the merged body and image.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

/// Input structure for replacing an article's tag list wholesale.
#[derive(Debug, Serialize, Deserialize)]
pub struct TagsInput {
    pub tags: Vec<String>,
}

/// Represents an article entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Article {
    /// Unique identifier for the article (UUID v4).
    pub id: Uuid,
    /// URL-safe unique identifier derived from the title.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Optional URL of an attached image.
    pub image: Option<String>,
    /// Estimated reading time in minutes, derived from the body word count.
    pub read_time: i32,
    pub tag_list: Vec<String>,
    /// Identifier of the user who owns the article.
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article as returned by the list endpoint, annotated with whether the
/// requesting user has bookmarked or favorited it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ArticleListItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub image: Option<String>,
    pub read_time: i32,
    pub tag_list: Vec<String>,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub bookmarked: bool,
    pub favorited: bool,
}

impl Article {
    /// Creates a new `Article` instance from `ArticleInput` and the author's id.
    /// Derives the slug and read time, and sets `created_at`/`updated_at` to now.
    pub fn new(input: ArticleInput, author_id: i32) -> Self {
        let now = Utc::now();
        let read_time = read_time(&input.body, input.image.is_some());
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            body: input.body,
            image: input.image,
            read_time,
            tag_list: Vec::new(),
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Article {
    /// Merges a patch over the existing record.
    ///
    /// Absent or empty-string fields keep their prior values. The read time
    /// is recomputed from the merged body and image; the slug is stable
    /// across updates.
    pub fn apply_patch(mut self, patch: ArticleUpdate) -> Self {
        if let Some(title) = non_empty(patch.title) {
            self.title = title;
        }
        if let Some(description) = non_empty(patch.description) {
            self.description = description;
        }
        if let Some(body) = non_empty(patch.body) {
            self.body = body;
        }
        if let Some(image) = non_empty(patch.image) {
            self.image = Some(image);
        }
        self.read_time = read_time(&self.body, self.image.is_some());
        self.updated_at = Utc::now();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Computes an article's estimated read time in minutes.
///
/// Word count divided by the assumed reading speed, rounded up, plus a
/// constant offset when an image is attached.
pub fn read_time(body: &str, has_image: bool) -> i32 {
    let words = body.split_whitespace().count();
    let mut minutes = ((words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE) as i32;
    if has_image {
        minutes += IMAGE_READ_MINUTES;
    }
    minutes
}

/// Derives a URL-safe unique slug from an article title.
///
/// Lowercases the title, collapses runs of non-alphanumeric characters into
/// single hyphens, and appends a short random token so that two articles with
/// the same title get distinct slugs.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    let token = Uuid::new_v4().simple().to_string();
    if slug.is_empty() {
        token[..8].to_string()
    } else {
        format!("{}-{}", slug, &token[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_time_from_word_count() {
        assert_eq!(read_time("", false), 0);
        assert_eq!(read_time("one two three", false), 1);

        let two_hundred_words = "word ".repeat(200);
        assert_eq!(read_time(&two_hundred_words, false), 1);

        let two_hundred_and_one = "word ".repeat(201);
        assert_eq!(read_time(&two_hundred_and_one, false), 2);
    }

    #[test]
    fn test_read_time_image_offset() {
        assert_eq!(read_time("one two three", true), 2);
        assert_eq!(read_time("", true), 1);
    }

    #[test]
    fn test_slugify_shape() {
        let slug = slugify("Hello, World!");
        assert!(slug.starts_with("hello-world-"), "got {}", slug);
        assert_eq!(slug.len(), "hello-world-".len() + 8);

        let slug = slugify("  Multiple   spaces -- and symbols?! ");
        assert!(slug.starts_with("multiple-spaces-and-symbols-"), "got {}", slug);
    }

    #[test]
    fn test_slugify_is_unique_per_call() {
        assert_ne!(slugify("Same Title"), slugify("Same Title"));
    }

    #[test]
    fn test_slugify_degenerate_title() {
        // A title with no usable characters still yields a non-empty slug.
        let slug = slugify("!!!");
        assert_eq!(slug.len(), 8);
        assert!(!slug.starts_with('-'));
    }

    #[test]
    fn test_article_creation() {
        let input = ArticleInput {
            title: "A Day in the Life".to_string(),
            description: "Morning to night".to_string(),
            body: "word ".repeat(450),
            image: Some("https://img.example.com/day.png".to_string()),
        };

        let article = Article::new(input, 7);
        assert_eq!(article.author_id, 7);
        assert!(article.slug.starts_with("a-day-in-the-life-"));
        // ceil(450 / 200) + 1 for the image
        assert_eq!(article.read_time, 4);
        assert!(article.tag_list.is_empty());
    }

    #[test]
    fn test_apply_patch_merges_and_recomputes_read_time() {
        let input = ArticleInput {
            title: "Original".to_string(),
            description: "Original description".to_string(),
            body: "short body".to_string(),
            image: None,
        };
        let article = Article::new(input, 1);
        let original_slug = article.slug.clone();
        assert_eq!(article.read_time, 1);

        let patched = article.apply_patch(ArticleUpdate {
            title: Some("Revised".to_string()),
            description: None,
            body: Some("word ".repeat(600)),
            image: Some("https://img.example.com/pic.png".to_string()),
        });

        assert_eq!(patched.title, "Revised");
        assert_eq!(patched.description, "Original description");
        // ceil(600 / 200) + 1 for the new image
        assert_eq!(patched.read_time, 4);
        assert_eq!(patched.slug, original_slug);
    }

    #[test]
    fn test_apply_patch_empty_strings_keep_prior_values() {
        let input = ArticleInput {
            title: "Keep Me".to_string(),
            description: "Keep this too".to_string(),
            body: "body text".to_string(),
            image: None,
        };
        let article = Article::new(input, 1);

        let patched = article.apply_patch(ArticleUpdate {
            title: Some("".to_string()),
            description: Some("   ".to_string()),
            body: None,
            image: None,
        });

        assert_eq!(patched.title, "Keep Me");
        assert_eq!(patched.description, "Keep this too");
        assert_eq!(patched.body, "body text");
    }

    #[test]
    fn test_article_input_validation() {
        use validator::Validate;

        let valid = ArticleInput {
            title: "Valid Title".to_string(),
            description: "A description".to_string(),
            body: "Some body".to_string(),
            image: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = ArticleInput {
            title: "".to_string(),
            description: "A description".to_string(),
            body: "Some body".to_string(),
            image: None,
        };
        assert!(empty_title.validate().is_err());

        let empty_body = ArticleInput {
            title: "Valid Title".to_string(),
            description: "A description".to_string(),
            body: "".to_string(),
            image: None,
        };
        assert!(empty_body.validate().is_err());
    }
}
