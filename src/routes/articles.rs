use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{
        Article, ArticleInput, ArticleListItem, ArticleUpdate, Bookmark, FavoriteArticle,
        ReactionInput, ReactionKind, ReactionOutcome, TagsInput,
    },
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const ARTICLE_COLUMNS: &str =
    "id, slug, title, description, body, image, read_time, tag_list, author_id, \
     created_at, updated_at";

/// Creates a new article owned by the authenticated user.
///
/// The slug is derived from the title and the read time from the body word
/// count (plus an offset when an image is attached).
///
/// ## Responses:
/// - `201 Created`: the hydrated article.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: input validation failed.
/// - `500 Internal Server Error`: database failure.
#[post("")]
pub async fn create_article(
    pool: web::Data<PgPool>,
    article_data: web::Json<ArticleInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    article_data.validate()?;

    let article = Article::new(article_data.into_inner(), user.0);

    let created = sqlx::query_as::<_, Article>(&format!(
        "INSERT INTO articles (id, slug, title, description, body, image, read_time, tag_list, author_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {}",
        ARTICLE_COLUMNS
    ))
    .bind(article.id)
    .bind(&article.slug)
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.body)
    .bind(&article.image)
    .bind(article.read_time)
    .bind(&article.tag_list)
    .bind(article.author_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "You have created an article successfully",
        "article": created
    })))
}

/// Lists all articles, annotated per-article with whether the requesting
/// user has bookmarked or favorited it.
///
/// An empty result set is a 404, not an empty success list.
#[get("")]
pub async fn get_articles(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let articles = sqlx::query_as::<_, ArticleListItem>(
        "SELECT a.id, a.slug, a.title, a.description, a.body, a.image, a.read_time,
                a.tag_list, a.author_id, a.created_at, a.updated_at,
                EXISTS(SELECT 1 FROM bookmarks b
                       WHERE b.user_id = $1 AND b.article_slug = a.slug) AS bookmarked,
                EXISTS(SELECT 1 FROM favorite_articles f
                       WHERE f.user_id = $1 AND f.article_slug = a.slug) AS favorited
         FROM articles a
         ORDER BY a.created_at DESC",
    )
    .bind(user.0)
    .fetch_all(&**pool)
    .await?;

    if articles.is_empty() {
        return Err(AppError::NotFound("Article Not found!".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Articles gotten successfully!",
        "article": articles
    })))
}

/// Fetches one article by slug, with aggregate reaction counts.
#[get("/{slug}")]
pub async fn get_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    _user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let (likes, dislikes) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*) FILTER (WHERE reaction = 'like'),
                COUNT(*) FILTER (WHERE reaction = 'dislike')
         FROM reactions WHERE article_id = $1",
    )
    .bind(article.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Article gotten successfully!",
        "article": article,
        "reactions": { "likes": likes, "dislikes": dislikes }
    })))
}

/// Updates an article.
///
/// Only the owning author may modify an article. Absent or empty fields keep
/// their prior values; the read time is recomputed from the merged body.
///
/// ## Responses:
/// - `200 OK`: the refreshed article.
/// - `403 Forbidden`: the caller does not own the article.
/// - `404 Not Found`: no article with this slug.
#[put("/{slug}")]
pub async fn update_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    patch: web::Json<ArticleUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let existing = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found!".into()))?;

    if existing.author_id != user.0 {
        return Err(AppError::Forbidden(
            "You cannot modify an article added by another User".into(),
        ));
    }

    let merged = existing.apply_patch(patch.into_inner());

    let updated = sqlx::query_as::<_, Article>(&format!(
        "UPDATE articles
         SET title = $1, description = $2, body = $3, image = $4, read_time = $5,
             updated_at = $6
         WHERE slug = $7
         RETURNING {}",
        ARTICLE_COLUMNS
    ))
    .bind(&merged.title)
    .bind(&merged.description)
    .bind(&merged.body)
    .bind(&merged.image)
    .bind(merged.read_time)
    .bind(merged.updated_at)
    .bind(&merged.slug)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Article successfully modified",
        "article": updated
    })))
}

/// Deletes an article. Only the owning author may delete it.
#[delete("/{slug}")]
pub async fn delete_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let existing = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found!".into()))?;

    if existing.author_id != user.0 {
        return Err(AppError::Forbidden(
            "You cannot delete an article added by another user".into(),
        ));
    }

    sqlx::query("DELETE FROM articles WHERE slug = $1")
        .bind(&existing.slug)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "article successfully deleted" })))
}

/// Replaces an article's tag list wholesale. Ownership-gated like updates.
#[put("/{slug}/tags")]
pub async fn set_tags(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    tags: web::Json<TagsInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let existing = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    if existing.author_id != user.0 {
        return Err(AppError::Forbidden(
            "You cannot modify an article added by another User".into(),
        ));
    }

    let tags = tags.into_inner().tags;
    sqlx::query("UPDATE articles SET tag_list = $1, updated_at = NOW() WHERE slug = $2")
        .bind(&tags)
        .bind(&existing.slug)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Updated article tags successfully",
        "data": { "tags": tags }
    })))
}

/// Likes or dislikes an article, with toggle semantics.
///
/// A first reaction is created (201), a differing reaction replaces the
/// existing one (200), and resubmitting the identical reaction removes it
/// (200). At most one reaction is live per (user, article) pair.
#[post("/{slug}/reactions")]
pub async fn react_to_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    reaction_data: web::Json<ReactionInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM articles WHERE slug = $1")
        .bind(slug.as_str())
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let existing = sqlx::query_scalar::<_, ReactionKind>(
        "SELECT reaction FROM reactions WHERE user_id = $1 AND article_id = $2",
    )
    .bind(user.0)
    .bind(article_id)
    .fetch_optional(&**pool)
    .await?;

    let requested = reaction_data.reaction;
    let outcome = ReactionOutcome::resolve(existing, requested);

    match outcome {
        ReactionOutcome::Created => {
            sqlx::query(
                "INSERT INTO reactions (user_id, article_id, reaction) VALUES ($1, $2, $3)",
            )
            .bind(user.0)
            .bind(article_id)
            .bind(requested)
            .execute(&**pool)
            .await?;
            Ok(HttpResponse::Created().json(json!({ "message": outcome.message() })))
        }
        ReactionOutcome::Updated => {
            sqlx::query(
                "UPDATE reactions SET reaction = $1, updated_at = NOW()
                 WHERE user_id = $2 AND article_id = $3",
            )
            .bind(requested)
            .bind(user.0)
            .bind(article_id)
            .execute(&**pool)
            .await?;
            Ok(HttpResponse::Ok().json(json!({ "message": outcome.message() })))
        }
        ReactionOutcome::Removed => {
            sqlx::query("DELETE FROM reactions WHERE user_id = $1 AND article_id = $2")
                .bind(user.0)
                .bind(article_id)
                .execute(&**pool)
                .await?;
            Ok(HttpResponse::Ok().json(json!({ "message": outcome.message() })))
        }
    }
}

/// Bookmarks an article for the authenticated user.
///
/// Bookmarking the same article twice is a conflict, not an idempotent
/// success.
#[post("/{slug}/bookmarks")]
pub async fn bookmark_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let already_bookmarked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = $1 AND article_slug = $2)",
    )
    .bind(user.0)
    .bind(&article.slug)
    .fetch_one(&**pool)
    .await?;

    if already_bookmarked {
        return Err(AppError::Conflict(
            "Article has been previously bookmarked".into(),
        ));
    }

    let bookmark = sqlx::query_as::<_, Bookmark>(
        "INSERT INTO bookmarks (user_id, article_slug) VALUES ($1, $2)
         RETURNING id, user_id, article_slug, created_at, updated_at",
    )
    .bind(user.0)
    .bind(&article.slug)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Article bookmarked successfully",
        "data": { "bookmark": bookmark, "title": article.title }
    })))
}

/// Removes a bookmark. Removing a bookmark that does not exist is an error.
#[delete("/{slug}/bookmarks")]
pub async fn remove_bookmark(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND article_slug = $2")
        .bind(user.0)
        .bind(&article.slug)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "This article is not currently bookmarked".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Bookmark removed successfully" })))
}

/// Lists the authenticated user's bookmarked articles, each annotated with
/// whether the user also favorited it.
#[get("")]
pub async fn get_bookmarks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let articles = sqlx::query_as::<_, ArticleListItem>(
        "SELECT a.id, a.slug, a.title, a.description, a.body, a.image, a.read_time,
                a.tag_list, a.author_id, a.created_at, a.updated_at,
                TRUE AS bookmarked,
                EXISTS(SELECT 1 FROM favorite_articles f
                       WHERE f.user_id = $1 AND f.article_slug = a.slug) AS favorited
         FROM bookmarks b
         JOIN articles a ON a.slug = b.article_slug
         WHERE b.user_id = $1
         ORDER BY b.created_at DESC",
    )
    .bind(user.0)
    .fetch_all(&**pool)
    .await?;

    let count = articles.len();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Retrieved Bookmarks",
        "data": { "articles": articles, "articlesCount": count }
    })))
}

/// Favorites an article. Same duplicate semantics as bookmarks, tracked
/// independently.
#[post("/{slug}/favorites")]
pub async fn favorite_article(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let already_favorited = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM favorite_articles WHERE user_id = $1 AND article_slug = $2)",
    )
    .bind(user.0)
    .bind(&article.slug)
    .fetch_one(&**pool)
    .await?;

    if already_favorited {
        return Err(AppError::Conflict(
            "Article has already been favourited".into(),
        ));
    }

    let favorite = sqlx::query_as::<_, FavoriteArticle>(
        "INSERT INTO favorite_articles (user_id, article_slug) VALUES ($1, $2)
         RETURNING id, user_id, article_slug, created_at, updated_at",
    )
    .bind(user.0)
    .bind(&article.slug)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Article favorited successfully",
        "data": favorite
    })))
}

/// Removes a favorite. Removing a favorite that does not exist is an error.
#[delete("/{slug}/favorites")]
pub async fn remove_favorite(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let result =
        sqlx::query("DELETE FROM favorite_articles WHERE user_id = $1 AND article_slug = $2")
            .bind(user.0)
            .bind(&article.slug)
            .execute(&**pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "This article is not currently favorited".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Article successfully removed from list of favorites"
    })))
}

/// Lists the users who favorited an article.
#[get("/{slug}/favorites")]
pub async fn get_favorites(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    _user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let article = find_article(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article Not found!".into()))?;

    let favorites = sqlx::query_as::<_, FavoriteArticle>(
        "SELECT id, user_id, article_slug, created_at, updated_at
         FROM favorite_articles WHERE article_slug = $1
         ORDER BY created_at DESC",
    )
    .bind(&article.slug)
    .fetch_all(&**pool)
    .await?;

    let count = favorites.len();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully retrieved users who favorited this article",
        "data": { "favorites": favorites, "count": count }
    })))
}

async fn find_article(pool: &PgPool, slug: &str) -> Result<Option<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(&format!(
        "SELECT {} FROM articles WHERE slug = $1",
        ARTICLE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(article)
}

#[cfg(test)]
mod tests {
    use crate::models::{article::read_time, ArticleInput};
    use validator::Validate;

    #[test]
    fn test_article_input_validation() {
        let missing_body = ArticleInput {
            title: "A title".to_string(),
            description: "A description".to_string(),
            body: "".to_string(),
            image: None,
        };
        assert!(missing_body.validate().is_err());

        let long_title = ArticleInput {
            title: "a".repeat(201),
            description: "A description".to_string(),
            body: "A body".to_string(),
            image: None,
        };
        assert!(long_title.validate().is_err());

        let valid = ArticleInput {
            title: "A title".to_string(),
            description: "A description".to_string(),
            body: "A body".to_string(),
            image: Some("https://img.example.com/pic.png".to_string()),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_recomputed_read_time_tracks_body_length() {
        let short = read_time("a few words here", false);
        let long = read_time(&"word ".repeat(1000), false);
        assert!(long > short);
    }
}
