pub mod articles;
pub mod auth;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signup)
            .service(auth::signin)
            .service(auth::social_callback),
    )
    .service(web::scope("/bookmarks").service(articles::get_bookmarks))
    .service(
        web::scope("/articles")
            .service(articles::get_articles)
            .service(articles::create_article)
            .service(articles::set_tags)
            .service(articles::react_to_article)
            .service(articles::bookmark_article)
            .service(articles::remove_bookmark)
            .service(articles::favorite_article)
            .service(articles::remove_favorite)
            .service(articles::get_favorites)
            .service(articles::get_article)
            .service(articles::update_article)
            .service(articles::delete_article),
    );
}
