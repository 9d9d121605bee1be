//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;


use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // Public listings
    .route("/", web::get().to(posts::list))
    .route("/search/", web::get().to(posts::search))
    .route("/post/user/{username}/", web::get().to(posts::by_author))
    .route("/post/date/{year}/{month}/", web::get().to(posts::by_date))
    // Must precede /post/{id}/
    .route("/post/new/", web::post().to(posts::create))
    .service(
        web::resource("/post/{id}/")
            .route(web::get().to(posts::detail))
            .route(web::post().to(comments::submit)),
    )
    .service(
        web::resource("/post/{id}/update/")
            .route(web::put().to(posts::update))
            .route(web::post().to(posts::update)),
    )
    .service(
        web::resource("/post/{id}/delete/")
            .route(web::delete().to(posts::delete))
            .route(web::post().to(posts::delete)),
    )
    .route("/comment/{id}/delete/", web::post().to(comments::delete))
    // Auth routes
    .route("/register/", web::post().to(auth::register))
    .service(
        web::resource("/login/")
            .route(web::get().to(auth::login_page))
            .route(web::post().to(auth::login)),
    )
    .route("/health/", web::get().to(health::health_check));
}
