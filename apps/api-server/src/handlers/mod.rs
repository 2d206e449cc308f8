//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod tags;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, http::header, web};

use inkwell_shared::ErrorResponse;

use crate::config::FormLimits;

/// `303 See Other` to the home page.
pub fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Undecodable or oversized form bodies answer with a problem document too.
fn form_config(limits: FormLimits) -> web::FormConfig {
    web::FormConfig::default()
        .limit(limits.body_limit())
        .error_handler(|err, _req| {
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limits: FormLimits) {
    cfg.app_data(form_config(limits))
        .route("/", web::get().to(posts::home))
        // Session routes
        .route("/register/", web::post().to(auth::register))
        .route("/login/", web::post().to(auth::login))
        .route("/logout/", web::post().to(auth::logout))
        .route("/secret/", web::get().to(auth::secret))
        // Posts and tags
        .route("/posts/create/", web::post().to(posts::create_post))
        .route("/posts/{id}/", web::get().to(posts::post_detail))
        .route("/tags/get/", web::get().to(tags::list_tags))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)));
}
