//! Tag lookup for the tag input's autocompletion.

use actix_web::{HttpResponse, web};

use inkwell_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /tags/get/ - every known tag text, sorted.
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let texts: Vec<String> = state
        .tags
        .all()
        .await?
        .into_iter()
        .map(|tag| tag.text)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(texts)))
}
