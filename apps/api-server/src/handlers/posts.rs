//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::PublishedPost;
use inkwell_core::ports::FormValidator;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{PostForm, PostResponse, TagResponse};

use super::redirect_home;
use crate::forms::PostFormValidator;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Posts shown on the home page.
const HOME_POST_LIMIT: u64 = 20;

fn post_response(published: PublishedPost) -> PostResponse {
    let PublishedPost { post, tags } = published;
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        title: post.title,
        description: post.description,
        content: post.content,
        preview_img_url: post.preview_img_url,
        post_status: post.status.code().to_string(),
        post_date: post.post_date.to_rfc3339(),
        modified_date: post.modified_date.to_rfc3339(),
        hashtags: tags
            .into_iter()
            .map(|tag| TagResponse {
                id: tag.id.to_string(),
                text: tag.text,
            })
            .collect(),
    }
}

/// POST /posts/create/
///
/// On success the post and its tags are stored and the client is sent
/// home. A rejected form writes nothing.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let validator = PostFormValidator {
        limits: state.forms,
    };
    let submission = validator.validate(form.into_inner()).inspect_err(|errors| {
        tracing::debug!(user = %identity.username, %errors, "Post form rejected");
    })?;

    state.publisher.publish(identity.user_id, submission).await?;

    Ok(redirect_home())
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let published = state
        .posts
        .find_with_tags(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(published))))
}

/// GET / - the most recent posts.
pub async fn home(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .recent(HOME_POST_LIMIT)
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}
