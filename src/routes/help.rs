use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{AddCommentRequest, Comment, CommentAddedResponse, CreateHelpPostRequest, HelpPost};
use crate::routes::AppState;
use crate::services::{AuthenticatedUser, AuthorDirectory, HelpStore};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(list_help_posts))
        .route("/help", web::post().to(create_help_post))
        .route("/help/{id}/comment", web::post().to(add_comment));
}

/// All help posts with their comments, newest first
///
/// GET /api/v1/help
async fn list_help_posts(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posts = state.store.list_help_posts().await?;
    let authors = AuthorDirectory::for_help_posts(state.store.as_ref(), &posts).await?;

    let views: Vec<_> = posts.iter().map(|p| authors.help_post_view(p)).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/v1/help
///
/// Request body:
/// ```json
/// { "title": "string", "description": "string" }
/// ```
async fn create_help_post(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: web::Json<CreateHelpPostRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let post = HelpPost::new(&req.title, &req.description, caller.id);
    let post = state.store.create_help_post(post).await?;

    tracing::info!("User {} created help post {}", caller.id, post.id);

    let authors = AuthorDirectory::for_help_posts(state.store.as_ref(), std::slice::from_ref(&post)).await?;
    Ok(HttpResponse::Created().json(authors.help_post_view(&post)))
}

/// POST /api/v1/help/{id}/comment
///
/// Request body:
/// ```json
/// { "text": "string" }
/// ```
async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    caller: AuthenticatedUser,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let id = path.into_inner();

    let post = state
        .store
        .append_comment(id, Comment::new(&req.text, caller.id))
        .await
        .map_err(|e| ApiError::from_store(e, "Help post not found"))?;

    tracing::debug!("User {} commented on help post {}", caller.id, id);

    let authors = AuthorDirectory::for_help_posts(state.store.as_ref(), std::slice::from_ref(&post)).await?;
    Ok(HttpResponse::Created().json(CommentAddedResponse {
        message: "Comment added successfully".to_string(),
        post: authors.help_post_view(&post),
    }))
}
