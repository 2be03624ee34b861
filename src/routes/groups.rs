use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateGroupRequest, MessageResponse, StudyGroup};
use crate::routes::AppState;
use crate::services::{AuthenticatedUser, AuthorDirectory, GroupStore};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/groups", web::get().to(list_groups))
        .route("/groups", web::post().to(create_group))
        .route("/groups/{id}/join", web::post().to(join_group))
        .route("/groups/{id}/leave", web::post().to(leave_group));
}

/// Every group with creator and members resolved
///
/// GET /api/v1/groups
async fn list_groups(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let groups = state.store.list_groups().await?;
    let authors = AuthorDirectory::for_groups(state.store.as_ref(), &groups).await?;

    let views: Vec<_> = groups.iter().map(|g| authors.group_view(g)).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Create a group with the caller as creator and first member
///
/// POST /api/v1/groups
///
/// Request body:
/// ```json
/// { "name": "string", "description": "string", "subjects": ["string"] }
/// ```
async fn create_group(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: web::Json<CreateGroupRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let req = req.into_inner();
    let group = StudyGroup::new(req.name.trim(), req.description, req.subjects, caller.id);
    let group = state.store.create_group(group).await?;

    tracing::info!("User {} created study group {}", caller.id, group.id);

    let authors = AuthorDirectory::for_groups(state.store.as_ref(), std::slice::from_ref(&group)).await?;
    Ok(HttpResponse::Created().json(authors.group_view(&group)))
}

/// POST /api/v1/groups/{id}/join
async fn join_group(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    state
        .store
        .add_member(id, caller.id)
        .await
        .map_err(|e| ApiError::from_store(e, "Group not found"))?;

    tracing::info!("User {} joined study group {}", caller.id, id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Joined group successfully")))
}

/// POST /api/v1/groups/{id}/leave
async fn leave_group(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    state
        .store
        .remove_member(id, caller.id)
        .await
        .map_err(|e| ApiError::from_store(e, "Group not found"))?;

    tracing::info!("User {} left study group {}", caller.id, id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Left group successfully")))
}
