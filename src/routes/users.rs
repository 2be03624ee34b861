use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{BuddyMatchesResponse, ProfileResponse, UpdateProfileRequest, UpdateProfileResponse};
use crate::routes::AppState;
use crate::services::{AuthenticatedUser, UserStore};

/// Configure profile and buddy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    // `/user/matches` must win over `/user/{id}`
    cfg.route("/user/matches", web::get().to(find_study_buddies))
        .route("/user/{id}", web::get().to(get_profile))
        .route("/user/{id}", web::put().to(update_profile));
}

/// Recommended study buddies for the caller
///
/// GET /api/v1/user/matches
///
/// Response body:
/// ```json
/// { "matches": [ { "user": { ... }, "score": 61, "breakdown": { ... } } ] }
/// ```
async fn find_study_buddies(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Finding study buddies for user: {}", caller.id);

    let matches = state
        .matcher
        .find_study_buddies(state.store.as_ref(), caller.id)
        .await
        .map_err(|e| ApiError::from_store(e, "User not found"))?;

    tracing::info!("Returning {} study buddies for user {}", matches.len(), caller.id);

    Ok(HttpResponse::Ok().json(BuddyMatchesResponse { matches }))
}

/// Public profile
///
/// GET /api/v1/user/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let user = state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_store(e, "User not found"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse { user }))
}

/// Update the caller's own profile
///
/// PUT /api/v1/user/{id}
///
/// Request body (every field optional):
/// ```json
/// {
///   "name": "string",
///   "branch": "string",
///   "year": 1,
///   "subjects": ["string"],
///   "skills": [{ "name": "string", "level": "Beginner|Intermediate|Advanced" }],
///   "studyPreference": "Group|One-on-One|Doubt Help",
///   "availability": ["Mon Evening"]
/// }
/// ```
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    caller: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if id != caller.id {
        tracing::info!("User {} attempted to update profile {}", caller.id, id);
        return Err(ApiError::Forbidden(
            "Unauthorized: Cannot update other user's profile".to_string(),
        ));
    }

    req.validate()?;

    let mut req = req.into_inner();
    req.name = req.name.map(|name| name.trim().to_string());

    let user = state
        .store
        .update_profile(id, &req.into_update())
        .await
        .map_err(|e| ApiError::from_store(e, "User not found"))?;

    tracing::info!("Updated profile for user {}", id);

    Ok(HttpResponse::Ok().json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}
