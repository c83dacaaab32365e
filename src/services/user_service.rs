use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{CollegeList, CreateUserRequest, UpdateUserRequest},
    entity::{
        Colleges, Users,
        colleges::Column as CollegeCol,
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::{AuthUser, ensure_owner},
    models::User,
    response::{ApiResponse, Meta},
    services::relations::{find_user, user_with_college},
    state::AppState,
};

pub async fn list_colleges(state: &AppState) -> AppResult<ApiResponse<CollegeList>> {
    let items = Colleges::find()
        .order_by_asc(CollegeCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(ApiResponse::success(
        "Colleges",
        CollegeList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_user(
    state: &AppState,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() {
        return Err(AppError::BadRequest("name and email are required".into()));
    }

    let taken = Users::find()
        .filter(UserCol::Email.eq(email.clone()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("User with this email already exists".into()));
    }

    let college = match payload.college_id {
        Some(id) => Colleges::find_by_id(id).one(&state.orm).await?,
        None => {
            Colleges::find()
                .order_by_asc(CollegeCol::CreatedAt)
                .one(&state.orm)
                .await?
        }
    }
    .ok_or_else(|| AppError::not_found("College"))?;

    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        avatar: Set(payload.avatar),
        year: Set(payload.year),
        department: Set(payload.department),
        college_id: Set(college.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| conflict_on_unique(err, "User with this email already exists"))?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_create",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        user_with_college(&state.orm, user).await?,
        Some(Meta::empty()),
    ))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let user = find_user(&state.orm, id).await?;
    Ok(ApiResponse::success(
        "User",
        user_with_college(&state.orm, user).await?,
        None,
    ))
}

pub async fn update_user(
    state: &AppState,
    caller: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_owner(caller, id, "update your own profile")?;
    let existing = find_user(&state.orm, id).await?;

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        active.name = Set(name);
    }
    if let Some(avatar) = payload.avatar {
        active.avatar = Set(avatar);
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(department) = payload.department {
        active.department = Set(department);
    }
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        user_with_college(&state.orm, user).await?,
        Some(Meta::empty()),
    ))
}
