use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use gwiit_application::{
    AssociationResolver, AuthenticateUseCase, CreateUserUseCase, DeactivateUserUseCase,
    NewUserRequest, ReleaseReferenceUseCase, UpdateUserUseCase,
};
use gwiit_core::{
    EmailClient, OrganizationId, PasswordGenerator, PasswordHasher, Reference, SiteId, User,
    UserChanges, UserFilter, UserId, UserQuery, UserStore, joined_since,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use super::{error::ApiError, id_path::IdPath};
use crate::state::AppState;

type SharedState<U, H, G, E> = State<Arc<AppState<U, H, G, E>>>;

#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: UserId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub badge_barcode: Option<String>,
    pub badge_rfid: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub created_by_id: Option<UserId>,
    pub modified_by_id: Option<UserId>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let ids = &user.identifiers;
        Self {
            id: user.id,
            email: ids.email().map(|email| email.as_str().to_owned()),
            username: ids.username().map(str::to_owned),
            badge_barcode: ids.badge_barcode().map(str::to_owned),
            badge_rfid: ids.badge_rfid().map(str::to_owned),
            full_name: user.full_name(),
            first_name: user.first_name,
            last_name: user.last_name,
            organization_id: user.organization_id,
            site_id: user.site_id,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
            date_created: user.date_created,
            last_modified: user.last_modified,
            created_by_id: user.created_by_id,
            modified_by_id: user.modified_by_id,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub badge_barcode: Option<String>,
    pub badge_rfid: Option<String>,
    pub password: Option<Secret<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub created_by_id: Option<UserId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl From<CreateUserRequest> for NewUserRequest {
    fn from(request: CreateUserRequest) -> Self {
        NewUserRequest {
            email: request.email,
            username: request.username,
            badge_barcode: request.badge_barcode,
            badge_rfid: request.badge_rfid,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            organization_id: request.organization_id,
            site_id: request.site_id,
            created_by_id: request.created_by_id,
            is_active: request.is_active,
            is_staff: request.is_staff,
            is_superuser: request.is_superuser,
        }
    }
}

#[tracing::instrument(name = "Create user", skip_all)]
pub async fn create_user<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let use_case = CreateUserUseCase::new(
        &state.user_store,
        &state.password_hasher,
        &state.password_generator,
        &state.email_client,
    );

    let user = use_case.execute(request.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[tracing::instrument(name = "Get user", skip(state))]
pub async fn get_user<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(user_id): IdPath<UserId>,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let user = state.user_store.get_user(user_id).await?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub badge_barcode: Option<String>,
    pub badge_rfid: Option<String>,
    pub password: Option<Secret<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub modified_by_id: Option<UserId>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        UserChanges {
            email: request.email,
            username: request.username,
            badge_barcode: request.badge_barcode,
            badge_rfid: request.badge_rfid,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            organization_id: request.organization_id,
            site_id: request.site_id,
            is_active: request.is_active,
            is_staff: request.is_staff,
            modified_by_id: request.modified_by_id,
        }
    }
}

#[tracing::instrument(name = "Update user", skip(state, request))]
pub async fn update_user<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(user_id): IdPath<UserId>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let user = UpdateUserUseCase::new(&state.user_store, &state.password_hasher)
        .execute(user_id, request.into())
        .await?;

    Ok(Json(user.into()))
}

#[derive(Deserialize, Debug)]
pub struct DeactivateParams {
    pub modified_by: Option<UserId>,
}

#[tracing::instrument(name = "Deactivate user", skip(state))]
pub async fn deactivate_user<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(user_id): IdPath<UserId>,
    Query(params): Query<DeactivateParams>,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let user = DeactivateUserUseCase::new(&state.user_store)
        .execute(user_id, params.modified_by)
        .await?;

    Ok(Json(user.into()))
}

#[tracing::instrument(name = "Deactivate superuser", skip(state))]
pub async fn deactivate_superuser<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(user_id): IdPath<UserId>,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let user = DeactivateUserUseCase::new(&state.user_store)
        .execute_superuser(user_id)
        .await?;

    Ok(Json(user.into()))
}

/// Scope parameters arrive as raw strings so that a malformed id narrows the
/// result to nothing instead of rejecting the request.
#[derive(Deserialize, Debug, Default)]
pub struct ListUsersParams {
    pub organization_id: Option<String>,
    pub site_id: Option<String>,
    pub active: Option<bool>,
    pub joined_within_days: Option<u32>,
    pub created_by: Option<String>,
}

impl ListUsersParams {
    /// `None` when a scope id does not parse, meaning nothing can match.
    fn to_query(&self, now: DateTime<Utc>) -> Option<UserQuery> {
        let mut query = UserQuery::new();

        if let Some(raw) = &self.organization_id {
            query = query.filter(UserFilter::Organization(raw.trim().parse().ok()?));
        }
        if let Some(raw) = &self.site_id {
            query = query.filter(UserFilter::Site(raw.trim().parse().ok()?));
        }
        if let Some(raw) = &self.created_by {
            query = query.filter(UserFilter::CreatedBy(raw.trim().parse().ok()?));
        }
        if let Some(active) = self.active {
            query = query.filter(UserFilter::Active(active));
        }
        if let Some(days) = self.joined_within_days {
            query = query.filter(UserFilter::JoinedSince(joined_since(days, now)));
        }

        Some(query)
    }
}

#[tracing::instrument(name = "List users", skip(state))]
pub async fn list_users<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let Some(query) = params.to_query(Utc::now()) else {
        return Ok(Json(Vec::new()));
    };

    let users = AssociationResolver::new(&state.user_store)
        .find(&query)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub identifier: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Authenticate", skip_all)]
pub async fn authenticate<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    Json(request): Json<AuthenticateRequest>,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    let user = AuthenticateUseCase::new(&state.user_store, &state.password_hasher)
        .execute(&request.identifier, &request.password)
        .await?;

    Ok(Json(user.into()))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReleaseResponse {
    pub affected: u64,
}

async fn release<U, H, G, E>(
    state: &AppState<U, H, G, E>,
    reference: Reference,
) -> Result<Json<ReleaseResponse>, ApiError>
where
    U: UserStore + 'static,
{
    let affected = ReleaseReferenceUseCase::new(&state.user_store, state.relationships)
        .execute(reference)
        .await?;

    Ok(Json(ReleaseResponse { affected }))
}

/// Called when an organization is removed.
#[tracing::instrument(name = "Release organization", skip(state))]
pub async fn release_organization<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(organization_id): IdPath<OrganizationId>,
) -> Result<Json<ReleaseResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    release(&state, Reference::Organization(organization_id)).await
}

/// Called when a site is removed.
#[tracing::instrument(name = "Release site", skip(state))]
pub async fn release_site<U, H, G, E>(
    State(state): SharedState<U, H, G, E>,
    IdPath(site_id): IdPath<SiteId>,
) -> Result<Json<ReleaseResponse>, ApiError>
where
    U: UserStore + 'static,
    H: PasswordHasher + 'static,
    G: PasswordGenerator + 'static,
    E: EmailClient + 'static,
{
    release(&state, Reference::Site(site_id)).await
}
