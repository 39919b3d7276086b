//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::users_sea::{self as users_adapter, UserCreate, UserWithRole};
use crate::errors::domain::{DomainError, InfraErrorKind};

/// User domain model, always carrying its role name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub role_name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Input for [`add`]. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role_name: String,
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    users_adapter::find_user_with_role_by_username(conn, username)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    users_adapter::find_user_with_role_by_id(conn, user_id)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<User>, DomainError> {
    users_adapter::list_users_with_roles(conn)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
}

/// Insert a user, creating its role on first use, and return it joined with the role.
pub async fn add<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<User, DomainError> {
    let role = users_adapter::ensure_role(conn, &new_user.role_name).await?;
    let user = users_adapter::create_user(
        conn,
        UserCreate::new(new_user.username, new_user.password_hash, role.role_id),
    )
    .await?;

    Ok(User::from_parts(user, role))
}

// Conversions between SeaORM models and domain models

impl User {
    fn from_parts(user: crate::entities::users::Model, role: crate::entities::roles::Model) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            role_name: role.role_name,
            password: user.password,
        }
    }
}

impl TryFrom<UserWithRole> for User {
    type Error = DomainError;

    fn try_from((user, role): UserWithRole) -> Result<Self, Self::Error> {
        let role = role.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("user {} references a missing role", user.user_id),
            )
        })?;
        Ok(Self::from_parts(user, role))
    }
}
