//! SeaORM adapter for user repository.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{roles, users};

pub mod dto;

pub use dto::UserCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// A user row joined with its role row.
pub type UserWithRole = (users::Model, Option<roles::Model>);

/// Return the role named `role_name`, inserting it first if it does not exist.
pub async fn ensure_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    role_name: &str,
) -> Result<roles::Model, sea_orm::DbErr> {
    let role_active = roles::ActiveModel {
        role_id: NotSet,
        role_name: Set(role_name.to_string()),
    };

    roles::Entity::insert(role_active)
        .on_conflict(
            OnConflict::column(roles::Column::RoleName)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    roles::Entity::find()
        .filter(roles::Column::RoleName.eq(role_name))
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("roles.role_name not found".to_string()))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let user_active = users::ActiveModel {
        user_id: NotSet,
        username: Set(dto.username),
        password: Set(dto.password_hash),
        role_id: Set(dto.role_id),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    user_active.insert(conn).await
}

pub async fn find_user_with_role_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<UserWithRole>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .find_also_related(roles::Entity)
        .one(conn)
        .await
}

pub async fn find_user_with_role_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<UserWithRole>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id)
        .find_also_related(roles::Entity)
        .one(conn)
        .await
}

pub async fn list_users_with_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<UserWithRole>, sea_orm::DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::UserId)
        .find_also_related(roles::Entity)
        .all(conn)
        .await
}

pub async fn find_role_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    role_name: &str,
) -> Result<Option<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find()
        .filter(roles::Column::RoleName.eq(role_name))
        .one(conn)
        .await
}
