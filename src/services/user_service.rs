// src/services/user_service.rs

use sqlx::{Executor, Sqlite};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::user::{User, UserPayload},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn create_user<'e, E>(&self, executor: E, payload: &UserPayload) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        payload.validate()?;
        let user = self.user_repo.create_user(executor, payload).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "usuário criado");
        Ok(user)
    }

    pub async fn get_user<'e, E>(&self, executor: E, id: Uuid) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.user_repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::RecordNotFound { entity: "Usuário", id })
    }

    pub async fn find_by_username<'e, E>(&self, executor: E, username: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.user_repo.find_by_username(executor, username).await
    }

    pub async fn list_users<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.user_repo.list(executor).await
    }
}
