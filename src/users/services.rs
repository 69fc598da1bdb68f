use std::sync::Arc;

use tracing::{error, info, warn};

use super::dto::{ListUsersRequest, PublicUser, UserInput, UserList, UserUpdate};
use super::password::hash_password;
use super::repo::UserStore;
use super::repo_types::{NewUser, UserChanges};
use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Absent or non-positive sizes fall back to the default; large ones are clamped.
pub fn effective_page_size(requested: i64) -> i64 {
    if requested <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        requested.min(MAX_PAGE_SIZE)
    }
}

/// An empty token starts from the beginning; anything else must be a positive id.
pub fn parse_page_token(token: &str) -> ServiceResult<Option<i64>> {
    if token.is_empty() {
        return Ok(None);
    }
    match token.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(ServiceError::invalid_argument(format!(
            "Invalid page token: {token:?}"
        ))),
    }
}

fn require_non_empty(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid_argument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self, req: ListUsersRequest) -> ServiceResult<UserList> {
        let page_size = effective_page_size(req.page_size);
        let after = parse_page_token(&req.page_token).map_err(|e| {
            warn!(page_token = %req.page_token, "rejected page token");
            e
        })?;

        let rows = self.store.list(after, page_size).await.map_err(|e| {
            error!(error = %e, ?after, page_size, "list_users failed");
            ServiceError::Internal("Failed to fetch users")
        })?;

        let next_page_token = rows
            .last()
            .map(|u| u.id.to_string())
            .unwrap_or_default();
        let users: Vec<PublicUser> = rows.into_iter().map(PublicUser::from).collect();

        info!(count = users.len(), ?after, page_size, "listed users");
        Ok(UserList {
            users,
            next_page_token,
        })
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<PublicUser> {
        match self.store.get(id).await {
            Ok(Some(user)) => {
                info!(user_id = id, "retrieved user");
                Ok(user.into())
            }
            Ok(None) => {
                warn!(user_id = id, "user not found");
                Err(ServiceError::NotFound)
            }
            Err(e) => {
                error!(error = %e, user_id = id, "get_user failed");
                Err(ServiceError::Internal("Failed to fetch user"))
            }
        }
    }

    pub async fn create_user(&self, input: UserInput) -> ServiceResult<PublicUser> {
        require_non_empty("first_name", &input.first_name)?;
        require_non_empty("last_name", &input.last_name)?;
        require_non_empty("password", &input.password)?;

        let password_hash = hash_password(&input.password)
            .map_err(|_| ServiceError::Internal("Failed to create user"))?;

        let user = self
            .store
            .create(NewUser {
                first_name: input.first_name,
                last_name: input.last_name,
                phone_number: input.phone_number,
                password_hash,
            })
            .await
            .map_err(|e| {
                error!(error = %e, "create_user failed");
                ServiceError::Internal("Failed to create user")
            })?;

        info!(user_id = user.id, "user created");
        Ok(user.into())
    }

    pub async fn update_user(&self, update: UserUpdate) -> ServiceResult<PublicUser> {
        let id = update.id;
        require_non_empty("first_name", &update.first_name)?;
        require_non_empty("last_name", &update.last_name)?;
        require_non_empty("password", &update.password)?;

        let password_hash = hash_password(&update.password)
            .map_err(|_| ServiceError::Internal("Failed to update user"))?;

        let changes = UserChanges {
            first_name: update.first_name,
            last_name: update.last_name,
            phone_number: update.phone_number,
            password_hash,
            blocked: update.blocked,
        };

        match self.store.update(id, changes).await {
            Ok(Some(user)) => {
                info!(user_id = id, "user updated");
                Ok(user.into())
            }
            Ok(None) => {
                warn!(user_id = id, "user not found");
                Err(ServiceError::NotFound)
            }
            Err(e) => {
                error!(error = %e, user_id = id, "update_user failed");
                Err(ServiceError::Internal("Failed to update user"))
            }
        }
    }

    pub async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        let deleted = self.store.delete(id).await.map_err(|e| {
            error!(error = %e, user_id = id, "delete_user failed");
            ServiceError::Internal("Failed to delete user")
        })?;

        if deleted == 0 {
            warn!(user_id = id, "user not found");
            return Err(ServiceError::NotFound);
        }

        info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn block_user(&self, id: i64) -> ServiceResult<()> {
        self.set_blocked(id, true).await
    }

    pub async fn unblock_user(&self, id: i64) -> ServiceResult<()> {
        self.set_blocked(id, false).await
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> ServiceResult<()> {
        let updated = self.store.set_blocked(id, blocked).await.map_err(|e| {
            error!(error = %e, user_id = id, blocked, "set_blocked failed");
            ServiceError::Internal("Failed to update user status")
        })?;

        if updated == 0 {
            warn!(user_id = id, "user not found");
            return Err(ServiceError::NotFound);
        }

        info!(user_id = id, blocked, "user status updated");
        Ok(())
    }
}
