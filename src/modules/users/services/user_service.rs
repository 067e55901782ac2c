use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::users::models::{
    CreateUserRequest, NewUser, Role, UpdateUserRequest, User,
};
use crate::modules::users::repositories::UserRepository;
use crate::modules::users::services::IdentityProvider;

/// Result of provisioning a staff member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedUser {
    pub user_id: Uuid,
    pub user: User,
}

/// Staff provisioning and profile management
///
/// Every user is a pair: an auth identity in the hosted Auth service and a
/// profile row sharing its id. Creation writes the identity first and removes
/// it again if the profile insert fails.
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    identities: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, identities: Arc<dyn IdentityProvider>) -> Self {
        Self {
            user_repo,
            identities,
        }
    }

    /// Create the auth identity and the profile row
    ///
    /// The initial password is the email address; staff change it through the
    /// password recovery flow.
    pub async fn provision(&self, request: CreateUserRequest) -> Result<ProvisionedUser> {
        let profile = request.into_profile()?;

        let user_id = self
            .identities
            .create_identity(&profile.email, &profile.email)
            .await?;

        info!(user_id = %user_id, role = %profile.role, "auth identity created");

        let new_user = NewUser {
            id: user_id,
            profile,
        };

        match self.user_repo.insert(&new_user).await {
            Ok(user) => Ok(ProvisionedUser { user_id, user }),
            Err(insert_err) => {
                error!(user_id = %user_id, error = %insert_err, "profile insert failed, removing auth identity");
                if let Err(cleanup_err) = self.identities.delete_identity(user_id).await {
                    warn!(
                        user_id = %user_id,
                        error = %cleanup_err,
                        "could not remove orphaned auth identity"
                    );
                }
                Err(insert_err)
            }
        }
    }

    /// Update email on the identity, then the profile row
    pub async fn update(&self, request: UpdateUserRequest) -> Result<User> {
        let (id, profile) = request.into_parts()?;

        self.identities.update_email(id, &profile.email).await?;

        let user = self
            .user_repo
            .update(id, &profile)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;

        info!(user_id = %id, role = %user.role, "user profile updated");
        Ok(user)
    }

    /// Remove the identity first, then the profile row
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.identities.delete_identity(id).await?;

        if !self.user_repo.delete(id).await? {
            warn!(user_id = %id, "auth identity removed but no profile row existed");
        }

        info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<Vec<User>> {
        self.user_repo.list(page, limit).await
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {}", id)))
    }

    /// Load the caller's profile and check its role against `allowed`
    pub async fn require_role(
        &self,
        caller: Uuid,
        allowed: impl Fn(Role) -> bool,
    ) -> Result<User> {
        let user = self
            .user_repo
            .find_by_id(caller)
            .await?
            .ok_or_else(|| AppError::forbidden("No profile for the signed-in user"))?;

        if !allowed(user.role) {
            return Err(AppError::forbidden(format!(
                "Role '{}' is not allowed to perform this action",
                user.role
            )));
        }

        Ok(user)
    }
}
