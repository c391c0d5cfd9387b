// src/services/user_service.rs
// DOCUMENTATION: Profiles and user administration
// PURPOSE: Call /users endpoints and keep the session profile in sync

use crate::client::{ApiClient, FileUpload};
use crate::errors::{GuideError, GuideResult};
use crate::models::{UpdateUserRequest, User};
use validator::Validate;

pub struct UserService;

impl UserService {
    /// GET /users (admin)
    pub async fn list(client: &ApiClient) -> GuideResult<Vec<User>> {
        client.session().require_admin().await?;
        client.get("/users").await
    }

    /// GET /users/{id}
    pub async fn get(client: &ApiClient, id: i64) -> GuideResult<User> {
        client.get(&format!("/users/{}", id)).await
    }

    /// PUT /users/{id}
    /// DOCUMENTATION: Users edit their own profile; admins may edit anyone and change roles
    pub async fn update(client: &ApiClient, id: i64, req: &UpdateUserRequest) -> GuideResult<User> {
        let current = client.session().require_user().await?;
        if current.id != id && !current.is_admin() {
            return Err(GuideError::Forbidden);
        }
        if req.role.is_some() && !current.is_admin() {
            return Err(GuideError::Forbidden);
        }
        req.validate()?;

        let user: User = client.put(&format!("/users/{}", id), req).await?;
        client.session().update_user(user.clone()).await?;
        Ok(user)
    }

    /// DELETE /users/{id} (admin)
    pub async fn delete(client: &ApiClient, id: i64) -> GuideResult<()> {
        let admin = client.session().require_admin().await?;
        if admin.id == id {
            return Err(GuideError::InvalidArgument(
                "admins cannot delete their own account".to_string(),
            ));
        }
        client.delete(&format!("/users/{}", id)).await?;
        log::info!("Deleted user {}", id);
        Ok(())
    }

    /// POST /users/{id}/avatar
    pub async fn upload_avatar(client: &ApiClient, id: i64, avatar: &FileUpload) -> GuideResult<User> {
        let current = client.session().require_user().await?;
        if current.id != id && !current.is_admin() {
            return Err(GuideError::Forbidden);
        }
        avatar.validate_image()?;

        let user: User = client
            .upload(&format!("/users/{}/avatar", id), "avatar", avatar)
            .await?;
        client.session().update_user(user.clone()).await?;
        Ok(user)
    }
}
