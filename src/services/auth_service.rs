// src/services/auth_service.rs
// DOCUMENTATION: Sign in, sign up, sign out
// PURPOSE: Exchange credentials for a session and store it in the context

use crate::client::ApiClient;
use crate::errors::GuideResult;
use crate::models::{LoginRequest, RegisterRequest, Session, User};
use validator::Validate;

pub struct AuthService;

impl AuthService {
    /// POST /auth/login and store the returned session
    pub async fn login(client: &ApiClient, req: &LoginRequest) -> GuideResult<User> {
        req.validate()?;
        let session: Session = client.post("/auth/login", req).await?;
        let user = session.user.clone();
        client.session().login(session).await?;
        Ok(user)
    }

    /// POST /auth/register; the backend signs the new user in
    pub async fn register(client: &ApiClient, req: &RegisterRequest) -> GuideResult<User> {
        req.validate()?;
        let session: Session = client.post("/auth/register", req).await?;
        let user = session.user.clone();
        log::info!("Registered user {}", user.username);
        client.session().login(session).await?;
        Ok(user)
    }

    /// Clear the session locally; tokens are stateless on the backend
    pub async fn logout(client: &ApiClient) -> GuideResult<()> {
        client.session().logout().await
    }
}
