use axum::http::request::Parts;
use axum_login::{AuthSession, AuthUser};

use crate::{
    error::Error,
    guard::{IdentityProvider, Session},
    model::database::{Database, DatabaseProvider},
    plugins::users::User,
};

/// Identity backed by the axum-login session and the users table.
///
/// The user carried by the session is looked up again by id so that a deleted
/// account is caught on the request that follows it. Stale password hashes are
/// already rejected by axum-login when it loads the session.
#[derive(Clone)]
pub struct AuthIdentity {
    pool: Database,
}

impl AuthIdentity {
    pub fn new(pool: Database) -> Self {
        AuthIdentity { pool }
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Session {
            user_id: user.id(),
            name: user.name.clone(),
            email: user.email.clone(),
            member_since: user.created_at.clone(),
        }
    }
}

impl IdentityProvider for AuthIdentity {
    async fn verified_session(&self, parts: &Parts) -> Result<Session, Error> {
        let user = parts
            .extensions
            .get::<AuthSession<Database>>()
            .and_then(|auth| auth.user.clone())
            .ok_or(Error::SessionUnavailable)?;

        let stored = User::retrieve(user.id(), &self.pool).await?;
        Ok(Session::from(&stored))
    }
}
