use std::ops::Deref;

use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use password_auth::verify_password;
use sqlx::{Pool, Sqlite};
use tokio::task;

use crate::{
    error::Error,
    plugins::users::{Credential, User},
};

#[derive(Clone, Debug)]
pub struct Database(pub Pool<Sqlite>);

impl Database {
    pub async fn new_with_filename(filename: &str) -> Result<Self, Error> {
        let opt = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(filename)
            .create_if_missing(true);
        match sqlx::sqlite::SqlitePool::connect_with(opt).await {
            Ok(pool) => Ok(Database(pool)),
            Err(err) => Err(Error::Database(format!(
                "Failed to open database {filename}: {err:?}"
            ))),
        }
    }

    /// Every sqlite in-memory connection is its own database, so the pool is
    /// pinned to one connection that never expires.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, Error> {
        use std::str::FromStr;

        let opt = sqlx::sqlite::SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await?;
        Ok(Database(pool))
    }
}

impl Deref for Database {
    type Target = Pool<Sqlite>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub trait DatabaseComponent
where
    Self: Sized,
{
    async fn initialise_table<T: DatabaseProvider>(self) -> Result<Self, Error>;
}

pub trait DatabaseProvider
where
    Self: Sized,
{
    type Id;
    async fn initialise_table(pool: Database) -> Result<Database, Error>;
    async fn create(self, pool: &Database) -> Result<&Database, Error>;
    async fn retrieve(id: Self::Id, pool: &Database) -> Result<Self, Error>;
}

impl DatabaseComponent for Database {
    async fn initialise_table<T: DatabaseProvider>(self) -> Result<Self, Error> {
        T::initialise_table(self).await
    }
}

#[async_trait]
impl AuthnBackend for Database {
    type User = User;
    type Credentials = Credential;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let user: Option<Self::User> = sqlx::query_as("select * from users where email = ? ")
            .bind(creds.email.trim().to_lowercase())
            .fetch_optional(&self.0)
            .await?;

        // Hash verification is slow and blocking.
        task::spawn_blocking(move || {
            Ok(user.filter(|user| verify_password(&creds.password, &user.pw_hash).is_ok()))
        })
        .await?
    }

    /// Runs on every request through the auth layer. A lookup failure is treated
    /// as "nobody signed in" so that guarded pages redirect to the login page.
    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        match sqlx::query_as("select * from users where id = ?")
            .bind(user_id)
            .fetch_optional(&self.0)
            .await
        {
            Ok(user) => Ok(user),
            Err(err) => {
                tracing::warn!(
                    target: "auth.guard",
                    user_id,
                    ?err,
                    "user lookup failed, treating session as signed out"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_user_on_a_closed_pool_reports_no_user() {
        let db = Database::in_memory()
            .await
            .unwrap()
            .initialise_table::<User>()
            .await
            .unwrap();
        db.0.close().await;

        assert!(matches!(db.get_user(&1).await, Ok(None)));
    }
}
