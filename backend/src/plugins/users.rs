use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserID(i64);

#[derive(Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    id: Option<UserID>,
    pub name: String,
    pub email: String,
    pub pw_hash: String,
    pub created_at: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SignupUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl User {
    pub fn new(name: &str, email: &str, pw_hash: &str) -> Self {
        let user = User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            pw_hash: pw_hash.to_string(),
            created_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        };
        debug!("Made new user {:?}", user);
        user
    }
}

mod model {
    use axum_login::AuthUser;
    use sqlx::Executor;

    use crate::{
        error::Error,
        model::database::{Database, DatabaseProvider},
    };

    use super::User;

    impl User {
        pub async fn from_email(email: &str, pool: &Database) -> Result<Self, Error> {
            tracing::debug!(email = %email, "lookup user by email");
            let user: User = sqlx::query_as("select * from users where email = ? ")
                .bind(email)
                .fetch_one(&pool.0)
                .await?;
            tracing::debug!(?user, "user loaded");
            Ok(user)
        }

        pub async fn exists_by_email(pool: &Database, email: &str) -> Result<bool, Error> {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE email = ?1 LIMIT 1")
                    .bind(email)
                    .fetch_optional(&pool.0)
                    .await?;
            Ok(exists.is_some())
        }
    }

    impl std::fmt::Debug for User {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("User")
                .field("id", &self.id)
                .field("name", &self.name)
                .field("email", &self.email)
                .field("created_at", &self.created_at)
                .field("password", &"[REDACTED]")
                .finish()
        }
    }

    impl DatabaseProvider for User {
        type Id = i64;

        async fn initialise_table(pool: Database) -> Result<Database, Error> {
            let creation_attempt = &pool
                .0
                .execute(
                    "
      CREATE TABLE if not exists users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        pw_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT ''
      )
      ",
                )
                .await;
            match creation_attempt {
                Ok(_) => Ok(pool),
                Err(_) => Err(Error::Database(
                    "Failed to create user database tables".into(),
                )),
            }
        }

        async fn create(self, pool: &Database) -> Result<&Database, Error> {
            let attempt = sqlx::query(
                "INSERT INTO users (name, email, pw_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(self.name)
            .bind(self.email)
            .bind(self.pw_hash)
            .bind(self.created_at)
            .execute(&pool.0)
            .await;
            match attempt {
                Ok(_) => Ok(pool),
                Err(_) => Err(Error::Database(
                    "Failed to insert user into database".into(),
                )),
            }
        }

        async fn retrieve(id: Self::Id, pool: &Database) -> Result<Self, Error> {
            let attempt = sqlx::query_as::<_, User>("SELECT * FROM users where id=(?1)")
                .bind(id)
                .fetch_one(&pool.0)
                .await;
            match attempt {
                Ok(user) => Ok(user),
                Err(err) => Err(Error::Database(format!(
                    "Failed to retrieve user {id}: {err:?}"
                ))),
            }
        }
    }

    impl AuthUser for User {
        type Id = i64;

        fn id(&self) -> Self::Id {
            match &self.id {
                Some(id) => id.0,
                None => 0,
            }
        }

        fn session_auth_hash(&self) -> &[u8] {
            self.pw_hash.as_bytes()
        }
    }
}

mod control {
    use axum::{
        Form, Router,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Redirect, Response},
        routing::{get, post},
    };
    use axum_login::AuthSession;
    use tokio::task;
    use tower_sessions::Session;
    use tracing::{debug, error, info, warn};

    use crate::{
        appstate::AppState,
        controller::RouteProvider,
        model::database::{Database, DatabaseProvider},
        toast::{self, Toast},
        views::utils::error_page,
    };

    use super::{
        Credential, SignupUser, User,
        view::{login_page, signup_page},
    };

    const AFTER_LOGIN: &str = "/dashboard";

    impl RouteProvider for User {
        fn provide_routes(router: Router<AppState>) -> Router<AppState> {
            router
                .route("/signup", get(User::signup_page).post(User::signup_request))
                .route("/login", get(User::login_page).post(User::login_request))
                .route("/logout", post(User::logout_request))
        }
    }

    async fn push_toast(session: &Session, toast: Toast) {
        if let Err(err) = toast::push(session, toast).await {
            warn!(?err, "failed to queue toast");
        }
    }

    /// The account exists but no session could be established for it.
    pub(super) async fn signup_login_failed(session: &Session) -> Response {
        push_toast(session, Toast::error("Your account was created. Please sign in.")).await;
        Redirect::to("/login").into_response()
    }

    impl User {
        pub async fn signup_page(auth: AuthSession<Database>, session: Session) -> Response {
            if auth.user.is_some() {
                return Redirect::to(AFTER_LOGIN).into_response();
            }
            let toasts = toast::drain(&session).await;
            (StatusCode::OK, signup_page(&toasts, "", "", None)).into_response()
        }

        pub async fn signup_request(
            mut auth: AuthSession<Database>,
            session: Session,
            State(state): State<AppState>,
            Form(payload): Form<SignupUser>,
        ) -> Response {
            let email = payload.email.trim().to_lowercase();
            let name = payload.name.trim().to_string();
            let pw_len = payload.password.len();
            info!(target: "user.signup", %email, %name, pw_len, "signup request received");

            let valid_email = email.split_once('@').is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty()
            });
            if !valid_email || name.is_empty() || pw_len < 8 {
                warn!(target: "user.signup", %email, %name, pw_len, reason = "invalid_input", "signup rejected");
                let warning = "Enter your name, a valid email and a password of at least 8 characters.";
                return (
                    StatusCode::BAD_REQUEST,
                    signup_page(&[], &name, &email, Some(warning)),
                )
                    .into_response();
            }

            match User::exists_by_email(&state.pool, &email).await {
                Ok(true) => {
                    warn!(target: "user.signup", %email, reason = "duplicate_email", "signup rejected");
                    return (
                        StatusCode::CONFLICT,
                        signup_page(&[], &name, &email, Some("That email is already registered.")),
                    )
                        .into_response();
                }
                Ok(false) => debug!(target: "user.signup", %email, "email available"),
                Err(err) => {
                    error!(target: "user.signup", %email, ?err, reason = "exists_check_failed", "signup failed at duplicate check");
                    return (StatusCode::INTERNAL_SERVER_ERROR, error_page()).into_response();
                }
            }

            let password = payload.password;
            let pw_hash = match task::spawn_blocking(move || password_auth::generate_hash(password)).await {
                Ok(hash) => hash,
                Err(err) => {
                    error!(target: "user.signup", %email, ?err, reason = "hash_failed", "signup failed");
                    return (StatusCode::INTERNAL_SERVER_ERROR, error_page()).into_response();
                }
            };

            let user = User::new(&name, &email, &pw_hash);
            if let Err(err) = user.create(&state.pool).await {
                error!(target: "user.signup", %email, ?err, reason = "db_insert_failed", "signup failed");
                return (
                    StatusCode::CONFLICT,
                    signup_page(&[], &name, &email, Some("Signup failed, please try again.")),
                )
                    .into_response();
            }

            let user = match User::from_email(&email, &state.pool).await {
                Ok(user) => user,
                Err(err) => {
                    error!(target: "user.signup", %email, ?err, reason = "lookup_failed", "failed to load user after signup");
                    return (StatusCode::INTERNAL_SERVER_ERROR, error_page()).into_response();
                }
            };
            if let Err(err) = auth.login(&user).await {
                error!(target: "user.signup", %email, ?err, reason = "login_failed", "auto-login failed after signup");
                return signup_login_failed(&session).await;
            }

            push_toast(&session, Toast::success(format!("Welcome, {}!", user.name))).await;
            info!(target: "user.signup", %email, "signup success, redirecting to dashboard");
            Redirect::to(AFTER_LOGIN).into_response()
        }

        pub async fn login_page(auth: AuthSession<Database>, session: Session) -> Response {
            if auth.user.is_some() {
                return Redirect::to(AFTER_LOGIN).into_response();
            }
            let toasts = toast::drain(&session).await;
            (StatusCode::OK, login_page(&toasts, "", None)).into_response()
        }

        pub async fn login_request(
            mut auth: AuthSession<Database>,
            session: Session,
            Form(payload): Form<Credential>,
        ) -> Response {
            let email = payload.email.trim().to_lowercase();
            match auth.authenticate(payload).await {
                Ok(Some(user)) => {
                    if let Err(err) = auth.login(&user).await {
                        error!(target: "user.login", %email, ?err, "failed to establish session");
                        return (StatusCode::INTERNAL_SERVER_ERROR, error_page()).into_response();
                    }
                    push_toast(&session, Toast::success(format!("Welcome back, {}!", user.name))).await;
                    info!(target: "user.login", %email, "login success");
                    Redirect::to(AFTER_LOGIN).into_response()
                }
                Ok(None) => {
                    info!(target: "user.login", %email, "invalid credentials");
                    (
                        StatusCode::UNAUTHORIZED,
                        login_page(&[], &email, Some("Invalid email or password")),
                    )
                        .into_response()
                }
                Err(err) => {
                    error!(target: "user.login", %email, ?err, "authentication error");
                    (StatusCode::INTERNAL_SERVER_ERROR, error_page()).into_response()
                }
            }
        }

        pub async fn logout_request(mut auth: AuthSession<Database>, session: Session) -> Response {
            match auth.logout().await {
                Ok(Some(user)) => info!(target: "user.login", email = %user.email, "logged out"),
                Ok(None) => debug!(target: "user.login", "logout without a session"),
                Err(err) => warn!(target: "user.login", ?err, "logout failed"),
            }
            push_toast(&session, Toast::success("You have been signed out.")).await;
            Redirect::to("/").into_response()
        }
    }
}

mod view {
    use maud::{Markup, html};

    use crate::{
        toast::Toast,
        views::{navbar::external_navigation, utils::root_layout},
    };

    pub fn signup_page(toasts: &[Toast], name: &str, email: &str, warn: Option<&str>) -> Markup {
        root_layout(
            "Real Estate: Sign up",
            toasts,
            html! {
                (external_navigation())
                main class="auth" {
                    form class="card form" id="signupForm" action="/signup" method="POST" {
                        h2 { "Create an account" }
                        @if let Some(msg) = warn { p class="error" { (msg) } }
                        div class="field" {
                            label class="label" for="name" { "Full name" }
                            input class="input" type="text" id="name" name="name" value=(name) required {}
                        }
                        div class="field" {
                            label class="label" for="email" { "Email" }
                            input class="input" type="email" id="email" name="email" value=(email) required {}
                        }
                        div class="field" {
                            label class="label" for="password" { "Password" }
                            input class="input" type="password" id="password" name="password" minlength="8" required {}
                        }
                        button class="btn btn--primary" type="submit" { "Sign up" }
                        p class="text-muted" { "Already registered? " a href="/login" { "Sign in" } }
                    }
                }
            },
        )
    }

    pub fn login_page(toasts: &[Toast], email: &str, warn: Option<&str>) -> Markup {
        root_layout(
            "Real Estate: Sign in",
            toasts,
            html! {
                (external_navigation())
                main class="auth" {
                    form class="card form" id="loginForm" action="/login" method="POST" {
                        h2 { "Sign in" }
                        @if let Some(msg) = warn { p class="error" { (msg) } }
                        div class="field" {
                            label class="label" for="email" { "Email" }
                            input class="input" type="email" id="email" name="email" value=(email) required {}
                        }
                        div class="field" {
                            label class="label" for="password" { "Password" }
                            input class="input" type="password" id="password" name="password" required {}
                        }
                        button class="btn btn--primary" type="submit" { "Sign in" }
                        p class="text-muted" { "New here? " a href="/signup" { "Create an account" } }
                    }
                }
            },
        )
    }
}
