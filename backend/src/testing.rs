//! Helpers for driving the full router in tests.

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use tower::ServiceExt;

use crate::{
    appstate::AppState,
    config::Config,
    create_router,
    model::database::{Database, DatabaseComponent},
    plugins::users::User,
};

pub async fn test_app() -> (Router, AppState) {
    let db = Database::in_memory()
        .await
        .unwrap()
        .initialise_table::<User>()
        .await
        .unwrap();
    let state = AppState::new(db);
    (create_router(state.clone(), &Config::default()), state)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_post(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// The `name=value` pair of the session cookie set by `res`, if any.
pub fn session_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_string(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sign a new user up and return their session cookie.
pub async fn signup(app: &Router, name: &str, email: &str, password: &str) -> String {
    let form = format!(
        "name={}&email={}&password={}",
        urlencoding::encode(name),
        urlencoding::encode(email),
        urlencoding::encode(password)
    );
    let res = app.clone().oneshot(form_post("/signup", &form, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/dashboard");
    session_cookie(&res).expect("signup sets a session cookie")
}
