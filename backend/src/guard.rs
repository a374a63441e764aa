//! Session guard for the protected page subtree.
//!
//! Every request routed through a guarded router asks an [`IdentityProvider`] for
//! the current verified session exactly once. A verified [`Session`] lets the
//! request through and the inner response is returned as is. Any failure, whatever
//! its cause, ends the request with a redirect to [`LOGIN_PATH`].

use std::future::Future;

use axum::{
    Router,
    extract::{Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::error::Error;

pub const LOGIN_PATH: &str = "/login";

/// A verified, logged-in identity. Handlers behind the guard can read it with
/// `Extension<Session>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub member_since: String,
}

pub trait IdentityProvider: Clone + Send + Sync + 'static {
    /// Fetch the verified session for the request described by `parts`.
    fn verified_session(
        &self,
        parts: &Parts,
    ) -> impl Future<Output = Result<Session, Error>> + Send;
}

#[derive(Debug)]
pub enum GuardOutcome {
    Authorized(Session),
    Redirecting(Redirect),
}

pub async fn check<P: IdentityProvider>(provider: &P, parts: &Parts) -> GuardOutcome {
    let path = parts.uri.path();
    match provider.verified_session(parts).await {
        Ok(session) => {
            debug!(target: "auth.guard", %path, user_id = session.user_id, "session verified");
            GuardOutcome::Authorized(session)
        }
        Err(err) => {
            info!(target: "auth.guard", %path, %err, "no verified session, redirecting to login");
            GuardOutcome::Redirecting(Redirect::to(LOGIN_PATH))
        }
    }
}

pub async fn require_session<P: IdentityProvider>(
    State(provider): State<P>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    match check(&provider, &parts).await {
        GuardOutcome::Authorized(session) => {
            parts.extensions.insert(session);
            next.run(Request::from_parts(parts, body)).await
        }
        GuardOutcome::Redirecting(redirect) => redirect.into_response(),
    }
}

/// Put every route already registered on `router` behind the session guard.
pub fn protect<S, P>(router: Router<S>, provider: P) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    P: IdentityProvider,
{
    router.route_layer(middleware::from_fn_with_state(
        provider,
        require_session::<P>,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Extension,
        body::Body,
        http::{StatusCode, header::LOCATION},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    #[derive(Clone)]
    enum Answer {
        SignedIn(Session),
        SignedOut,
        BackendDown,
    }

    #[derive(Clone)]
    struct FakeIdentity {
        answer: Answer,
        queries: Arc<AtomicUsize>,
    }

    impl FakeIdentity {
        fn new(answer: Answer) -> Self {
            FakeIdentity {
                answer,
                queries: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl IdentityProvider for FakeIdentity {
        async fn verified_session(&self, _parts: &Parts) -> Result<Session, Error> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Answer::SignedIn(session) => Ok(session.clone()),
                Answer::SignedOut => Err(Error::SessionUnavailable),
                Answer::BackendDown => Err(Error::Database("connection refused".into())),
            }
        }
    }

    fn jo() -> Session {
        Session {
            user_id: 7,
            name: "Jo".into(),
            email: "jo@example.com".into(),
            member_since: "2026-01-02".into(),
        }
    }

    fn app(identity: FakeIdentity, rendered: Arc<AtomicUsize>) -> Router {
        let pages = Router::new()
            .route(
                "/dashboard",
                get(move || {
                    let rendered = rendered.clone();
                    async move {
                        rendered.fetch_add(1, Ordering::SeqCst);
                        ([("x-page", "dashboard")], "dashboard content")
                    }
                }),
            )
            .route(
                "/dashboard/account",
                get(|Extension(session): Extension<Session>| async move {
                    format!("account of {}", session.email)
                }),
            );
        protect(pages, identity)
    }

    fn get_request(uri: &str) -> Request {
        axum::http::Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn verified_session_renders_children_unchanged() {
        let identity = FakeIdentity::new(Answer::SignedIn(jo()));
        let rendered = Arc::new(AtomicUsize::new(0));
        let res = app(identity.clone(), rendered.clone())
            .oneshot(get_request("/dashboard"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(LOCATION).is_none());
        assert_eq!(res.headers().get("x-page").unwrap(), "dashboard");
        assert_eq!(body_string(res).await, "dashboard content");
        assert_eq!(rendered.load(Ordering::SeqCst), 1);
        assert_eq!(identity.queries(), 1);
    }

    #[tokio::test]
    async fn missing_session_redirects_without_rendering() {
        let identity = FakeIdentity::new(Answer::SignedOut);
        let rendered = Arc::new(AtomicUsize::new(0));
        let res = app(identity.clone(), rendered.clone())
            .oneshot(get_request("/dashboard"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(LOCATION).unwrap(), LOGIN_PATH);
        assert!(!body_string(res).await.contains("dashboard content"));
        assert_eq!(rendered.load(Ordering::SeqCst), 0);
        assert_eq!(identity.queries(), 1);
    }

    #[tokio::test]
    async fn backend_failure_redirects_like_a_missing_session() {
        let identity = FakeIdentity::new(Answer::BackendDown);
        let rendered = Arc::new(AtomicUsize::new(0));
        let res = app(identity.clone(), rendered.clone())
            .oneshot(get_request("/dashboard"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/login");
        assert_eq!(rendered.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn redirect_target_ignores_the_requested_path() {
        let identity = FakeIdentity::new(Answer::SignedOut);
        let router = app(identity.clone(), Arc::new(AtomicUsize::new(0)));
        for uri in [
            "/dashboard",
            "/dashboard/account",
            "/dashboard?next=/somewhere-else",
        ] {
            let res = router.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(res.headers().get(LOCATION).unwrap(), "/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn one_session_query_per_request() {
        for answer in [Answer::SignedIn(jo()), Answer::SignedOut, Answer::BackendDown] {
            let identity = FakeIdentity::new(answer);
            let router = app(identity.clone(), Arc::new(AtomicUsize::new(0)));
            for _ in 0..3 {
                router.clone().oneshot(get_request("/dashboard")).await.unwrap();
            }
            assert_eq!(identity.queries(), 3);
        }
    }

    #[tokio::test]
    async fn protected_handlers_see_the_verified_session() {
        let identity = FakeIdentity::new(Answer::SignedIn(jo()));
        let res = app(identity, Arc::new(AtomicUsize::new(0)))
            .oneshot(get_request("/dashboard/account"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "account of jo@example.com");
    }

    #[tokio::test]
    async fn check_maps_each_answer_to_one_outcome() {
        let (parts, _) = get_request("/dashboard").into_parts();

        let outcome = check(&FakeIdentity::new(Answer::SignedIn(jo())), &parts).await;
        assert!(matches!(outcome, GuardOutcome::Authorized(session) if session == jo()));

        let outcome = check(&FakeIdentity::new(Answer::SignedOut), &parts).await;
        let GuardOutcome::Redirecting(redirect) = outcome else {
            panic!("expected a redirect");
        };
        let res = redirect.into_response();
        assert_eq!(res.headers().get(LOCATION).unwrap(), LOGIN_PATH);
    }
}
