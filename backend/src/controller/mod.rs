use axum::Router;

use crate::appstate::AppState;

pub trait Routes {
    fn add_routes<T: RouteProvider>(self) -> Self;
}

/// Implemented by each plugin to register its own routes.
pub trait RouteProvider {
    fn provide_routes(router: Router<AppState>) -> Router<AppState>;
}

impl Routes for Router<AppState> {
    fn add_routes<T: RouteProvider>(self) -> Self {
        T::provide_routes(self)
    }
}
