use axum::extract::DefaultBodyLimit;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

/// Console pages, gated on a stored token and an admitted account.
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::users_list).post(handlers::users::users_create))
        .route("/users/:email/enable", post(handlers::users::user_enable))
        .route("/users/:email/disable", post(handlers::users::user_disable))
        .route("/users/:email/delete", post(handlers::users::user_delete))
        .route("/users/:email/reset-hardware", post(handlers::users::user_reset_hardware))
        .route("/users/:email/role", post(handlers::users::user_set_role))
        .route("/current", get(handlers::users::current_user_get))
        .route("/charts", get(handlers::charts::charts_get))
        .route("/resources", get(handlers::resources::resources_get))
        .route("/resources/installer/:env", get(handlers::resources::installer_get))
        .route(
            "/upload",
            get(handlers::files::upload_get)
                .post(handlers::files::upload_post)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/clear", get(handlers::files::clear_get).post(handlers::files::clear_post))
        .route("/confirm/:action/:email", get(handlers::system::confirmation_get))
        .route_layer(middleware::from_fn_with_state(state.clone(), handlers::middleware::auth_middleware))
}

pub fn build_router(state: AppState) -> Router {
    let stylesheet = Router::new()
        .route("/static/styles.css", get(handlers::system::stylesheet_get))
        .layer(ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )));

    Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/login", get(handlers::auth::login_get).post(handlers::auth::login_post))
        .route("/logout", post(handlers::auth::logout_post))
        .merge(stylesheet)
        .merge(protected_routes(&state))
        .fallback(handlers::system::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
