use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use gwiit_core::{EmailClient, PasswordGenerator, PasswordHasher, UserStore};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    routes::{
        authenticate, create_user, deactivate_superuser, deactivate_user, get_user, list_users,
        release_organization, release_site, update_user,
    },
    state::AppState,
    tracing::{make_span_with_request_id, on_request, on_response},
};

/// HTTP surface over the user use cases.
pub struct UserService {
    router: Router,
}

impl UserService {
    /// Create a new UserService over the shared state
    ///
    /// # Arguments
    /// * `state` - Store, hasher, generator and email client for the `users` database
    pub fn new<U, H, G, E>(state: Arc<AppState<U, H, G, E>>) -> Self
    where
        U: UserStore + 'static,
        H: PasswordHasher + 'static,
        G: PasswordGenerator + 'static,
        E: EmailClient + 'static,
    {
        let router = Router::new()
            .route(
                "/users",
                post(create_user::<U, H, G, E>).get(list_users::<U, H, G, E>),
            )
            .route(
                "/users/{id}",
                get(get_user::<U, H, G, E>)
                    .patch(update_user::<U, H, G, E>)
                    .delete(deactivate_user::<U, H, G, E>),
            )
            .route("/users/authenticate", post(authenticate::<U, H, G, E>))
            .route(
                "/superusers/{id}",
                delete(deactivate_superuser::<U, H, G, E>),
            )
            .route(
                "/organizations/{id}/users",
                delete(release_organization::<U, H, G, E>),
            )
            .route("/sites/{id}/users", delete(release_site::<U, H, G, E>))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the UserService into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Origins allowed by CORS; unparseable entries are skipped
    pub fn as_nested_router(mut self, allowed_origins: &[String]) -> Router {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        if !origins.is_empty() {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(origins);
            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the user service as a standalone server
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: &[String],
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("User service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
