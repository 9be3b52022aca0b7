use std::path::PathBuf;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use soundcave_core::health::{healthz, readyz};
use soundcave_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::config::ApiConfig;
use crate::handlers::{
    artist::{create_artist, delete_artist, get_artist, list_artists, update_artist},
    auth::{login, register},
    follow::{
        artist_followers, follow_artist, follow_user, unfollow_artist, unfollow_user,
        user_followers,
    },
    profile::{get_profile, update_profile_image},
    user::{create_user, delete_user, get_user, list_users, update_user},
};
use crate::state::AppState;

/// HTTP-level settings applied around the routes.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    /// Serve the local object store at this path prefix.
    pub asset_mount: Option<(String, PathBuf)>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origins: vec!["*".to_owned()],
            max_upload_bytes: 10 * 1024 * 1024,
            asset_mount: None,
        }
    }
}

impl From<&ApiConfig> for RouterOptions {
    fn from(config: &ApiConfig) -> Self {
        // Only a path prefix can be served from here; a full URL points elsewhere.
        let base = config.asset_base_url.trim_end_matches('/');
        let asset_mount = (base.starts_with('/') && base.len() > 1)
            .then(|| (base.to_owned(), config.asset_dir.clone()));
        Self {
            cors_origins: config.cors_origins(),
            max_upload_bytes: config.max_upload_bytes,
            asset_mount,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        // Profile
        .route("/profile", get(get_profile))
        .route("/profile/image", put(update_profile_image))
        // Users
        .route("/users", post(create_user).get(list_users))
        .route("/users/follow", post(follow_user))
        .route("/users/unfollow", post(unfollow_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/followers", get(user_followers))
        // Artists
        .route("/artists", post(create_artist).get(list_artists))
        .route(
            "/artists/{id}",
            get(get_artist).put(update_artist).delete(delete_artist),
        )
        .route("/artists/{id}/follow", post(follow_artist))
        .route("/artists/{id}/unfollow", post(unfollow_artist))
        .route("/artists/{id}/followers", get(artist_followers));

    let mut router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api);
    if let Some((prefix, dir)) = options.asset_mount {
        router = router.nest_service(&prefix, ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(options.max_upload_bytes))
        .layer(cors_layer(&options.cors_origins))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
