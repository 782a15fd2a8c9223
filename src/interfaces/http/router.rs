//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, NoteService};
use crate::domain::{NoteRepositoryInterface, UserRepositoryInterface};
use crate::infrastructure::crypto::{PasswordHasher, TokenService};
use crate::infrastructure::database::{NoteRepository, UserRepository};
use crate::interfaces::http::common::MessageResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;

use super::modules::{auth, health, notes};

/// Everything the router needs, wired once at startup.
#[derive(Clone)]
pub struct ApiState {
    pub auth_service: Arc<AuthService>,
    pub note_service: Arc<NoteService>,
    pub auth: AuthState,
    pub db: DatabaseConnection,
}

impl ApiState {
    pub fn new(db: DatabaseConnection, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        let users: Arc<dyn UserRepositoryInterface> =
            Arc::new(UserRepository::new(db.clone(), hasher));
        let note_store: Arc<dyn NoteRepositoryInterface> =
            Arc::new(NoteRepository::new(db.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                note_store.clone(),
                tokens.clone(),
                hasher,
            )),
            note_service: Arc::new(NoteService::new(note_store)),
            auth: AuthState { tokens, users },
            db,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::welcome,
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_profile,
        auth::refresh_token,
        auth::change_password,
        // Notes
        notes::list_notes,
        notes::list_notes_by_category,
        notes::get_note,
        notes::create_note,
        notes::update_note,
        notes::delete_note,
    ),
    components(
        schemas(
            MessageResponse,
            health::HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ChangePasswordRequest,
            auth::UserView,
            auth::AuthResponse,
            auth::TokenResponse,
            auth::ProfileResponse,
            auth::NoteSummaryDto,
            notes::CreateNoteRequest,
            notes::UpdateNoteRequest,
            notes::NoteDto,
            notes::NoteOwner,
            notes::NoteListResponse,
            notes::CategoryNotesResponse,
            notes::NoteMessageResponse,
            notes::DeleteNoteResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Welcome and health check endpoints"),
        (name = "Authentication", description = "Registration, login (JWT), profile, token refresh, password change"),
        (name = "Notes", description = "Per-user note management"),
    ),
    info(
        title = "Notes Management System API",
        version = "1.0.0",
        description = "REST API for a notes-taking application",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState, body_limit: usize) -> Router {
    let auth_state = auth::AuthHandlerState {
        service: state.auth_service.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/profile", get(auth::get_profile))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Note routes (protected)
    let note_routes = Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route("/category/{category}", get(notes::list_notes_by_category))
        .route(
            "/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(notes::NotesHandlerState {
            service: state.note_service.clone(),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check).with_state(state.db.clone()))
        // Auth
        .nest("/api/auth", auth_routes.merge(auth_protected_routes))
        // Notes
        .nest("/api/notes", note_routes)
        // Middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
