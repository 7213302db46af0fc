//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ApiResponse, PaginatedResponse};
use crate::api::handlers::{
    absence_requests, auth, event_requests, events, google_auth, health, mentorships, seasons,
    technologies, users,
};
use crate::application::mappers::{
    absence_request, event, event_request, mentorship, technology, user, UserResolver,
};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::domain::UserRepositoryInterface;

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
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Google authorization
        google_auth::get_google_authorization,
        google_auth::upsert_google_authorization,
        google_auth::delete_google_authorization,
        // Technologies
        technologies::list_technologies,
        technologies::get_technology,
        technologies::create_technology,
        technologies::update_technology,
        technologies::delete_technology,
        // Seasons
        seasons::list_seasons,
        seasons::get_season,
        seasons::create_season,
        seasons::update_season,
        seasons::delete_season,
        // Absence requests
        absence_requests::list_absence_requests,
        absence_requests::get_absence_request,
        absence_requests::create_absence_request,
        absence_requests::update_absence_request,
        absence_requests::assign_absence_request,
        absence_requests::delete_absence_request,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::get_attendees,
        events::set_attendees,
        // Event requests
        event_requests::list_event_requests,
        event_requests::get_event_request,
        event_requests::create_event_request,
        event_requests::update_event_request,
        event_requests::delete_event_request,
        // Mentorships
        mentorships::list_mentorships,
        mentorships::get_mentorship,
        mentorships::create_mentorship,
        mentorships::update_mentorship,
        mentorships::set_technologies,
        mentorships::delete_mentorship,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<user::UserDto>,
            health::HealthResponse,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            // Users
            user::UserDto,
            user::UserSummaryDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Google authorization
            google_auth::GoogleAuthorizationDto,
            google_auth::UpsertGoogleAuthorizationDto,
            // Technologies
            technology::TechnologyDto,
            technology::CreateTechnologyDto,
            technology::UpdateTechnologyDto,
            // Seasons
            seasons::SeasonDto,
            seasons::CreateSeasonDto,
            seasons::UpdateSeasonDto,
            // Absence requests
            absence_request::AbsenceRequestDto,
            absence_request::CreateAbsenceRequestDto,
            absence_request::UpdateAbsenceRequestDto,
            absence_requests::AssignRequestDto,
            // Events
            event::EventDto,
            event::CreateEventDto,
            event::UpdateEventDto,
            event::AttendeeSummaryDto,
            events::SetAttendeesDto,
            events::AttendeeEntryDto,
            // Event requests
            event_request::EventRequestDto,
            event_request::CreateEventRequestDto,
            event_request::UpdateEventRequestDto,
            // Mentorships
            mentorship::MentorshipDto,
            mentorship::SeasonSummaryDto,
            mentorship::CreateMentorshipDto,
            mentorship::UpdateMentorshipDto,
            mentorships::SetTechnologiesDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe for uptime monitoring."),
        (name = "Auth", description = "Login, registration and password management. The JWT is returned in the `token` field and passed as `Authorization: Bearer <token>`."),
        (name = "Users", description = "Program participants. Every user owns exactly one login account; `display_name` is derived from first and last name."),
        (name = "GoogleAuth", description = "Per-user Google OAuth token storage. At most one token set per user; responses expose metadata only, never the tokens."),
        (name = "Technologies", description = "Technology catalog with unique names, attached to mentorships."),
        (name = "Seasons", description = "Internship seasons over a date range."),
        (name = "AbsenceRequests", description = "Absence requests with review workflow. Statuses: `Pending`, `Approved`, `Rejected`. The reviewer is assigned through `PUT /{id}/assignee`, never via the generic update."),
        (name = "Events", description = "Scheduled events. `end_time` is derived from the start time and duration (whole minutes on the wire). Attendees are replaced wholesale via `PUT /{id}/attendees`."),
        (name = "EventRequests", description = "Proposed events awaiting review; same derived end-time rule as events."),
        (name = "Mentorships", description = "Mentor-intern pairings within a season, with nested summaries and an attached technology set (`PUT /{id}/technologies`)."),
    ),
    info(
        title = "MentorHub API",
        version = "1.0.0",
        description = "REST API for the MentorHub internship administration service.

## Authentication

Obtain a token via `POST /api/v1/auth/login` and pass it in the
`Authorization: Bearer <token>` header. `POST /api/v1/auth/register`
and the health probe are the only public endpoints.

## Response format

Every response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}}
```

On error:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Partial updates

PUT endpoints apply only the fields present in the body; an absent or
`null` field means \"no change\".",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    user_repo: Arc<dyn UserRepositoryInterface>,
    resolver: Arc<dyn UserResolver>,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
        user_repo: Arc::clone(&user_repo),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // User routes (protected)
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(users::UsersHandlerState {
            user_repo: Arc::clone(&user_repo),
        });

    // Google authorization routes, nested under the same /users prefix
    let google_auth_routes = Router::new()
        .route(
            "/{id}/google-authorization",
            get(google_auth::get_google_authorization)
                .put(google_auth::upsert_google_authorization)
                .delete(google_auth::delete_google_authorization),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(google_auth::GoogleAuthHandlerState {
            db: db.clone(),
            resolver: Arc::clone(&resolver),
        });

    // Technology routes (protected)
    let technology_routes = Router::new()
        .route(
            "/",
            get(technologies::list_technologies).post(technologies::create_technology),
        )
        .route(
            "/{id}",
            get(technologies::get_technology)
                .put(technologies::update_technology)
                .delete(technologies::delete_technology),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(technologies::TechnologiesHandlerState { db: db.clone() });

    // Season routes (protected)
    let season_routes = Router::new()
        .route("/", get(seasons::list_seasons).post(seasons::create_season))
        .route(
            "/{id}",
            get(seasons::get_season)
                .put(seasons::update_season)
                .delete(seasons::delete_season),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(seasons::SeasonsHandlerState { db: db.clone() });

    // Absence request routes (protected)
    let absence_request_routes = Router::new()
        .route(
            "/",
            get(absence_requests::list_absence_requests)
                .post(absence_requests::create_absence_request),
        )
        .route(
            "/{id}",
            get(absence_requests::get_absence_request)
                .put(absence_requests::update_absence_request)
                .delete(absence_requests::delete_absence_request),
        )
        .route(
            "/{id}/assignee",
            put(absence_requests::assign_absence_request),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(absence_requests::AbsenceRequestsHandlerState {
            db: db.clone(),
            resolver: Arc::clone(&resolver),
        });

    // Event routes (protected)
    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/{id}/attendees",
            get(events::get_attendees).put(events::set_attendees),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(events::EventsHandlerState {
            db: db.clone(),
            resolver: Arc::clone(&resolver),
        });

    // Event request routes (protected)
    let event_request_routes = Router::new()
        .route(
            "/",
            get(event_requests::list_event_requests).post(event_requests::create_event_request),
        )
        .route(
            "/{id}",
            get(event_requests::get_event_request)
                .put(event_requests::update_event_request)
                .delete(event_requests::delete_event_request),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(event_requests::EventRequestsHandlerState {
            db: db.clone(),
            resolver: Arc::clone(&resolver),
        });

    // Mentorship routes (protected)
    let mentorship_routes = Router::new()
        .route(
            "/",
            get(mentorships::list_mentorships).post(mentorships::create_mentorship),
        )
        .route(
            "/{id}",
            get(mentorships::get_mentorship)
                .put(mentorships::update_mentorship)
                .delete(mentorships::delete_mentorship),
        )
        .route("/{id}/technologies", put(mentorships::set_technologies))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(mentorships::MentorshipsHandlerState {
            db,
            resolver,
        });

    let swagger_routes =
        SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/users", google_auth_routes)
        .nest("/api/v1/technologies", technology_routes)
        .nest("/api/v1/seasons", season_routes)
        .nest("/api/v1/absence-requests", absence_request_routes)
        .nest("/api/v1/events", event_routes)
        .nest("/api/v1/event-requests", event_request_routes)
        .nest("/api/v1/mentorships", mentorship_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
