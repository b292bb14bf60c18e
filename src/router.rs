use crate::handlers::{
    auth::{login, logout, refresh_token, signup, verify_token},
    booking_history::{create_booking_history, get_booking_history, get_booking_history_entry},
    bookings::{
        create_booking, delete_booking, get_booking, get_bookings, review_booking, update_booking,
    },
    health::health_check,
    jobs::{
        apply_for_job, create_job_post, delete_job_application, delete_job_post,
        get_job_application, get_job_applications, get_job_post, get_job_post_applications,
        get_job_posts, update_job_application, update_job_post,
    },
    notifications::{get_notifications, mark_notification_read},
    profiles::{
        confirm_profile_switch, delete_profile, get_profile, get_profiles, request_profile_switch,
        update_profile,
    },
    users::{
        delete_client_user, delete_photographer_user, delete_staff_user, get_client_user,
        get_clients, get_photographer_user, get_photographers, get_staff, get_staff_user,
        get_users, update_client_user, update_photographer, update_photographer_user,
        update_staff_user,
    },
    work_history::{create_work_history, get_work_history, get_work_history_entry},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/token/refresh", post(refresh_token))
        .route("/api/v1/auth/token/verify", post(verify_token))
        // Accounts and role details
        .route("/api/v1/users", get(get_users))
        .route(
            "/api/v1/users/staff/:id",
            get(get_staff_user).put(update_staff_user).delete(delete_staff_user),
        )
        .route(
            "/api/v1/users/photographer/:id",
            get(get_photographer_user)
                .put(update_photographer_user)
                .delete(delete_photographer_user),
        )
        .route(
            "/api/v1/users/client/:id",
            get(get_client_user).put(update_client_user).delete(delete_client_user),
        )
        .route("/api/v1/photographers", get(get_photographers))
        .route("/api/v1/photographers/:id", put(update_photographer))
        .route("/api/v1/clients", get(get_clients))
        .route("/api/v1/staff", get(get_staff))
        // Bookings
        .route("/api/v1/bookings", get(get_bookings).post(create_booking))
        .route(
            "/api/v1/bookings/:id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/api/v1/bookings/:id/review", post(review_booking))
        .route(
            "/api/v1/booking-history",
            get(get_booking_history).post(create_booking_history),
        )
        .route("/api/v1/booking-history/:id", get(get_booking_history_entry))
        // Jobs
        .route("/api/v1/job-posts", get(get_job_posts).post(create_job_post))
        .route(
            "/api/v1/job-posts/:id",
            get(get_job_post).put(update_job_post).delete(delete_job_post),
        )
        .route(
            "/api/v1/job-posts/:id/applications",
            get(get_job_post_applications).post(apply_for_job),
        )
        .route("/api/v1/job-applications", get(get_job_applications))
        .route(
            "/api/v1/job-applications/:id",
            get(get_job_application)
                .put(update_job_application)
                .delete(delete_job_application),
        )
        .route(
            "/api/v1/work-history",
            get(get_work_history).post(create_work_history),
        )
        .route("/api/v1/work-history/:id", get(get_work_history_entry))
        // Notifications
        .route("/api/v1/notifications", get(get_notifications))
        .route("/api/v1/notifications/:id/read", post(mark_notification_read))
        // Profiles
        .route("/api/v1/profiles", get(get_profiles))
        .route(
            "/api/v1/profiles/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/api/v1/profile-switch", post(request_profile_switch))
        .route(
            "/api/v1/confirm-switch-profile/:selected_profile/:token",
            get(confirm_profile_switch),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
