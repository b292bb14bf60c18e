use common::{AccessToken, ErrorResponse, PageQuery, TokenPair};
use moka::future::Cache;
use scheduler::TimerPolicy;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::config::Settings;
use crate::handlers::{
    auth::{LoginRequest, RefreshRequest, SignupRequest, VerifyRequest},
    booking_history::{BookingHistoryResponse, CreateBookingHistoryRequest},
    bookings::{
        BookingListQuery, BookingResponse, CreateBookingRequest, ReviewBookingRequest,
        UpdateBookingRequest,
    },
    jobs::{
        CreateJobPostRequest, JobApplicationRequest, JobApplicationResponse, JobPostResponse,
        UpdateJobPostRequest,
    },
    notifications::NotificationResponse,
    profiles::{ProfileResponse, ProfileSwitchRequest, UpdateProfileRequest},
    users::{
        ClientResponse, PhotographerResponse, StaffResponse, UpdatePhotographerRequest,
        UpdateUserRequest, UserResponse,
    },
    work_history::{CreateWorkHistoryRequest, WorkHistoryResponse},
};
use crate::mail::Mailer;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Revoked refresh-token ids, expiring with the tokens themselves
    pub cache: Cache<String, ()>,
    pub settings: Arc<Settings>,
    pub mailer: Arc<dyn Mailer>,
    /// Booking response window, also enforced when a photographer answers
    pub policy: TimerPolicy,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

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
        crate::handlers::health::health_check,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::verify_token,
        crate::handlers::users::get_users,
        crate::handlers::users::get_staff_user,
        crate::handlers::users::update_staff_user,
        crate::handlers::users::delete_staff_user,
        crate::handlers::users::get_photographer_user,
        crate::handlers::users::update_photographer_user,
        crate::handlers::users::delete_photographer_user,
        crate::handlers::users::get_client_user,
        crate::handlers::users::update_client_user,
        crate::handlers::users::delete_client_user,
        crate::handlers::users::get_photographers,
        crate::handlers::users::update_photographer,
        crate::handlers::users::get_clients,
        crate::handlers::users::get_staff,
        crate::handlers::bookings::get_bookings,
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::get_booking,
        crate::handlers::bookings::update_booking,
        crate::handlers::bookings::delete_booking,
        crate::handlers::bookings::review_booking,
        crate::handlers::booking_history::get_booking_history,
        crate::handlers::booking_history::create_booking_history,
        crate::handlers::booking_history::get_booking_history_entry,
        crate::handlers::jobs::get_job_posts,
        crate::handlers::jobs::create_job_post,
        crate::handlers::jobs::get_job_post,
        crate::handlers::jobs::update_job_post,
        crate::handlers::jobs::delete_job_post,
        crate::handlers::jobs::apply_for_job,
        crate::handlers::jobs::get_job_post_applications,
        crate::handlers::jobs::get_job_applications,
        crate::handlers::jobs::get_job_application,
        crate::handlers::jobs::update_job_application,
        crate::handlers::jobs::delete_job_application,
        crate::handlers::work_history::get_work_history,
        crate::handlers::work_history::create_work_history,
        crate::handlers::work_history::get_work_history_entry,
        crate::handlers::notifications::get_notifications,
        crate::handlers::notifications::mark_notification_read,
        crate::handlers::profiles::get_profiles,
        crate::handlers::profiles::get_profile,
        crate::handlers::profiles::update_profile,
        crate::handlers::profiles::delete_profile,
        crate::handlers::profiles::request_profile_switch,
        crate::handlers::profiles::confirm_profile_switch,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            PageQuery,
            TokenPair,
            AccessToken,
            SignupRequest,
            LoginRequest,
            RefreshRequest,
            VerifyRequest,
            UserResponse,
            UpdateUserRequest,
            PhotographerResponse,
            UpdatePhotographerRequest,
            ClientResponse,
            StaffResponse,
            BookingResponse,
            BookingListQuery,
            CreateBookingRequest,
            UpdateBookingRequest,
            ReviewBookingRequest,
            BookingHistoryResponse,
            CreateBookingHistoryRequest,
            JobPostResponse,
            CreateJobPostRequest,
            UpdateJobPostRequest,
            JobApplicationResponse,
            JobApplicationRequest,
            WorkHistoryResponse,
            CreateWorkHistoryRequest,
            NotificationResponse,
            ProfileResponse,
            UpdateProfileRequest,
            ProfileSwitchRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and token endpoints"),
        (name = "users", description = "Accounts and role details"),
        (name = "bookings", description = "Booking requests and reviews"),
        (name = "booking-history", description = "Client booking history"),
        (name = "jobs", description = "Job posts and applications"),
        (name = "work-history", description = "Photographer work history"),
        (name = "notifications", description = "Booking notifications"),
        (name = "profiles", description = "Profiles and profile switching"),
    ),
    info(
        title = "SnapBook API",
        description = "Marketplace connecting clients with photographers",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
