use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use atrium_core::{RequestEnvelope, ResponseEnvelope};
use atrium_models::{
    Claim, Course, CourseList, CreateCourseDto, CreateOrganizationDto, CreateOrganizationResponse,
    CreatePurchaseDto, CreateScheduleDto, CreateUserDto, CreateUserResponse, ListCoursesQuery,
    ListPurchasesQuery, ListSchedulesQuery, ListUsersQuery, LoginRequest, LoginResponse,
    MessageResponse, Organization, OrganizationList, Purchase, PurchaseList, PurchaseStatus,
    RefreshPurchasesDto, RefreshPurchasesResponse, Schedule, ScheduleList, TokenRequest,
    UpdateCourseDto, UpdateCourseResponse, UpdateOrganizationDto, UpdateOrganizationResponse,
    UpdateScheduleDto, UpdateScheduleResponse, User, UserList, UserRole, ValidateTokenResponse,
    Weekday,
};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Only on 500 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::organizations::controller::create_organization,
        crate::modules::organizations::controller::list_organizations,
        crate::modules::organizations::controller::get_organization,
        crate::modules::organizations::controller::update_organization,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::list_users,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::validate_token,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::list_schedules,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::purchases::controller::create_purchase,
        crate::modules::purchases::controller::list_purchases,
        crate::modules::purchases::controller::refresh_purchases,
        crate::modules::purchases::controller::delete_purchase,
        crate::modules::functions::controller::invoke_function,
        crate::modules::doc_viewer::controller::doc_index,
        crate::modules::doc_viewer::controller::doc_file,
    ),
    components(
        schemas(
            ErrorResponse,
            RequestEnvelope,
            ResponseEnvelope,
            Organization,
            CreateOrganizationDto,
            CreateOrganizationResponse,
            UpdateOrganizationDto,
            UpdateOrganizationResponse,
            OrganizationList,
            User,
            UserRole,
            UserList,
            CreateUserDto,
            CreateUserResponse,
            ListUsersQuery,
            LoginRequest,
            LoginResponse,
            TokenRequest,
            ValidateTokenResponse,
            Claim,
            MessageResponse,
            Course,
            CourseList,
            CreateCourseDto,
            UpdateCourseDto,
            UpdateCourseResponse,
            ListCoursesQuery,
            Weekday,
            Schedule,
            ScheduleList,
            CreateScheduleDto,
            UpdateScheduleDto,
            UpdateScheduleResponse,
            ListSchedulesQuery,
            PurchaseStatus,
            Purchase,
            PurchaseList,
            CreatePurchaseDto,
            ListPurchasesQuery,
            RefreshPurchasesDto,
            RefreshPurchasesResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Organizations", description = "Tenant registry"),
        (name = "Users", description = "Per-tenant users"),
        (name = "Authentication", description = "Session tokens"),
        (name = "Courses", description = "Per-tenant course catalogue"),
        (name = "Schedules", description = "Weekly time slots of a course"),
        (name = "Purchases", description = "Client reservations and enrollments"),
        (name = "Functions", description = "Envelope invocation of every handler"),
        (name = "Documentation", description = "Static documentation viewer")
    ),
    info(
        title = "Atrium API",
        version = "0.1.0",
        description = "Multi-tenant organizations, users, opaque session tokens, courses, schedules and purchases.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .build(),
                ),
            )
        }
    }
}
