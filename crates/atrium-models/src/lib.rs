//! # Atrium Models
//!
//! Domain models and DTOs for Atrium.
//!
//! # Modules
//!
//! - [`auth`]: Sessions, claims, login and token requests
//! - [`courses`]: Tenant-scoped course catalogue
//! - [`ids`]: Strongly-typed UUID identifiers
//! - [`organizations`]: Organizations (tenants) and their DTOs
//! - [`purchases`]: Client reservations and enrollments
//! - [`schedules`]: Weekly time slots of a course
//! - [`users`]: Users, roles and listing queries
//!
//! # Example
//!
//! ```ignore
//! use atrium_models::users::{UserRole, user_partition};
//!
//! let partition = user_partition("acme", UserRole::Instructor);
//! assert_eq!(partition, "acme#instructor");
//! ```

pub mod auth;
pub mod courses;
pub mod ids;
pub mod organizations;
pub mod purchases;
pub mod schedules;
pub mod users;

pub use auth::{
    Claim, LoginRequest, LoginResponse, MessageResponse, SessionToken, TokenRequest,
    ValidateTokenResponse,
};
pub use courses::{
    Course, CourseKey, CourseList, CreateCourseDto, ListCoursesQuery, UpdateCourseDto,
    UpdateCourseResponse,
};
pub use ids::{CourseId, ScheduleId, SessionTokenId};
pub use organizations::{
    CreateOrganizationDto, CreateOrganizationResponse, Organization, OrganizationList,
    TenantQuery, UpdateOrganizationDto, UpdateOrganizationResponse,
};
pub use purchases::{
    CreatePurchaseDto, ListPurchasesQuery, Purchase, PurchaseKey, PurchaseList, PurchaseStatus,
    RefreshPurchasesDto, RefreshPurchasesResponse,
};
pub use schedules::{
    CreateScheduleDto, ListSchedulesQuery, Schedule, ScheduleKey, ScheduleList,
    UpdateScheduleDto, UpdateScheduleResponse, Weekday,
};
pub use users::{
    CreateUserDto, CreateUserResponse, GetUserQuery, ListUsersQuery, User, UserList, UserRecord,
    UserRole, user_partition,
};
