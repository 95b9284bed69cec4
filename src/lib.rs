//! # Atrium API
//!
//! Multi-tenant backend for organizations, their users, courses, course
//! schedules and client purchases, with opaque session tokens. Built with Axum over a pluggable key-value store.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── collaborators/    # Remote token validation, organization lookup, provisioning
//! ├── middleware/       # Bearer token extraction and role checks
//! ├── modules/          # Feature modules
//! │   ├── organizations/
//! │   ├── users/
//! │   ├── auth/         # login, logout, validate-token
//! │   ├── courses/
//! │   ├── schedules/    # weekly slots of a course, clash-checked
//! │   ├── purchases/    # client reservations and enrollments
//! │   ├── doc_viewer/   # static files under /doc
//! │   └── functions/    # POST /invoke/{function}
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs
//! └── state.rs
//! ```
//!
//! Each feature module has a `service.rs` with the business logic, a
//! `controller.rs` with the REST handlers, a `functions.rs` with the envelope
//! entry points used by `/invoke`, and a `router.rs`.
//!
//! ## Roles
//!
//! | Role | Created by | Notes |
//! |------|------------|-------|
//! | Admin | anyone | at most one per tenant |
//! | Instructor | the tenant admin | owns courses |
//! | Client | anyone | |
//!
//! A token is a random UUID bound to one tenant. Missing, unknown or expired
//! tokens answer 401; a valid token with the wrong role answers 403.
//!
//! ## Quick Start
//!
//! ```bash
//! STORE_BACKEND=memory cargo run
//! curl -X POST localhost:3000/api/organizations \
//!   -H 'content-type: application/json' \
//!   -d '{"tenant_id":"acme","domain":"acme.test","description":"Acme","email":"ops@acme.test"}'
//! ```
//!
//! The Scalar UI is served at `/scalar`.

pub mod collaborators;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use atrium_auth;
pub use atrium_config;
pub use atrium_core;
pub use atrium_db;
pub use atrium_models;
