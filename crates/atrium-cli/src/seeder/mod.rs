//! Fake organizations and users for development stores.
//!
//! Data is generated in parallel with Rayon, then written through the typed
//! stores so admin uniqueness and port allocation hold as they do over HTTP.
//! The password is digested once and shared by every seeded user.

pub mod models;
pub mod organizations;
pub mod users;

use std::error::Error;
use std::time::Instant;

use atrium_core::PasswordDigest;

pub use models::{SeedConfig, SeedReport, UsersPerOrganization};

use crate::Stores;

pub async fn seed_all(
    stores: &Stores,
    digest: &dyn PasswordDigest,
    config: SeedConfig,
) -> Result<SeedReport, Box<dyn Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting store seeding...");
    println!("   - Organizations: {}", config.organizations);
    println!(
        "   - Users per organization: 1 admin, {} instructors, {} clients",
        config.users.instructors, config.users.clients
    );

    let tenant_ids = organizations::seed_organizations(stores, config.organizations).await?;

    let password_digest = digest.digest(&config.password)?;
    let seeds = users::generate_users(&tenant_ids, &config.users);
    let (created, skipped) = users::seed_users(stores, seeds, &password_digest).await?;

    let report = SeedReport {
        organizations: tenant_ids.len(),
        users: created,
        skipped,
    };

    println!(
        "\n✅ Seeding complete! Created {} organizations and {} users in {:?}",
        report.organizations,
        report.users,
        start_time.elapsed()
    );
    println!("\n📝 Password for all seeded users: {}", config.password);

    Ok(report)
}
