use std::time::Instant;

use chrono::Utc;
use fake::Fake;
use fake::faker::company::en::{CatchPhrase, CompanyName};
use rayon::prelude::*;
use serde_json::json;
use tracing::warn;

use atrium_db::StoreError;
use atrium_models::Organization;

use super::models::OrganizationSeed;
use crate::Stores;

fn slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>();
    slug.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Generates organizations in parallel. Tenant ids carry the index so a run
/// never collides with itself.
pub fn generate_organizations(count: usize) -> Vec<OrganizationSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let name: String = CompanyName().fake();
            let tenant_id = format!("{}-{}", slug(&name), idx);
            OrganizationSeed {
                domain: format!("{}.example.com", tenant_id),
                email: format!("contact@{}.example.com", tenant_id),
                description: format!("{}: {}", name, CatchPhrase().fake::<String>()),
                tenant_id,
            }
        })
        .collect()
}

/// Inserts the organizations, skipping tenants that already exist.
/// Returns the tenant ids actually created.
pub async fn seed_organizations(
    stores: &Stores,
    count: usize,
) -> Result<Vec<String>, StoreError> {
    let start_time = Instant::now();
    println!("🏢 Seeding {} organizations...", count);

    let mut created = Vec::with_capacity(count);
    for seed in generate_organizations(count) {
        if stores.organizations.exists(&seed.tenant_id).await? {
            warn!(tenant.id = %seed.tenant_id, "Organization exists, skipping");
            continue;
        }

        let organization = Organization {
            tenant_id: seed.tenant_id,
            domain: seed.domain,
            description: seed.description,
            email: seed.email,
            detail: Some(json!({ "seeded": true })),
            port: stores.organizations.next_port().await?,
            created_at: Utc::now(),
            updated_at: None,
        };

        if stores.organizations.insert(&organization).await? {
            created.push(organization.tenant_id);
        }
    }

    println!(
        "   ✓ Inserted {} organizations in {:?}",
        created.len(),
        start_time.elapsed()
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Acme, Inc."), "acme-inc");
        assert_eq!(slug("  Globex  Corp "), "globex-corp");
    }

    #[test]
    fn test_generated_tenants_are_unique() {
        let seeds = generate_organizations(50);
        let mut ids = seeds.iter().map(|s| s.tenant_id.clone()).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
