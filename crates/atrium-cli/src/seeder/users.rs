use std::time::Instant;

use chrono::Utc;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;

use atrium_db::StoreError;
use atrium_models::{UserRecord, UserRole};

use super::models::{UserSeed, UsersPerOrganization};
use crate::Stores;

/// Eight-digit document number, unique per (organization, user) index.
fn dni(group_idx: usize, user_idx: usize) -> String {
    format!("{:08}", 10_000_000 + group_idx * 10_000 + user_idx)
}

fn generate_user(tenant_id: &str, role: UserRole, group_idx: usize, user_idx: usize) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    UserSeed {
        tenant_id: tenant_id.to_string(),
        dni: dni(group_idx, user_idx),
        full_name: format!("{} {}", first_name, last_name),
        role,
    }
}

/// One admin, then instructors, then clients for every tenant.
pub fn generate_users(tenant_ids: &[String], per_organization: &UsersPerOrganization) -> Vec<UserSeed> {
    tenant_ids
        .par_iter()
        .enumerate()
        .flat_map(|(group_idx, tenant_id)| {
            let mut users =
                Vec::with_capacity(1 + per_organization.instructors + per_organization.clients);
            users.push(generate_user(tenant_id, UserRole::Admin, group_idx, 0));

            let mut user_idx = 1;
            for _ in 0..per_organization.instructors {
                users.push(generate_user(tenant_id, UserRole::Instructor, group_idx, user_idx));
                user_idx += 1;
            }
            for _ in 0..per_organization.clients {
                users.push(generate_user(tenant_id, UserRole::Client, group_idx, user_idx));
                user_idx += 1;
            }
            users
        })
        .collect()
}

/// Writes the users with a shared password digest. Admins go through the
/// admin slot; users that already exist are skipped. Returns `(created, skipped)`.
pub async fn seed_users(
    stores: &Stores,
    users: Vec<UserSeed>,
    password_digest: &str,
) -> Result<(usize, usize), StoreError> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", users.len());

    let mut created = 0;
    let mut skipped = 0;
    for seed in users {
        if seed.role == UserRole::Admin
            && !stores.credentials.claim_admin_slot(&seed.tenant_id).await?
        {
            skipped += 1;
            continue;
        }

        let record = UserRecord {
            tenant_id: seed.tenant_id,
            dni: seed.dni,
            full_name: seed.full_name,
            role: seed.role,
            password_digest: password_digest.to_string(),
            detail: None,
            created_at: Utc::now(),
        };

        if stores.credentials.insert_user(&record).await? {
            created += 1;
        } else {
            if record.role == UserRole::Admin {
                stores.credentials.release_admin_slot(&record.tenant_id).await?;
            }
            skipped += 1;
        }
    }

    println!(
        "   ✓ Inserted {} users ({} skipped) in {:?}",
        created,
        skipped,
        start_time.elapsed()
    );
    Ok((created, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users_layout() {
        let tenants = vec!["acme-0".to_string(), "globex-1".to_string()];
        let users = generate_users(
            &tenants,
            &UsersPerOrganization {
                instructors: 2,
                clients: 3,
            },
        );

        assert_eq!(users.len(), 12);
        for tenant in &tenants {
            let mine = users.iter().filter(|u| &u.tenant_id == tenant).collect::<Vec<_>>();
            assert_eq!(mine.iter().filter(|u| u.role == UserRole::Admin).count(), 1);
            assert_eq!(mine.iter().filter(|u| u.role == UserRole::Instructor).count(), 2);
            assert_eq!(mine.iter().filter(|u| u.role == UserRole::Client).count(), 3);
        }

        let mut dnis = users.iter().map(|u| u.dni.clone()).collect::<Vec<_>>();
        dnis.sort();
        dnis.dedup();
        assert_eq!(dnis.len(), 12);
    }

    #[test]
    fn test_dni_is_eight_digits() {
        assert_eq!(dni(0, 0), "10000000");
        assert_eq!(dni(3, 42), "10030042");
    }
}
