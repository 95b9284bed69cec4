use atrium_cli::Stores;
use atrium_cli::admin::{create_admin, create_organization};
use atrium_cli::seeder::{self, SeedConfig, UsersPerOrganization};
use atrium_config::TokenConfig;
use atrium_core::{PasswordDigest, digest_from_name};
use atrium_observability::init_basic_console_logging;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "atrium-cli")]
#[command(about = "Atrium CLI - Administrative tools for Atrium", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new organization (tenant)
    CreateOrganization {
        /// Tenant id
        #[arg(short = 't', long)]
        tenant_id: Option<String>,

        /// Domain of the organization
        #[arg(short = 'd', long)]
        domain: Option<String>,

        /// Short description
        #[arg(long)]
        description: Option<String>,

        /// Contact email address
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Create the admin of an existing organization
    CreateAdmin {
        /// Tenant id of the organization
        #[arg(short = 't', long)]
        tenant_id: Option<String>,

        /// Document number
        #[arg(long)]
        dni: Option<String>,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the store with fake organizations, admins, instructors and clients
    Seed {
        /// Number of organizations to create
        #[arg(short = 'o', long, default_value = "5")]
        organizations: usize,

        /// Number of instructors per organization
        #[arg(long, default_value = "3")]
        instructors: usize,

        /// Number of clients per organization
        #[arg(long, default_value = "20")]
        clients: usize,

        /// Password shared by every seeded user
        #[arg(long, default_value = "password123")]
        password: String,
    },
}

fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, error);
    std::process::exit(1);
}

fn prompt(value: Option<String>, label: &str) -> String {
    value.unwrap_or_else(|| {
        Input::new()
            .with_prompt(label)
            .interact_text()
            .unwrap_or_else(|e| fail(&format!("Failed to read {}", label.to_lowercase()), e))
    })
}

fn configured_digest() -> Arc<dyn PasswordDigest> {
    digest_from_name(&TokenConfig::from_env().password_digest)
        .unwrap_or_else(|e| fail("Invalid PASSWORD_DIGEST", e))
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    let stores = Stores::connect()
        .await
        .unwrap_or_else(|e| fail("Failed to connect to the store", e));

    match cli.command {
        Commands::CreateOrganization {
            tenant_id,
            domain,
            description,
            email,
        } => {
            handle_create_organization(&stores, tenant_id, domain, description, email).await
        }
        Commands::CreateAdmin {
            tenant_id,
            dni,
            full_name,
            password,
        } => handle_create_admin(&stores, tenant_id, dni, full_name, password).await,
        Commands::Seed {
            organizations,
            instructors,
            clients,
            password,
        } => handle_seed(&stores, organizations, instructors, clients, password).await,
    }
}

async fn handle_create_organization(
    stores: &Stores,
    tenant_id: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    email: Option<String>,
) {
    let tenant_id = prompt(tenant_id, "Tenant id");
    let domain = prompt(domain, "Domain");
    let description = prompt(description, "Description");
    let email = prompt(email, "Contact email");

    match create_organization(stores, &tenant_id, &domain, &description, &email).await {
        Ok(organization) => {
            println!("\n✅ Organization created successfully!");
            println!("   Tenant: {}", organization.tenant_id);
            println!("   Port: {}", organization.port);
        }
        Err(e) => fail("Error creating organization", e),
    }
}

async fn handle_create_admin(
    stores: &Stores,
    tenant_id: Option<String>,
    dni: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
) {
    let tenant_id = prompt(tenant_id, "Tenant id");
    let dni = prompt(dni, "DNI");
    let full_name = prompt(full_name, "Full name");
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    let digest = configured_digest();
    match create_admin(stores, digest.as_ref(), &tenant_id, &dni, &full_name, &password).await {
        Ok(admin) => {
            println!("\n✅ Admin created successfully!");
            println!("   Tenant: {}", admin.tenant_id);
            println!("   DNI: {}", admin.dni);
            println!("   Name: {}", admin.full_name);
        }
        Err(e) => fail("Error creating admin", e),
    }
}

async fn handle_seed(
    stores: &Stores,
    organizations: usize,
    instructors: usize,
    clients: usize,
    password: String,
) {
    let config = SeedConfig::new(organizations)
        .with_users(UsersPerOrganization {
            instructors,
            clients,
        })
        .with_password(password);

    let digest = configured_digest();
    if let Err(e) = seeder::seed_all(stores, digest.as_ref(), config).await {
        fail("Error seeding store", e);
    }
}
