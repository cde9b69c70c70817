use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use paqueteria_auth::Session;
use paqueteria_cli::seeder::{self, AccountOutcome, SeedPlan, fixtures};
use paqueteria_config::{FirebaseConfig, SeedConfig};
use paqueteria_models::{AccountDescriptor, Role};
use paqueteria_observability::init_basic_console_logging;
use paqueteria_store::{FirestoreClient, IdentityToolkitClient, build_http_client};

#[derive(Parser)]
#[command(name = "paqueteria-cli")]
#[command(about = "Paqueteria CLI - Firebase provisioning tools", long_about = None)]
struct Cli {
    /// Service account key file (overrides FIREBASE_CREDENTIALS)
    #[arg(short = 'c', long, global = true)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full procedure: accounts, profiles, reset, sample data
    Seed {
        /// Keep existing senders, receivers and orders
        #[arg(long)]
        no_reset: bool,
    },
    /// Create the standard staff accounts and their profiles
    CreateUsers,
    /// Create a single account
    CreateUser {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Role: ADMINISTRADOR or REPARTIDOR
        #[arg(short = 'r', long)]
        role: Option<Role>,

        /// Do not write the profile document
        #[arg(long)]
        skip_profile: bool,
    },
    /// Write profiles for the standard accounts, which must already exist
    CreateProfiles,
    /// Insert the sample senders, receivers and orders
    SeedSamples {
        /// Keep existing senders, receivers and orders
        #[arg(long)]
        no_reset: bool,
    },
    /// Delete every sender, receiver and order
    ClearSamples,
}

struct Clients {
    accounts: IdentityToolkitClient,
    store: FirestoreClient,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut firebase = FirebaseConfig::from_env()?;
    if let Some(path) = cli.credentials {
        firebase = firebase.with_credentials_path(path);
    }
    let seed_config = SeedConfig::from_env()?;

    match cli.command {
        Commands::Seed { no_reset } => {
            let clients = connect(&firebase).await?;
            let config = if no_reset {
                seed_config.with_reset(false)
            } else {
                seed_config
            };
            let plan = SeedPlan::fixtures(Utc::now());
            seeder::seed_all(&clients.accounts, &clients.store, &plan, &config).await;
        }
        Commands::CreateUsers => {
            let clients = connect(&firebase).await?;
            let descriptors = fixtures::default_accounts();
            let (provisioned, profiles) = seeder::create_users(
                &clients.accounts,
                &clients.store,
                &descriptors,
                seed_config.profile_key,
            )
            .await;
            println!(
                "\n✅ Accounts: {} created, {} already existed, {} failed; {} profiles written",
                provisioned.created(),
                provisioned.already_existing(),
                provisioned.failed(),
                profiles.written.len()
            );
            println!();
            seeder::print_credentials(&descriptors);
        }
        Commands::CreateUser {
            email,
            password,
            name,
            role,
            skip_profile,
        } => {
            let descriptor = prompt_descriptor(email, password, name, role)?;
            let clients = connect(&firebase).await?;
            handle_create_user(&clients, &descriptor, &seed_config, skip_profile).await;
        }
        Commands::CreateProfiles => {
            let clients = connect(&firebase).await?;
            let (found, profiles) = seeder::create_profiles(
                &clients.accounts,
                &clients.store,
                &fixtures::default_accounts(),
                seed_config.profile_key,
            )
            .await;
            println!(
                "\n✅ {} of {} accounts found; {} profiles written",
                found.already_existing(),
                found.accounts.len(),
                profiles.written.len()
            );
        }
        Commands::SeedSamples { no_reset } => {
            let clients = connect(&firebase).await?;
            let reset = seed_config.reset_collections && !no_reset;
            let batch = SeedPlan::fixtures(Utc::now()).samples;
            let (_, samples) = seeder::seed_samples_only(&clients.store, &batch, reset).await;
            println!(
                "\n✅ Created {} senders, {} receivers, {} orders",
                samples.senders.inserted.len(),
                samples.receivers.inserted.len(),
                samples.orders.inserted.len()
            );
        }
        Commands::ClearSamples => {
            let clients = connect(&firebase).await?;
            let reset = seeder::clear_samples(&clients.store).await;
            println!("\n✅ Cleared {} sample documents", reset.total_deleted());
        }
    }

    Ok(())
}

/// Authenticates and builds both clients. Every error here is fatal setup.
async fn connect(firebase: &FirebaseConfig) -> anyhow::Result<Clients> {
    println!("🔥 Connecting to Firebase...");

    let http = build_http_client(firebase)?;
    let session = Session::establish(firebase, &http)
        .await
        .with_context(|| {
            format!(
                "could not authenticate with '{}'",
                firebase.credentials_path.display()
            )
        })?;

    println!("✅ Connected to project '{}'\n", session.project_id());

    Ok(Clients {
        accounts: IdentityToolkitClient::from_session(http.clone(), firebase, &session),
        store: FirestoreClient::from_session(http, firebase, &session),
    })
}

fn prompt_descriptor(
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    role: Option<Role>,
) -> anyhow::Result<AccountDescriptor> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };

    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Display name")
            .interact_text()
            .context("failed to read display name")?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let labels: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
            let selected = Select::new()
                .with_prompt("Role")
                .items(&labels)
                .default(0)
                .interact()
                .context("failed to read role")?;
            Role::ALL[selected]
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    Ok(AccountDescriptor::new(email, password, name, role))
}

async fn handle_create_user(
    clients: &Clients,
    descriptor: &AccountDescriptor,
    config: &SeedConfig,
    skip_profile: bool,
) {
    println!("🔐 Creating account {}...", descriptor.email);
    let provisioned = seeder::provision_account(&clients.accounts, descriptor).await;

    match (&provisioned.outcome, &provisioned.account) {
        (AccountOutcome::Created(id), _) => {
            println!("\n✅ Account '{}' created successfully!", descriptor.display_name);
            println!("   📧 Email: {}", descriptor.email);
            println!("   🔑 Password: {}", descriptor.password);
            println!("   👤 Role: {}", descriptor.role);
            println!("   🆔 UID: {}", id);
        }
        (AccountOutcome::AlreadyExists(id), account) => {
            let display_name = account
                .as_ref()
                .and_then(|a| a.display_name.as_deref())
                .unwrap_or("-");
            println!("\nℹ️  Account '{}' already exists", descriptor.email);
            println!("   📧 Email: {}", descriptor.email);
            println!("   👤 Display name: {}", display_name);
            println!("   🆔 UID: {}", id);
        }
        (AccountOutcome::Failed(reason), _) => {
            eprintln!("\n❌ Error creating account {}: {}", descriptor.email, reason);
            return;
        }
    }

    if skip_profile {
        return;
    }

    if let Some(id) = provisioned.outcome.account_id() {
        let key = seeder::profile_key(id, descriptor, config.profile_key);
        match seeder::write_profile(&clients.store, &key, descriptor).await {
            Ok(()) => println!("   ✓ Profile written to usuarios/{key}"),
            Err(e) => eprintln!("   ❌ Error writing profile: {e}"),
        }
    }
}
