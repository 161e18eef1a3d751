//! CLI commands

use anyhow::{Context as _, Result, bail};
use backoffice_http::types::{
    PersonDraft, PersonFilters, PersonId, PersonPatch, ProductDraft, ProductFilters, ProductId,
    ProductPatch,
};
use backoffice_http::validation::{
    validate_credentials, validate_person, validate_person_patch, validate_product,
    validate_product_patch,
};
use backoffice_http::{ApiClient, HealthMonitor, HealthSnapshot, HealthState};
use clap::Subcommand;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, Settings};
use crate::output;
use crate::state_dir::StateDir;

/// Everything a command needs, built once from flags and settings
pub struct Context {
    pub client: ApiClient,
    pub settings: Settings,
    pub state_dir: StateDir,
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        username: String,

        /// Read from standard input when omitted
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Manage persons
    Persons {
        #[command(subcommand)]
        command: PersonCommands,
    },

    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Check backend health
    Health {
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// List persons
    List {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Sort field, prefix with '-' for descending
        #[arg(long)]
        ordering: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one person
    Get { id: PersonId },

    /// Create a person
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },

    /// Change some fields of a person
    Update {
        id: PersonId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a person
    Delete {
        id: PersonId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        price_min: Option<Decimal>,
        #[arg(long)]
        price_max: Option<Decimal>,
        /// Free-text search
        #[arg(short, long = "query")]
        q: Option<String>,
        /// Sort field, prefix with '-' for descending
        #[arg(long)]
        ordering: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one product
    Get { id: ProductId },

    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        sku: String,
        #[arg(long)]
        price: Decimal,
        /// Owning person
        #[arg(long)]
        owner: Option<PersonId>,
    },

    /// Change some fields of a product
    Update {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long, conflicts_with = "clear_owner")]
        owner: Option<PersonId>,
        /// Remove the owner
        #[arg(long)]
        clear_owner: bool,
    },

    /// Delete a product
    Delete {
        id: ProductId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration as TOML
    Init {
        /// Output file path (defaults to the config directory)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether the command runs until interrupted
    pub fn is_long_running(&self) -> bool {
        matches!(self, Self::Health { watch: true })
    }

    pub async fn execute(self, ctx: Context) -> Result<()> {
        match self {
            Self::Login { username, password } => login(&ctx, username, password).await,
            Self::Logout => {
                ctx.client.logout();
                println!("Signed out.");
                Ok(())
            }
            Self::Whoami => whoami(&ctx),
            Self::Refresh => {
                ctx.client.refresh_token().await?;
                println!("Access token refreshed.");
                Ok(())
            }
            Self::Persons { command } => command.execute(&ctx).await,
            Self::Products { command } => command.execute(&ctx).await,
            Self::Health { watch: false } => health_once(&ctx).await,
            Self::Health { watch: true } => health_watch(ctx).await,
            Self::Config { command } => command.execute(&ctx.state_dir),
        }
    }
}

impl PersonCommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let client = &ctx.client;
        let locale = client.locale();

        match self {
            Self::List {
                email,
                last_name,
                search,
                ordering,
                page,
                page_size,
            } => {
                let filters = PersonFilters {
                    email,
                    last_name,
                    search,
                    ordering,
                    page,
                    page_size,
                };
                let persons = client.list_persons(&filters).await?;
                if ctx.json {
                    return output::print_json(&persons);
                }
                println!("{}", output::persons_table(&persons.results).render());
                println!(
                    "{}",
                    output::page_footer(&persons, filters.page, filters.page_size)
                );
                Ok(())
            }
            Self::Get { id } => {
                let person = client.get_person(id).await?;
                if ctx.json {
                    return output::print_json(&person);
                }
                output::print_person(&person);
                Ok(())
            }
            Self::Create {
                first_name,
                last_name,
                email,
            } => {
                let draft = PersonDraft {
                    first_name,
                    last_name,
                    email,
                };
                validate_person(&draft, locale)?;
                let person = client.create_person(&draft).await?;
                if ctx.json {
                    return output::print_json(&person);
                }
                println!("Created person {} ({})", person.full_name(), person.id);
                Ok(())
            }
            Self::Update {
                id,
                first_name,
                last_name,
                email,
            } => {
                let patch = PersonPatch {
                    first_name,
                    last_name,
                    email,
                };
                if patch.is_empty() {
                    bail!("Nothing to update; pass at least one field");
                }
                validate_person_patch(&patch, locale)?;
                let person = client.update_person(id, &patch).await?;
                if ctx.json {
                    return output::print_json(&person);
                }
                println!("Updated person {} ({})", person.full_name(), person.id);
                Ok(())
            }
            Self::Delete { id, yes } => {
                let person = client.get_person(id).await?;
                let name = person.full_name();
                if !yes && !confirm(&locale.confirm_delete_person(&name))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                client.delete_person(id).await?;
                info!(id, "Person deleted");
                println!("Deleted person {name}");
                Ok(())
            }
        }
    }
}

impl ProductCommands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let client = &ctx.client;
        let locale = client.locale();

        match self {
            Self::List {
                sku,
                price_min,
                price_max,
                q,
                ordering,
                page,
                page_size,
            } => {
                let filters = ProductFilters {
                    sku,
                    price_min,
                    price_max,
                    q,
                    ordering,
                    page,
                    page_size,
                };
                let products = client.list_products(&filters).await?;
                if ctx.json {
                    return output::print_json(&products);
                }
                println!("{}", output::products_table(&products.results).render());
                println!(
                    "{}",
                    output::page_footer(&products, filters.page, filters.page_size)
                );
                Ok(())
            }
            Self::Get { id } => {
                let product = client.get_product(id).await?;
                if ctx.json {
                    return output::print_json(&product);
                }
                output::print_product(&product);
                Ok(())
            }
            Self::Create {
                name,
                sku,
                price,
                owner,
            } => {
                let draft = ProductDraft {
                    name,
                    sku,
                    price,
                    owner,
                };
                validate_product(&draft, locale)?;
                let product = client.create_product(&draft).await?;
                if ctx.json {
                    return output::print_json(&product);
                }
                println!("Created product {} ({})", product.name, product.id);
                Ok(())
            }
            Self::Update {
                id,
                name,
                sku,
                price,
                owner,
                clear_owner,
            } => {
                let patch = ProductPatch {
                    name,
                    sku,
                    price,
                    owner: if clear_owner { Some(None) } else { owner.map(Some) },
                };
                if patch.is_empty() {
                    bail!("Nothing to update; pass at least one field");
                }
                validate_product_patch(&patch, locale)?;
                let product = client.update_product(id, &patch).await?;
                if ctx.json {
                    return output::print_json(&product);
                }
                println!("Updated product {} ({})", product.name, product.id);
                Ok(())
            }
            Self::Delete { id, yes } => {
                let product = client.get_product(id).await?;
                if !yes && !confirm(&locale.confirm_delete_product(&product.name))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                client.delete_product(id).await?;
                info!(id, "Product deleted");
                println!("Deleted product {}", product.name);
                Ok(())
            }
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, state_dir: &StateDir) -> Result<()> {
        match self {
            Self::Init { output, force } => {
                let config_path = output.unwrap_or_else(|| state_dir.config_path());

                if config_path.exists() && !force {
                    bail!(
                        "{} already exists; use --force to overwrite",
                        config_path.display()
                    );
                }

                if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
        }
    }
}

async fn login(ctx: &Context, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    validate_credentials(&username, &password, ctx.client.locale())?;

    let response = ctx.client.login(username, password).await?;
    if ctx.json {
        return output::print_json(&response.user);
    }
    match response.user {
        Some(user) => println!("Signed in as {}", user.display_name()),
        None => println!("Signed in."),
    }
    Ok(())
}

fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.client.session();
    if !session.is_authenticated() {
        bail!("Not signed in. Run `backoffice login` first.");
    }

    let user = session.current_user();
    if ctx.json {
        return output::print_json(&user);
    }
    match user {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("Username: {}", user.username);
        }
        None => println!("Signed in; no profile was stored with the session."),
    }
    Ok(())
}

async fn health_once(ctx: &Context) -> Result<()> {
    let status = ctx.client.health().await.context("Backend is offline")?;
    if ctx.json {
        return output::print_json(&status);
    }
    match &status.service {
        Some(service) => println!("online: {} ({})", status.status, service),
        None => println!("online: {}", status.status),
    }
    Ok(())
}

async fn health_watch(ctx: Context) -> Result<()> {
    let interval = ctx.settings.health.interval();
    let json = ctx.json;
    let monitor = HealthMonitor::start_with_interval(ctx.client, interval);
    let mut updates = monitor.subscribe();

    println!(
        "Checking {} every {}s, press Ctrl-C to stop",
        ctx.settings.api.base_url,
        interval.as_secs()
    );

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.state != HealthState::Checking {
                    print_snapshot(&snapshot, json)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    monitor.shutdown();
    Ok(())
}

fn print_snapshot(snapshot: &HealthSnapshot, json: bool) -> Result<()> {
    let at = snapshot
        .checked_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    if json {
        return output::print_json(&serde_json::json!({
            "state": snapshot.state.to_string(),
            "checked_at": snapshot.checked_at,
            "payload": snapshot.payload,
        }));
    }

    match &snapshot.payload {
        Some(payload) => println!("[{at}] {} ({})", snapshot.state, payload.status),
        None => println!("[{at}] {}", snapshot.state),
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from standard input")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}
