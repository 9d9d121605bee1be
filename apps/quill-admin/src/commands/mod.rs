//! CLI commands.

mod posts;
mod users;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quill_infra::database::{PostgresPostRepository, PostgresUserRepository};
use quill_infra::{Argon2PasswordService, DatabaseConfig};

/// quill-admin - moderate posts and manage accounts
#[derive(Debug, Parser)]
#[command(name = "quill-admin")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List posts awaiting approval, newest first
    Pending,

    /// Publish a post (by id or slug)
    Approve {
        /// Post id or slug
        post: String,
    },

    /// Take a post off the public listings (by id or slug)
    Revoke {
        /// Post id or slug
        post: String,
    },

    /// Create an account
    CreateUser(users::CreateUserArgs),

    /// Grant or revoke the staff role
    SetStaff {
        username: String,

        /// Remove the role instead of granting it
        #[arg(long)]
        revoke: bool,
    },
}

/// Run the CLI application
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let url = cli
        .database_url
        .context("DATABASE_URL is not set (pass --database-url or export it)")?;
    let db = quill_infra::connect(&DatabaseConfig {
        max_connections: 2,
        min_connections: 1,
        ..DatabaseConfig::new(url)
    })
    .await
    .context("Failed to connect to the database")?;

    let users = PostgresUserRepository::new(db.clone());
    let posts = PostgresPostRepository::new(db);

    match cli.command {
        Commands::Pending => {
            let pending = posts::pending(&posts).await?;
            if pending.is_empty() {
                println!("No posts awaiting approval.");
            }
            for item in pending {
                println!("{}", posts::describe(&item.post, &item.author));
            }
        }
        Commands::Approve { post } => {
            let post = posts::set_approval(&posts, &post, true).await?;
            println!("Approved \"{}\" ({})", post.title, post.id);
        }
        Commands::Revoke { post } => {
            let post = posts::set_approval(&posts, &post, false).await?;
            println!("Revoked approval of \"{}\" ({})", post.title, post.id);
        }
        Commands::CreateUser(args) => {
            let user = users::create_user(&users, &Argon2PasswordService::new(), args).await?;
            println!(
                "Created {}{} ({})",
                user.username,
                if user.is_staff { " [staff]" } else { "" },
                user.id
            );
        }
        Commands::SetStaff { username, revoke } => {
            let user = users::set_staff(&users, &username, !revoke).await?;
            println!("{} staff: {}", user.username, user.is_staff);
        }
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info,quill_infra=info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
