use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod ui;

use cli::CliHandler;

#[derive(Parser)]
#[command(
    name = "sitedesk",
    about = "Admin client for the marketing site CMS",
    long_about = "sitedesk - command line admin for the marketing site CMS

OVERVIEW:
  Manage job openings, applications, contact messages, team members,
  gallery images and access codes on the site backend.

QUICK START:
  sitedesk login                        # Sign in as an admin
  sitedesk careers list                 # Public job openings
  sitedesk messages list                # Contact form inbox
  sitedesk status                       # Session and server details

The backend address comes from SITEDESK_BASE_URL or `sitedesk config set-url`.",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with an admin account
    Login(LoginArgs),

    /// Forget the local session
    Logout,

    /// Show session and server details
    #[command(aliases = &["st"])]
    Status,

    /// Manage job openings
    Careers {
        #[command(subcommand)]
        command: CareersCommand,
    },

    /// Review job applications
    #[command(aliases = &["apps"])]
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },

    /// Read contact form messages
    #[command(aliases = &["msg"])]
    Messages {
        #[command(subcommand)]
        command: MessagesCommand,
    },

    /// Manage team members
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },

    /// Manage gallery images
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },

    /// Generate and redeem access codes
    Codes {
        #[command(subcommand)]
        command: CodesCommand,
    },

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(short, long)]
    pub page: Option<u32>,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum CareersCommand {
    #[command(aliases = &["ls"])]
    List,
    Create(CreateCareerArgs),
    #[command(aliases = &["rm"])]
    Delete(RemoveArgs),
}

#[derive(Args)]
pub struct CreateCareerArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub location: String,

    #[arg(long = "type", default_value = "full-time")]
    pub employment_type: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub requirements: Option<String>,

    /// Create the opening unpublished
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Subcommand)]
pub enum ApplicationsCommand {
    #[command(aliases = &["ls"])]
    List(PageArgs),
}

#[derive(Subcommand)]
pub enum MessagesCommand {
    #[command(aliases = &["ls"])]
    List(PageArgs),
    Show { id: i64 },
}

#[derive(Subcommand)]
pub enum TeamCommand {
    #[command(aliases = &["ls"])]
    List,
    Add(AddMemberArgs),
    #[command(aliases = &["rm"])]
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct AddMemberArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub order: Option<i32>,

    /// Portrait image to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum GalleryCommand {
    #[command(aliases = &["ls"])]
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Image counts per category
    Categories,
    Add(AddImageArgs),
    #[command(aliases = &["rm"])]
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct AddImageArgs {
    pub image: PathBuf,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Subcommand)]
pub enum CodesCommand {
    Generate {
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    #[command(aliases = &["ls"])]
    List,
    Redeem { code: String },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetUrl { url: String },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut handler = CliHandler::with_config_path(cli.config);

    tracing_subscriber::fmt()
        .with_env_filter(handler.log_filter(cli.verbose))
        .with_target(false)
        .init();

    if let Err(e) = handler.execute(cli.command).await {
        handler.report(&e);
        std::process::exit(1);
    }
}
