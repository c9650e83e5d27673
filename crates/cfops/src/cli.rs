//! Clap derive structures for the `cfops` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use clap::{Args, Parser, Subcommand, ValueEnum};

use cfops_core::{CoreError, Level, RouteTarget};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cfops -- route and domain management for Cloud Foundry
#[derive(Debug, Parser)]
#[command(
    name = "cfops",
    version,
    about = "Manage Cloud Foundry routes and domains from the command line",
    long_about = "Resolve, create, map and clean up Cloud Foundry routes and domains.\n\n\
        Talks to the v2 cloud controller API with a bearer token; deletions\n\
        wait for the controller's asynchronous jobs to finish.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "CFOPS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cloud controller API URL (overrides profile)
    #[arg(long, env = "CFOPS_API", global = true)]
    pub api: Option<String>,

    /// Organization to target (overrides profile)
    #[arg(long, env = "CFOPS_ORG", global = true)]
    pub org: Option<String>,

    /// Space to target (overrides profile)
    #[arg(long, short = 's', env = "CFOPS_SPACE", global = true)]
    pub space: Option<String>,

    /// Bearer access token
    #[arg(long, env = "CFOPS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CFOPS_OUTPUT",
        global = true
    )]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CFOPS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "CFOPS_TIMEOUT",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Delay between job status checks in milliseconds
    #[arg(
        long,
        env = "CFOPS_POLL_INTERVAL",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: Option<u64>,

    /// Give up waiting for a job after this many seconds
    #[arg(
        long,
        env = "CFOPS_JOB_TIMEOUT",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub job_timeout: Option<u64>,
}

impl GlobalOpts {
    /// The selected output format; `table` until the config default has
    /// been applied.
    pub fn format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check, create, map and delete routes
    #[command(alias = "r")]
    Routes(RoutesArgs),

    /// Manage private and shared domains
    #[command(alias = "d")]
    Domains(DomainsArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Routes ───────────────────────────────────────────────────────────

/// A route named by domain, optional hostname and optional path.
#[derive(Debug, Args)]
pub struct RouteSpec {
    /// Domain the route lives under
    pub domain: String,

    /// Hostname prefix (e.g. `www` for `www.example.com`)
    #[arg(long = "hostname", short = 'n')]
    pub host: Option<String>,

    /// Path suffix (e.g. `/api`)
    #[arg(long)]
    pub path: Option<String>,
}

impl RouteSpec {
    pub fn to_target(&self) -> Result<RouteTarget, CoreError> {
        RouteTarget::new(&self.domain, self.host.clone(), self.path.clone())
    }
}

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// Report whether a route exists
    Check(RouteSpec),

    /// Create a route in a space (reuses an existing one)
    Create {
        /// Space to create the route in
        space: String,

        #[command(flatten)]
        route: RouteSpec,
    },

    /// Map an application in the targeted space to a route
    Map {
        /// Application name
        app: String,

        #[command(flatten)]
        route: RouteSpec,
    },

    /// Remove a route from an application
    Unmap {
        /// Application name
        app: String,

        #[command(flatten)]
        route: RouteSpec,
    },

    /// Delete a route and wait for the deletion job
    #[command(alias = "rm")]
    Delete(RouteSpec),

    /// List routes with their domain, space and application
    #[command(alias = "ls")]
    List {
        /// Scope of the listing
        #[arg(long, value_enum, default_value = "space")]
        level: LevelArg,
    },

    /// Delete every route in the targeted space that has no application
    /// and no bound service
    DeleteOrphaned,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    /// Every route of the organization
    #[value(alias = "organization")]
    Org,
    /// Routes of the targeted space
    Space,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Org => Self::Organization,
            LevelArg::Space => Self::Space,
        }
    }
}

// ── Domains ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: DomainsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DomainsCommand {
    /// List private domains of the organization, then shared domains
    #[command(alias = "ls")]
    List,

    /// Create a private domain owned by an organization
    Create {
        /// Domain name
        domain: String,
        /// Owning organization
        organization: String,
    },

    /// Share a private domain with another organization
    Share {
        /// Private domain name
        domain: String,
        /// Organization to share with
        organization: String,
    },

    /// Stop sharing a private domain with an organization
    Unshare {
        /// Private domain name
        domain: String,
        /// Organization to unshare from
        organization: String,
    },
}

// ── Config & Completions ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (tokens masked)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
