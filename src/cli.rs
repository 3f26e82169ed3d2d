//! Command-line surface and top-level dispatch.
//!
//! The argument names mirror the backend's wire fields where they map
//! directly (`--expect-status`, `--retry-interval`, …). Every network
//! subcommand carries the same auth block: `--host`/`--token` override
//! the profile store when both are given, `--use-env` names a profile,
//! and the default profile is the fallback.

use crate::commands;
use crate::exit_codes::{self, ExitCode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "synthctl",
    version,
    about = "Manage synthetic monitoring tests, credentials and smart alerts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage backend connection profiles
    Config(ConfigArgs),
    /// Create a synthetic test, credential or smart alert
    Create(CreateArgs),
    /// Show tests, locations, credentials, alerts or playback results
    Get(GetArgs),
    /// Patch a single field of a synthetic test or credential
    Patch(PatchArgs),
    /// Update a synthetic test, smart alert or credential
    Update(UpdateArgs),
    /// Delete tests, locations, credentials or alerts
    Delete(DeleteArgs),
}

/// Endpoint selection shared by every network subcommand.
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Use a named connection profile
    #[arg(long = "use-env", short = 'e', value_name = "name")]
    pub use_env: Option<String>,

    /// Backend hostname; overrides the profile store together with --token
    #[arg(long, value_name = "host")]
    pub host: Option<String>,

    /// API token; overrides the profile store together with --host
    #[arg(long, value_name = "token")]
    pub token: Option<String>,

    /// Verify the backend TLS certificate (off by default)
    #[arg(long = "verify-tls")]
    pub verify_tls: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    Set,
    List,
    Use,
    Remove,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Profile operation
    #[arg(value_enum)]
    pub action: ConfigAction,

    /// Profile name
    #[arg(long = "name", alias = "env", value_name = "name")]
    pub name: Option<String>,

    /// Backend hostname
    #[arg(long, value_name = "host")]
    pub host: Option<String>,

    /// API token
    #[arg(long, short = 't', value_name = "token")]
    pub token: Option<String>,

    /// Show tokens (base64) in the listing
    #[arg(long = "show-token")]
    pub show_token: bool,

    /// Flag the profile as default
    #[arg(long)]
    pub default: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    Test,
    Cred,
    Alert,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// What to create
    #[arg(value_enum)]
    pub kind: CreateKind,

    /// Test kind: HTTPAction[0], HTTPScript[1], BrowserScript[2],
    /// WebpageScript[3], WebpageAction[4], SSLCertificate[5]
    #[arg(short = 't', long = "type", value_name = "int")]
    pub syn_type: Option<u8>,

    /// Location ids the test runs from
    #[arg(long, num_args = 1.., value_name = "id")]
    pub location: Vec<String>,

    /// Friendly name of the test
    #[arg(long, value_name = "string")]
    pub label: Option<String>,

    #[arg(long, short = 'd', value_name = "string")]
    pub description: Option<String>,

    /// Run frequency in minutes, [1,120] ([1,1440] for SSL checks)
    #[arg(long, value_name = "int")]
    pub frequency: Option<u32>,

    /// Application ids
    #[arg(long = "apps", alias = "applications", num_args = 1.., value_name = "id")]
    pub apps: Vec<String>,

    #[arg(long, num_args = 1.., value_name = "id")]
    pub websites: Vec<String>,

    #[arg(long = "mobile-apps", alias = "mobile-applications", num_args = 1.., value_name = "id")]
    pub mobile_apps: Vec<String>,

    /// Retry count, [0,2]
    #[arg(long, value_name = "int")]
    pub retries: Option<i64>,

    /// Minutes between retries, [1,10]
    #[arg(long = "retry-interval", value_name = "int")]
    pub retry_interval: Option<i64>,

    /// Timeout as <number>(ms|s|m)
    #[arg(long, value_name = "num")]
    pub timeout: Option<String>,

    /// JSON object of additional name/value pairs
    #[arg(long = "custom-properties", value_name = "json")]
    pub custom_properties: Option<String>,

    /// HTTP request URL
    #[arg(long, value_name = "url")]
    pub url: Option<String>,

    /// HTTP request method
    #[arg(long, value_name = "method")]
    pub operation: Option<String>,

    #[arg(long = "follow-redirect", value_name = "boolean", default_value = "true")]
    pub follow_redirect: String,

    /// HTTP headers as a JSON object
    #[arg(long, value_name = "json")]
    pub headers: Option<String>,

    #[arg(long, value_name = "string")]
    pub body: Option<String>,

    /// Full test payload from a .json file
    #[arg(long = "from-file", short = 'f', value_name = "file")]
    pub from_file: Option<String>,

    /// Script file (.js/.side) for script kinds
    #[arg(long, value_name = "file")]
    pub script: Option<String>,

    /// Bundle zip file, or base64-encoded zip content
    #[arg(long, value_name = "bundle")]
    pub bundle: Option<String>,

    /// Entry file inside the bundle
    #[arg(long = "bundle-entry-file", value_name = "filename")]
    pub bundle_entry_file: Option<String>,

    #[arg(long = "expect-status", value_name = "int")]
    pub expect_status: Option<i64>,

    #[arg(long = "expect-json", value_name = "json")]
    pub expect_json: Option<String>,

    #[arg(long = "expect-match", value_name = "regex")]
    pub expect_match: Option<String>,

    /// JSON list of property labels that must exist in the response
    #[arg(long = "expect-exists", value_name = "json")]
    pub expect_exists: Option<String>,

    /// JSON list of property labels that must exist and be non-empty
    #[arg(long = "expect-not-empty", value_name = "json")]
    pub expect_not_empty: Option<String>,

    #[arg(long = "allow-insecure", value_name = "boolean", default_value = "true")]
    pub allow_insecure: String,

    #[arg(long = "validation-string", value_name = "string")]
    pub validation_string: Option<String>,

    /// Browser for browser-driven kinds
    #[arg(long, value_name = "string", default_value = "chrome")]
    pub browser: String,

    #[arg(long = "record-video", value_name = "boolean")]
    pub record_video: Option<String>,

    /// SSL check: hostname under test
    #[arg(long, value_name = "host")]
    pub hostname: Option<String>,

    /// SSL check: port
    #[arg(long)]
    pub port: Option<u16>,

    /// SSL check: minimum days before certificate expiry
    #[arg(long = "remaining-days-check", value_name = "int")]
    pub remaining_days_check: Option<u32>,

    /// Credential name
    #[arg(long, value_name = "key")]
    pub key: Option<String>,

    /// Credential value
    #[arg(long, value_name = "value")]
    pub value: Option<String>,

    /// Smart alert name
    #[arg(long, value_name = "string")]
    pub name: Option<String>,

    /// Test ids the alert watches
    #[arg(long, num_args = 1.., value_name = "id")]
    pub test: Vec<String>,

    /// Alert channel ids
    #[arg(long = "alert-channel", num_args = 1.., value_name = "id")]
    pub alert_channel: Vec<String>,

    /// Alert severity: warning or critical
    #[arg(long, value_name = "string")]
    pub severity: Option<String>,

    /// Failures in sequence before alerting, [1,12]
    #[arg(long = "violation-count", value_name = "int")]
    pub violation_count: Option<i64>,

    /// Tag filter expression as JSON
    #[arg(long = "tag-filter-expression", value_name = "json")]
    pub tag_filter_expression: Option<String>,

    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetKind {
    Test,
    #[value(alias = "lo")]
    Location,
    Cred,
    Alert,
    AlertChannel,
    Result,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// What to show
    #[arg(value_enum)]
    pub kind: GetKind,

    /// Entity id (test id, location id, credential name, alert id)
    pub id: Option<String>,

    /// Filter tests by kind index (0-5)
    #[arg(short = 't', long = "type", value_name = "int")]
    pub syn_type: Option<u8>,

    /// Result window, [1,60]m or [1,24]h
    #[arg(long = "window-size", value_name = "window", default_value = "1h")]
    pub window_size: String,

    /// Save the test script to disk as <label>.(js|side|zip)
    #[arg(long = "save-script")]
    pub save_script: bool,

    /// Print the test script to the terminal
    #[arg(long = "show-script")]
    pub show_script: bool,

    /// Print full details to the terminal
    #[arg(long = "show-details")]
    pub show_details: bool,

    /// Print the raw JSON payload
    #[arg(long = "show-json")]
    pub show_json: bool,

    /// Include success rate and response time columns
    #[arg(long = "show-result")]
    pub show_result: bool,

    /// Server-side filter, e.g. locationId=<id> or applicationId=<id>
    #[arg(long, value_name = "key=value")]
    pub filter: Option<String>,

    /// Test id when listing playback results
    #[arg(long, value_name = "id")]
    pub test: Option<String>,

    /// Include the HAR archive with result details
    #[arg(long)]
    pub har: bool,

    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Test,
    Cred,
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// What to patch
    #[arg(value_enum)]
    pub kind: PatchKind,

    /// Test id or credential name
    pub id: String,

    #[arg(long, value_name = "boolean")]
    pub active: Option<String>,

    #[arg(long, value_name = "int")]
    pub frequency: Option<u32>,

    #[arg(long, num_args = 1.., value_name = "id")]
    pub location: Vec<String>,

    #[arg(long, value_name = "string")]
    pub description: Option<String>,

    #[arg(long, value_name = "string")]
    pub label: Option<String>,

    #[arg(long, value_name = "int")]
    pub retries: Option<i64>,

    #[arg(long = "retry-interval", value_name = "int")]
    pub retry_interval: Option<i64>,

    #[arg(long, value_name = "num")]
    pub timeout: Option<String>,

    /// Comma-separated key=value pairs
    #[arg(long = "custom-properties", value_name = "string")]
    pub custom_properties: Option<String>,

    #[arg(long, value_name = "method")]
    pub operation: Option<String>,

    #[arg(long = "mark-synthetic-call", value_name = "boolean")]
    pub mark_synthetic_call: Option<String>,

    #[arg(long, value_name = "url")]
    pub url: Option<String>,

    #[arg(long = "follow-redirect", value_name = "boolean")]
    pub follow_redirect: Option<String>,

    #[arg(long = "validation-string", value_name = "string")]
    pub validation_string: Option<String>,

    #[arg(long = "expect-status", value_name = "int")]
    pub expect_status: Option<i64>,

    #[arg(long = "expect-json", value_name = "json")]
    pub expect_json: Option<String>,

    #[arg(long = "expect-match", value_name = "regex")]
    pub expect_match: Option<String>,

    #[arg(long = "expect-exists", value_name = "json")]
    pub expect_exists: Option<String>,

    #[arg(long = "expect-not-empty", value_name = "json")]
    pub expect_not_empty: Option<String>,

    #[arg(long = "allow-insecure", value_name = "boolean")]
    pub allow_insecure: Option<String>,

    #[arg(long = "record-video", value_name = "boolean")]
    pub record_video: Option<String>,

    #[arg(long, value_name = "string")]
    pub browser: Option<String>,

    /// Script file replacing the test script
    #[arg(long, value_name = "filename")]
    pub script: Option<String>,

    #[arg(long, value_name = "bundle")]
    pub bundle: Option<String>,

    #[arg(long = "bundle-entry-file", value_name = "string")]
    pub bundle_entry_file: Option<String>,

    #[arg(long, value_name = "host")]
    pub hostname: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long = "remaining-days-check", value_name = "int")]
    pub remaining_days_check: Option<u32>,

    /// Credential: application ids
    #[arg(long = "applications", alias = "apps", num_args = 1.., value_name = "id")]
    pub applications: Vec<String>,

    /// Credential: website ids
    #[arg(long, num_args = 1.., value_name = "id")]
    pub websites: Vec<String>,

    /// Credential: mobile app ids
    #[arg(long = "mobile-apps", alias = "mobile-applications", num_args = 1.., value_name = "id")]
    pub mobile_apps: Vec<String>,

    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Test,
    Alert,
    Cred,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// What to update
    #[arg(value_enum)]
    pub kind: UpdateKind,

    /// Test id, alert id or credential name
    pub id: String,

    #[arg(long, value_name = "boolean")]
    pub active: Option<String>,

    #[arg(long, value_name = "int")]
    pub frequency: Option<u32>,

    #[arg(long, num_args = 1.., value_name = "id")]
    pub location: Vec<String>,

    #[arg(long, value_name = "string")]
    pub description: Option<String>,

    #[arg(long, value_name = "string")]
    pub label: Option<String>,

    #[arg(long, value_name = "int")]
    pub retries: Option<i64>,

    #[arg(long = "retry-interval", value_name = "int")]
    pub retry_interval: Option<i64>,

    #[arg(long, value_name = "num")]
    pub timeout: Option<String>,

    /// Comma-separated key=value pairs
    #[arg(long = "custom-properties", value_name = "string")]
    pub custom_properties: Option<String>,

    #[arg(long = "apps", alias = "applications", num_args = 1.., value_name = "id")]
    pub apps: Vec<String>,

    #[arg(long, num_args = 1.., value_name = "id")]
    pub websites: Vec<String>,

    #[arg(long = "mobile-apps", alias = "mobile-applications", num_args = 1.., value_name = "id")]
    pub mobile_apps: Vec<String>,

    /// Comma-separated header=value pairs
    #[arg(long, value_name = "string")]
    pub headers: Option<String>,

    #[arg(long, value_name = "string")]
    pub body: Option<String>,

    #[arg(long, value_name = "method")]
    pub operation: Option<String>,

    #[arg(long = "mark-synthetic-call", value_name = "boolean")]
    pub mark_synthetic_call: Option<String>,

    #[arg(long = "validation-string", value_name = "string")]
    pub validation_string: Option<String>,

    #[arg(long, value_name = "url")]
    pub url: Option<String>,

    #[arg(long = "follow-redirect", value_name = "boolean")]
    pub follow_redirect: Option<String>,

    #[arg(long = "expect-status", value_name = "int")]
    pub expect_status: Option<i64>,

    #[arg(long = "expect-json", value_name = "json")]
    pub expect_json: Option<String>,

    #[arg(long = "expect-match", value_name = "regex")]
    pub expect_match: Option<String>,

    #[arg(long = "expect-exists", value_name = "json")]
    pub expect_exists: Option<String>,

    #[arg(long = "expect-not-empty", value_name = "json")]
    pub expect_not_empty: Option<String>,

    #[arg(long = "allow-insecure", value_name = "boolean")]
    pub allow_insecure: Option<String>,

    #[arg(long = "record-video", value_name = "boolean")]
    pub record_video: Option<String>,

    #[arg(long, value_name = "string")]
    pub browser: Option<String>,

    /// Full replacement payload from a .json file
    #[arg(long = "from-file", short = 'f', value_name = "filename")]
    pub from_file: Option<String>,

    #[arg(long, value_name = "filename")]
    pub script: Option<String>,

    #[arg(long, value_name = "bundle")]
    pub bundle: Option<String>,

    #[arg(long = "bundle-entry-file", value_name = "string")]
    pub bundle_entry_file: Option<String>,

    #[arg(long, value_name = "host")]
    pub hostname: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long = "remaining-days-check", value_name = "int")]
    pub remaining_days_check: Option<u32>,

    /// Smart alert name
    #[arg(long, value_name = "string")]
    pub name: Option<String>,

    /// Test ids the alert watches
    #[arg(long, num_args = 1.., value_name = "id")]
    pub test: Vec<String>,

    #[arg(long = "alert-channel", num_args = 1.., value_name = "id")]
    pub alert_channel: Vec<String>,

    #[arg(long, value_name = "string")]
    pub severity: Option<String>,

    #[arg(long = "violation-count", value_name = "int")]
    pub violation_count: Option<i64>,

    #[arg(long = "tag-filter-expression", value_name = "json")]
    pub tag_filter_expression: Option<String>,

    /// Enable a smart alert
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Disable a smart alert
    #[arg(long)]
    pub disable: bool,

    /// Credential value
    #[arg(long, value_name = "value")]
    pub value: Option<String>,

    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    Test,
    #[value(alias = "lo")]
    Location,
    Cred,
    Alert,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// What to delete
    #[arg(value_enum)]
    pub kind: DeleteKind,

    /// Ids (or credential names) to delete
    #[arg(value_name = "id")]
    pub ids: Vec<String>,

    /// Delete tests whose label matches this regex
    #[arg(long = "match-regex", value_name = "regex", conflicts_with_all = ["match_location", "no_locations"])]
    pub match_regex: Option<String>,

    /// Delete tests whose only location is this id
    #[arg(long = "match-location", value_name = "id", conflicts_with = "no_locations")]
    pub match_location: Option<String>,

    /// Delete tests with no locations
    #[arg(long = "no-locations")]
    pub no_locations: bool,

    #[command(flatten)]
    pub auth: AuthArgs,
}

/// Parse arguments, run the selected command and map errors to exit
/// codes. All output, including errors, happens here or below; main only
/// exits with the returned code.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Config(args) => commands::config::run(&args),
        Commands::Create(args) => commands::create::run(&args),
        Commands::Get(args) => commands::get::run(&args),
        Commands::Patch(args) => commands::patch::run(&args),
        Commands::Update(args) => commands::update::run(&args),
        Commands::Delete(args) => commands::delete::run(&args),
    };

    match result {
        Ok(()) => Ok(()),
        Err(error) => {
            eprintln!("synthctl: {error:#}");
            Err(exit_codes::for_error(&error))
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
