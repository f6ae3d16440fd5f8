use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use config::{Config, Environment, File, FileFormat};
use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};

use triage::chat::{Conversation, TurnOutcome};
use triage::location::{
    DEFAULT_NOMINATIM_URL, FixedPosition, LocationError, LocationFix, NominatimGeocoder, Position,
    PositionOptions, PositionProvider, ReverseGeocoder, Unavailable, request_location,
};
use triage::markdown;
use triage::session::{SessionStore, StoredSession};
use triage::storage::{StorageConfig, create_store};
use triage::webhook::{DEFAULT_ENDPOINT, DEFAULT_SEARCH_RADIUS_KM, TriageClient, TriageClientConfig};

const APP_NAME: &str = "triage";

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_chat(ctx: RuntimeContext, cmd: ChatCommand) -> Result<()> {
    handle_chat(&ctx, cmd).await
}

#[tokio::main]
async fn async_sessions(ctx: RuntimeContext, cmd: SessionsCommand) -> Result<()> {
    handle_sessions(&ctx, cmd).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging()?;
    debug!("resolved paths: {:#?}", ctx.paths);

    match cli.command {
        Command::Chat(cmd) => async_chat(ctx, cmd),
        Command::Sessions { command } => async_sessions(ctx, command),
        Command::Init(cmd) => handle_init(&ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Triage - streaming chat client for a symptom-triage assistant.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true, conflicts_with = "yaml")]
    json: bool,
    /// Output machine readable YAML
    #[arg(long, global = true)]
    yaml: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    color: ColorOption,
    /// Do not change anything on disk
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    /// Assume "yes" for interactive prompts
    #[arg(short = 'y', long = "yes", global = true)]
    assume_yes: bool,
    /// Emit additional diagnostics for troubleshooting
    #[arg(long = "diagnostics", global = true)]
    diagnostics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOption {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat with the triage assistant
    Chat(ChatCommand),
    /// Inspect and manage saved sessions
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
    /// Create config directories and default files
    Init(InitCommand),
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct ChatCommand {
    /// Continue a saved session instead of starting a new one
    #[arg(long, value_name = "ID")]
    session: Option<String>,
    /// Latitude of the current position
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,
    /// Longitude of the current position
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,
    /// Send a single message and exit
    #[arg(short, long)]
    message: Option<String>,
    /// Skip reverse geocoding and use raw coordinates
    #[arg(long = "no-geocode")]
    no_geocode: bool,
    /// Facility search radius in kilometers
    #[arg(long, value_name = "KM")]
    radius: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum SessionsCommand {
    /// List saved sessions, most recently updated first
    List,
    /// Print the messages of a session
    Show { id: String },
    /// Delete a session
    Delete { id: String },
    /// Render a session as an HTML document
    Export {
        id: String,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct InitCommand {
    /// Recreate configuration even if it already exists
    #[arg(long = "force")]
    force: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration
    Show,
    /// Print the resolved config file path
    Path,
    /// Regenerate the default configuration file
    Reset,
}

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let mut paths = AppPaths::discover(common.config.clone())?;
        let config = load_or_init_config(&mut paths, &common)?;
        let paths = paths.apply_overrides(&config)?;
        let ctx = Self {
            common,
            paths,
            config,
        };
        ctx.ensure_directories()?;
        Ok(ctx)
    }

    fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        if self.common.quiet {
            log::set_max_level(LevelFilter::Off);
            return Ok(());
        }

        let level = match self.effective_log_level() {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        };

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("triage={level}")));

        // Log to stderr so streamed answers on stdout stay clean
        if self.common.json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .ok();
        } else {
            let force_color = matches!(self.common.color, ColorOption::Always)
                || env::var_os("FORCE_COLOR").is_some();
            let disable_color = self.common.no_color
                || matches!(self.common.color, ColorOption::Never)
                || env::var_os("NO_COLOR").is_some()
                || (!force_color && !io::stderr().is_terminal());

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(!disable_color)
                        .with_target(self.common.diagnostics)
                        .with_file(self.common.diagnostics)
                        .with_line_number(self.common.diagnostics),
                )
                .try_init()
                .ok();
        }

        // Also init env_logger for compatibility with log crate users
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        builder.filter_level(self.effective_log_level());
        builder.try_init().ok();

        Ok(())
    }

    fn effective_log_level(&self) -> LevelFilter {
        if self.common.trace {
            LevelFilter::Trace
        } else if self.common.debug {
            LevelFilter::Debug
        } else {
            match self.common.verbose {
                0 => self
                    .config
                    .logging
                    .level
                    .parse()
                    .unwrap_or(LevelFilter::Warn),
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    fn ensure_directories(&self) -> Result<()> {
        if self.common.dry_run {
            info!(
                "dry-run: would ensure data dir {}",
                self.paths.data_dir.display()
            );
            return Ok(());
        }

        fs::create_dir_all(&self.paths.data_dir).with_context(|| {
            format!("creating data directory {}", self.paths.data_dir.display())
        })?;
        Ok(())
    }

    fn session_store(&self) -> Result<SessionStore> {
        let storage = match self.config.storage.backend {
            StorageBackend::Memory => StorageConfig::Memory,
            StorageBackend::Local => {
                let path = match self.config.storage.path {
                    Some(ref path) => expand_str_path(path)?,
                    None => self.paths.data_dir.join("sessions"),
                };
                debug!("session storage at {}", path.display());
                StorageConfig::Local(path)
            }
        };
        Ok(SessionStore::new(create_store(storage)))
    }

    fn triage_client(&self) -> Result<TriageClient> {
        let webhook = &self.config.webhook;
        TriageClient::new(TriageClientConfig {
            endpoint: webhook.endpoint.clone(),
            connect_timeout: webhook.connect_timeout_secs.map(Duration::from_secs),
        })
        .context("creating webhook client")
    }

    fn geocoder(&self) -> Result<Option<NominatimGeocoder>> {
        let geocoding = &self.config.geocoding;
        if !geocoding.enabled {
            return Ok(None);
        }
        let geocoder = NominatimGeocoder::new(&geocoding.base_url, &geocoding.user_agent)
            .context("creating reverse geocoding client")?;
        Ok(Some(geocoder))
    }
}

#[derive(Debug, Clone)]
struct AppPaths {
    config_file: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    fn discover(override_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match override_path {
            Some(path) => {
                let expanded = expand_path(path)?;
                if expanded.is_dir() {
                    expanded.join("config.toml")
                } else {
                    expanded
                }
            }
            None => default_config_dir()?.join("config.toml"),
        };

        if config_file.parent().is_none() {
            return Err(anyhow!("invalid config file path: {config_file:?}"));
        }

        let data_dir = default_data_dir()?;

        Ok(Self {
            config_file,
            data_dir,
        })
    }

    fn apply_overrides(mut self, cfg: &AppConfig) -> Result<Self> {
        if let Some(ref data_override) = cfg.paths.data_dir {
            self.data_dir = expand_str_path(data_override)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    profile: String,
    logging: LoggingConfig,
    webhook: WebhookConfig,
    geocoding: GeocodingConfig,
    location: LocationConfig,
    storage: StorageSection,
    paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct LoggingConfig {
    level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Triage webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct WebhookConfig {
    /// URL the chat requests are posted to.
    endpoint: String,
    /// Facility search radius sent with every request.
    search_radius_km: u32,
    /// Connect timeout in seconds. Reading the streamed answer is never timed out.
    connect_timeout_secs: Option<u64>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            connect_timeout_secs: Some(30),
        }
    }
}

/// Reverse geocoding (OpenStreetMap Nominatim) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct GeocodingConfig {
    enabled: bool,
    base_url: String,
    user_agent: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Position used when none is given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct LocationConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StorageBackend {
    #[default]
    Local,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StorageSection {
    backend: StorageBackend,
    /// Session directory; defaults to `<data_dir>/sessions`.
    path: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PathsConfig {
    data_dir: Option<String>,
}

async fn handle_chat(ctx: &RuntimeContext, cmd: ChatCommand) -> Result<()> {
    let store = ctx.session_store()?;
    let client = ctx.triage_client()?;

    let conversation = match cmd.session {
        Some(ref id) => Conversation::resume(store, id)
            .await
            .ok_or_else(|| anyhow!("session {id} not found"))?,
        None => {
            let location = resolve_location(ctx, &cmd).await?;
            Conversation::start(store, location)
        }
    };
    let mut conversation = conversation
        .with_search_radius(cmd.radius.unwrap_or(ctx.config.webhook.search_radius_km));

    info!(
        "chatting in session {} from {}",
        conversation.session_id(),
        conversation.location().location_string
    );

    if let Some(message) = cmd.message {
        run_turn(ctx, &mut conversation, &client, &message).await;
        return Ok(());
    }

    eprintln!(
        "Session {} ({}). Describe your symptoms; an empty line or Ctrl-D exits.",
        conversation.session_id(),
        conversation.location().location_string
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        let _ = io::stderr().flush();

        let Some(line) = lines.next_line().await.context("reading input")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            break;
        }
        run_turn(ctx, &mut conversation, &client, input).await;
    }

    Ok(())
}

async fn run_turn(
    ctx: &RuntimeContext,
    conversation: &mut Conversation,
    client: &TriageClient,
    input: &str,
) {
    let machine = ctx.common.json || ctx.common.yaml;
    let outcome = conversation
        .send(client, input, |chunk: &str| {
            if !machine {
                print!("{chunk}");
                let _ = io::stdout().flush();
            }
        })
        .await;

    match outcome {
        TurnOutcome::Completed => {}
        TurnOutcome::Truncated => warn!("the answer ended before the assistant finished"),
        TurnOutcome::Failed(ref error) => eprintln!("Error: {error}"),
    }

    if !machine {
        println!();
        return;
    }
    if let Some(reply) = conversation.messages().last() {
        let rendered = if ctx.common.json {
            serde_json::to_string_pretty(reply).ok()
        } else {
            serde_yaml::to_string(reply).ok()
        };
        if let Some(rendered) = rendered {
            println!("{rendered}");
        }
    }
}

async fn resolve_location(ctx: &RuntimeContext, cmd: &ChatCommand) -> Result<LocationFix> {
    let latitude = cmd.lat.or(ctx.config.location.latitude);
    let longitude = cmd.lon.or(ctx.config.location.longitude);

    let provider: Box<dyn PositionProvider> = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Box::new(FixedPosition(Position::new(lat, lon)?)),
        _ => Box::new(Unavailable(LocationError::Unsupported)),
    };

    let geocoder = if cmd.no_geocode {
        None
    } else {
        ctx.geocoder()?
    };
    let geocoder = geocoder.as_ref().map(|g| g as &dyn ReverseGeocoder);

    request_location(provider.as_ref(), geocoder, &PositionOptions::default())
        .await
        .map_err(|e| {
            anyhow!(
                "{e} (pass --lat and --lon, or set [location] in {})",
                ctx.paths.config_file.display()
            )
        })
}

async fn handle_sessions(ctx: &RuntimeContext, command: SessionsCommand) -> Result<()> {
    let store = ctx.session_store()?;

    match command {
        SessionsCommand::List => {
            let sessions = store.list().await;
            if print_machine(ctx, &sessions)? {
                return Ok(());
            }
            if sessions.is_empty() {
                println!("No saved sessions");
            }
            for session in &sessions {
                print_session_line(session);
            }
            Ok(())
        }
        SessionsCommand::Show { id } => {
            let session = load_session(&store, &id).await?;
            if print_machine(ctx, &session)? {
                return Ok(());
            }
            println!("Session {} ({})", session.session_id, session.location_data.location_string);
            for message in &session.messages {
                let label = if message.is_user { "You" } else { "Assistant" };
                if message.shows_content() {
                    println!("\n{label}: {}", message.content);
                }
                if let Some(ref advice) = message.advice {
                    println!("\n{}", advice.to_markdown());
                }
            }
            Ok(())
        }
        SessionsCommand::Delete { id } => {
            if !store.exists(&id).await {
                return Err(anyhow!("session {id} not found"));
            }
            if ctx.common.dry_run {
                info!("dry-run: would delete session {id}");
                return Ok(());
            }
            store.remove(&id).await;
            println!("Deleted session {id}");
            Ok(())
        }
        SessionsCommand::Export { id, output } => {
            let session = load_session(&store, &id).await?;
            let html = markdown::render_transcript(&session).await;
            match output {
                Some(path) if ctx.common.dry_run => {
                    info!("dry-run: would write transcript to {}", path.display());
                    Ok(())
                }
                Some(path) => fs::write(&path, html)
                    .with_context(|| format!("writing transcript to {}", path.display())),
                None => {
                    print!("{html}");
                    Ok(())
                }
            }
        }
    }
}

async fn load_session(store: &SessionStore, id: &str) -> Result<StoredSession> {
    store
        .load(id)
        .await
        .ok_or_else(|| anyhow!("session {id} not found"))
}

fn print_session_line(session: &StoredSession) {
    let updated = session
        .updated()
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default();
    let title: String = session
        .title()
        .unwrap_or("(empty)")
        .chars()
        .take(60)
        .collect();
    println!(
        "{}  {}  {:>3} msgs  {}",
        session.session_id,
        updated,
        session.messages.len(),
        title
    );
}

/// Print `value` as JSON or YAML when requested. Returns whether it did.
fn print_machine<T: Serialize>(ctx: &RuntimeContext, value: &T) -> Result<bool> {
    if ctx.common.json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("serializing output to JSON")?
        );
        Ok(true)
    } else if ctx.common.yaml {
        println!(
            "{}",
            serde_yaml::to_string(value).context("serializing output to YAML")?
        );
        Ok(true)
    } else {
        Ok(false)
    }
}

fn handle_init(ctx: &RuntimeContext, cmd: InitCommand) -> Result<()> {
    if ctx.paths.config_file.exists() && !(cmd.force || ctx.common.assume_yes) {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            ctx.paths.config_file.display()
        ));
    }

    if ctx.common.dry_run {
        info!(
            "dry-run: would write default config to {}",
            ctx.paths.config_file.display()
        );
        return Ok(());
    }

    write_default_config(&ctx.paths.config_file)
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if !print_machine(ctx, &ctx.config)? {
                println!("{:#?}", ctx.config);
            }
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.paths.config_file.display());
            Ok(())
        }
        ConfigCommand::Reset => {
            if ctx.common.dry_run {
                info!(
                    "dry-run: would reset config at {}",
                    ctx.paths.config_file.display()
                );
                return Ok(());
            }
            write_default_config(&ctx.paths.config_file)
        }
    }
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}

fn load_or_init_config(paths: &mut AppPaths, common: &CommonOpts) -> Result<AppConfig> {
    if !paths.config_file.exists() {
        if common.dry_run {
            info!(
                "dry-run: would create default config at {}",
                paths.config_file.display()
            );
        } else {
            write_default_config(&paths.config_file)?;
        }
    }

    let env_prefix = env_prefix();
    let built = Config::builder()
        .set_default("profile", "default")?
        .set_default("logging.level", "warn")?
        .set_default("webhook.endpoint", DEFAULT_ENDPOINT)?
        .set_default("webhook.search_radius_km", DEFAULT_SEARCH_RADIUS_KM as i64)?
        .add_source(
            File::from(paths.config_file.as_path())
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(env_prefix.as_str()).separator("__"))
        .build()?;

    let config: AppConfig = built.try_deserialize()?;
    Ok(config)
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {parent:?}"))?;
    }

    let config = AppConfig {
        profile: "default".to_string(),
        ..AppConfig::default()
    };
    let toml = toml::to_string_pretty(&config).context("serializing default config to TOML")?;
    let mut body = default_config_header(path);
    body.push_str(&toml);
    fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}

fn default_config_header(path: &Path) -> String {
    let mut buffer = String::new();
    buffer.push_str("# Configuration for ");
    buffer.push_str(APP_NAME);
    buffer.push('\n');
    buffer.push_str("# File: ");
    buffer.push_str(&path.display().to_string());
    buffer.push('\n');
    buffer.push_str("# Set [location] latitude/longitude to skip --lat/--lon on every chat.\n");
    buffer.push('\n');
    buffer
}

fn expand_path(path: PathBuf) -> Result<PathBuf> {
    if let Some(text) = path.to_str() {
        expand_str_path(text)
    } else {
        Ok(path)
    }
}

fn expand_str_path(text: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(text).context("expanding path")?;
    Ok(PathBuf::from(expanded.to_string()))
}

fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        let mut path = PathBuf::from(dir);
        path.push(APP_NAME);
        return Ok(path);
    }

    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

fn default_data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(mut dir) = dirs::data_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".local").join("share").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine data directory"))
}

fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
