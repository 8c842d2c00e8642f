use std::fs::File;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logsearch::browse::{
    format_size, is_absolute_remote_path, is_directory, join_remote_path, parent_path,
    render_search_result, sort_for_display, tail_for_display, DirectoryCache, DISPLAY_LIMIT,
};
use logsearch::config::{self, ConfigStorage, DEFAULT_LOG_PATH};
use logsearch::{ConnectConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "logsearch", version, about = "Browse and search remote log files over SSH")]
struct Cli {
    /// Saved profile from ~/.logsearch/config.json
    #[arg(long, short = 'P')]
    profile: Option<String>,

    #[arg(long, short = 'H')]
    host: Option<String>,

    #[arg(long, short)]
    port: Option<u16>,

    #[arg(long, short)]
    user: Option<String>,

    #[arg(long, env = "LOGSEARCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Private key file
    #[arg(long, short)]
    key: Option<String>,

    /// Connect timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory (directories first)
    Ls { path: Option<String> },

    /// Print a file, gunzipping .gz archives
    Cat {
        path: String,
        /// Show only the last N bytes
        #[arg(long, default_value_t = DISPLAY_LIMIT)]
        max_bytes: usize,
    },

    /// List a directory or print a file, whichever PATH turns out to be
    Open {
        path: String,
        #[arg(long, default_value_t = DISPLAY_LIMIT)]
        max_bytes: usize,
    },

    /// Show a directory tree
    Tree {
        path: Option<String>,
        #[arg(long, default_value_t = 2)]
        depth: usize,
    },

    /// Search .log and .log.gz files for a regular expression
    Search {
        /// Root to search under (repeatable); defaults to the log path
        #[arg(long = "path", short = 'd')]
        paths: Vec<String>,
        pattern: String,
    },
}

impl Command {
    /// Remote paths named on the command line
    fn remote_paths(&self) -> Vec<&str> {
        match self {
            Command::Ls { path } | Command::Tree { path, .. } => {
                path.iter().map(String::as_str).collect()
            }
            Command::Cat { path, .. } | Command::Open { path, .. } => vec![path.as_str()],
            Command::Search { paths, .. } => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// Remote paths are resolved without a working directory, so they must be absolute
fn check_remote_paths(command: &Command) -> Result<()> {
    if let Some(path) = command
        .remote_paths()
        .into_iter()
        .find(|p| !is_absolute_remote_path(p))
    {
        bail!("Remote path must be absolute: {}", path);
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "logsearch_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file),
        )
        .init();
    Ok(())
}

/// Merge the selected profile with command-line overrides
fn resolve_target(cli: &Cli) -> Result<(ConnectConfig, String)> {
    let storage = ConfigStorage::new()?;
    let saved = storage.load()?;

    let profile = match (&cli.profile, saved.profile(cli.profile.as_deref())) {
        (Some(name), None) => bail!("No profile named {:?} in {}", name, storage.path().display()),
        (_, profile) => profile,
    };

    let mut connect = profile
        .map(|p| p.to_connect_config())
        .unwrap_or_default();
    let log_path = profile
        .map(|p| p.log_path.clone())
        .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());

    if let Some(host) = &cli.host {
        connect.host = host.clone();
    }
    if let Some(port) = cli.port {
        connect.port = port;
    }
    if let Some(user) = &cli.user {
        connect.username = user.clone();
    }
    if let Some(key) = &cli.key {
        connect.key_path = Some(key.clone());
    }
    if let Some(timeout) = cli.timeout {
        connect.timeout_secs = timeout;
    }
    connect.password = cli.password.clone();

    if connect.host.is_empty() || connect.username.is_empty() {
        bail!("A host and user are required (use --host/--user or a profile)");
    }

    Ok((connect, log_path))
}

fn print_listing(session: &Session, path: &str) -> Result<()> {
    let mut entries = session.list_dir(path)?;
    sort_for_display(&mut entries);
    for entry in entries {
        if entry.is_dir {
            println!("{:>10}  {}/", "", entry.name);
        } else {
            println!("{:>10}  {}", format_size(entry.size), entry.name);
        }
    }
    Ok(())
}

fn print_tree(
    session: &Session,
    cache: &mut DirectoryCache,
    path: &str,
    depth: usize,
    indent: usize,
) -> Result<()> {
    let mut entries = cache.list_with(path, |p| session.list_dir(p))?.to_vec();
    sort_for_display(&mut entries);
    for entry in entries {
        let marker = if entry.is_dir { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(indent), entry.name, marker);
        if entry.is_dir && depth > 1 {
            let child = join_remote_path(path, &entry.name);
            if let Err(e) = print_tree(session, cache, &child, depth - 1, indent + 1) {
                println!("{}  [error: {}]", "  ".repeat(indent), e);
            }
        }
    }
    Ok(())
}

fn print_file(session: &Session, path: &str, max_bytes: usize) -> Result<()> {
    let content = session.read_file(path)?;
    println!("{}", tail_for_display(&content, max_bytes));
    Ok(())
}

fn execute(session: &Session, command: Command, log_path: String) -> Result<()> {
    match command {
        Command::Ls { path } => print_listing(session, path.as_deref().unwrap_or(&log_path)),
        Command::Cat { path, max_bytes } => print_file(session, &path, max_bytes),
        Command::Open { path, max_bytes } => {
            let mut cache = DirectoryCache::new();
            if let Some(parent) = parent_path(&path) {
                // Seed the parent listing so the check resolves without a probe
                if let Err(e) = cache.list_with(&parent, |p| session.list_dir(p)) {
                    warn!("Could not list parent {}: {}", parent, e);
                }
            }
            let check = is_directory(&cache, &log_path, &path, |p| session.list_dir(p));
            info!("{} is_dir={} ({:?})", path, check.is_dir, check.resolved_by);
            if check.is_dir {
                print_listing(session, &path)
            } else {
                print_file(session, &path, max_bytes)
            }
        }
        Command::Tree { path, depth } => {
            let root = path.unwrap_or(log_path);
            println!("{}", root);
            let mut cache = DirectoryCache::new();
            print_tree(session, &mut cache, &root, depth.max(1), 1)
        }
        Command::Search { paths, pattern } => {
            let paths = if paths.is_empty() { vec![log_path] } else { paths };
            let result = session.search(paths, &pattern)?;
            println!("{}", render_search_result(&result));
            Ok(())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    check_remote_paths(&cli.command)?;
    let (connect, log_path) = resolve_target(&cli)?;

    let session = Session::open(connect.clone()).map_err(|e| {
        error!("Connection failed: {}", e);
        e
    })?;
    info!("Connected to {} as {}", connect.address(), connect.username);

    let result = execute(&session, cli.command, log_path);
    session.close();
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Warning: file logging disabled: {:#}", e);
    }

    info!("Application started");
    let result = run(cli);
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    info!("Application stopped");
    result
}
