// logsnap - main.rs
//
// CLI entry point. Handles:
// 1. CLI argument parsing (exactly one filter key, enforced by clap)
// 2. Config loading and logging initialisation
// 3. Building the retriever over the system log store
// 4. Printing the snapshot, newest first

use clap::{ArgGroup, Parser};
use logsnap::core::collector::SystemLogCollector;
use logsnap::core::model::RetrieveOptions;
use logsnap::platform::syslog::SyslogStore;
use logsnap::{platform, util};

use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

/// logsnap - retrieve an application's console log entries, newest first.
///
/// Queries the system log for entries attributed to a bundle identifier
/// or sender name and prints them sorted by descending recency. No
/// matching entries prints nothing and exits successfully.
#[derive(Parser, Debug)]
#[command(name = "logsnap", version, about)]
#[command(group(ArgGroup::new("key").required(true).args(["bundle_id", "sender"])))]
struct Cli {
    /// Bundle identifier to retrieve logs for (e.g. com.example.myapp).
    #[arg(short = 'b', long = "bundle-id")]
    bundle_id: Option<String>,

    /// Sender name to retrieve logs for (the process or tag name).
    #[arg(short = 's', long = "sender")]
    sender: Option<String>,

    /// Maximum number of entries to print (newest win).
    #[arg(short = 'n', long = "limit", value_parser = parse_limit)]
    limit: Option<usize>,

    /// Only entries at or after this instant. Accepts an RFC 3339
    /// timestamp or a relative offset such as 30s, 10m, 2h, 1d.
    #[arg(long = "since")]
    since: Option<String>,

    /// Log file to query instead of the configured locations (repeatable).
    #[arg(long = "log-file")]
    log_files: Vec<PathBuf>,

    /// Emit full records as JSON instead of plain message lines.
    #[arg(long = "json")]
    json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging init so the [logging] level applies;
    // anything config loading itself traces before init is dropped.
    let config_dir = platform::config::config_dir();
    let (config, config_warnings) = platform::config::load_config(&config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::debug!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "logsnap starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let since = match cli.since.as_deref() {
        Some(raw) => match parse_since(raw, Utc::now()) {
            Ok(instant) => Some(instant),
            Err(e) => {
                eprintln!("Error: invalid --since value '{raw}': {e}");
                std::process::exit(2);
            }
        },
        None => None,
    };

    let options = RetrieveOptions {
        since,
        max_entries: cli.limit.unwrap_or(config.max_snapshot_entries),
    };

    // CLI override > config > platform defaults.
    let paths = if cli.log_files.is_empty() {
        config.log_paths.clone()
    } else {
        cli.log_files.clone()
    };
    let store = SyslogStore::with_paths(paths);

    let collector = if let Some(id) = cli.bundle_id {
        SystemLogCollector::by_bundle_identifier(id, store)
    } else if let Some(name) = cli.sender {
        SystemLogCollector::by_sender_name(name, store)
    } else {
        // clap's required arg group guarantees exactly one key is present.
        unreachable!("a filter key is mandatory");
    };

    if cli.json {
        let records = collector.retrieve_records(&options);
        match serde_json::to_string_pretty(&records) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialise records: {e}");
                std::process::exit(1);
            }
        }
    } else {
        for line in collector.retrieve_logs_with(&options) {
            println!("{line}");
        }
    }
}

/// Parse a --limit value, holding it to the same range the config layer
/// enforces for max_snapshot_entries.
fn parse_limit(raw: &str) -> Result<usize, String> {
    let n: usize = raw
        .parse()
        .map_err(|_| "expected a positive number".to_string())?;
    if (util::constants::MIN_MAX_SNAPSHOT_ENTRIES..=util::constants::ABSOLUTE_MAX_SNAPSHOT_ENTRIES)
        .contains(&n)
    {
        Ok(n)
    } else {
        Err(format!(
            "must be between {} and {}",
            util::constants::MIN_MAX_SNAPSHOT_ENTRIES,
            util::constants::ABSOLUTE_MAX_SNAPSHOT_ENTRIES
        ))
    }
}

/// Parse a --since value: an RFC 3339 instant, or a relative offset from
/// `now` written as `<n><unit>` with unit s, m, h, or d.
fn parse_since(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.into());
    }

    // Byte split below is only safe on ASCII input.
    if raw.is_empty() || !raw.is_ascii() {
        return Err("expected an RFC 3339 timestamp or <n>s/<n>m/<n>h/<n>d".to_string());
    }
    let (digits, unit) = raw.split_at(raw.len() - 1);
    let n: i64 = digits
        .parse()
        .map_err(|_| "expected an RFC 3339 timestamp or <n>s/<n>m/<n>h/<n>d".to_string())?;
    if n < 0 {
        return Err("offset must be non-negative".to_string());
    }
    let offset = match unit {
        "s" => Duration::seconds(n),
        "m" => Duration::minutes(n),
        "h" => Duration::hours(n),
        "d" => Duration::days(n),
        other => return Err(format!("unknown unit '{other}' (expected s, m, h, or d)")),
    };
    Ok(now - offset)
}
