//! Entry point for the sysdash TUI. Parses args and runs the App.

use anyhow::Context;
use std::env;
use std::io::{self, Write};

use sysdash::alerts::AlertConfig;
use sysdash::app::{App, AppSettings, DEFAULT_INTERVAL_SECS};
use sysdash::client::{validate_interval, MetricsClient};
use sysdash::history::TimeRange;
use sysdash::logging::{init_file_logging, init_stderr_logging};
use sysdash::profiles::{
    config_dir, load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};
use sysdash::ui::Dashboard;

const USAGE_ARGS: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--interval SECS|-i SECS] [--range HOURS|-r HOURS] [--once] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    interval_secs: Option<u64>,
    range_hours: Option<u32>,
    save: bool,
    once: bool,
    dry_run: bool,
}

fn parse_number<T: std::str::FromStr>(
    prog: &str,
    flag: &str,
    v: Option<String>,
) -> Result<T, String> {
    v.as_deref()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| format!("{flag} expects a number. Usage: {prog} {USAGE_ARGS}"))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "sysdash".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        // Accept --flag=value for every flag that takes a value
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |inline: Option<String>| inline.or_else(|| it.next());
        match flag.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE_ARGS}")),
            "--tls-ca" | "-t" => {
                parsed.tls_ca = value(inline).filter(|v| !v.is_empty());
            }
            "--profile" | "-P" => {
                parsed.profile = value(inline).filter(|v| !v.is_empty());
            }
            "--interval" | "-i" => {
                parsed.interval_secs = Some(parse_number(&prog, &flag, value(inline))?);
            }
            "--range" | "-r" => {
                parsed.range_hours = Some(parse_number(&prog, &flag, value(inline))?);
            }
            "--save" => parsed.save = true,
            "--once" => parsed.once = true,
            "--dry-run" => parsed.dry_run = true,
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE_ARGS}"));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
        interval_secs: parsed.interval_secs,
    };
    let resolved = req.resolve(&profiles_file);

    // Determine final connection parameters (and maybe mutated profiles to persist)
    let mut profiles_mut = profiles_file.clone();
    let entry: ProfileEntry = match resolved {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry.clone());
                        let _ = save_profiles(&profiles_mut);
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry.clone());
                            let _ = save_profiles(&profiles_mut);
                        }
                    }
                    Some(_) => {}
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(());
            };
            let Some(mut entry) = profiles_mut.profiles.get(name).cloned() else {
                return Ok(());
            };
            if parsed.interval_secs.is_some() {
                entry.interval_secs = parsed.interval_secs;
            }
            entry
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or https://...): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                tls_ca: Some(ca.trim().to_string()).filter(|c| !c.is_empty()),
                interval_secs: parsed.interval_secs,
            };
            profiles_mut.profiles.insert(name, entry.clone());
            let _ = save_profiles(&profiles_mut);
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(());
        }
    };

    if parsed.dry_run {
        println!("{}", entry.url);
        return Ok(());
    }

    let client = MetricsClient::with_tls_ca(&entry.url, entry.tls_ca.as_deref())
        .with_context(|| format!("cannot use API at {}", entry.url))?;

    if parsed.once {
        init_stderr_logging();
        let snapshot = client.fetch_latest().await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let interval_secs = entry.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS);
    validate_interval(interval_secs)?;
    let settings = AppSettings {
        interval_secs,
        range: parsed.range_hours.map(TimeRange::hours).unwrap_or_default(),
    };

    let _log_guard = init_file_logging(&config_dir())
        .with_context(|| format!("cannot open log file in {}", config_dir().display()))?;
    tracing::info!(url = %client.base_url(), interval_secs, "starting dashboard");

    let alerts = AlertConfig::load_or_default();
    let mut app = App::new(client, Dashboard::new(), alerts, settings);
    app.run().await
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
