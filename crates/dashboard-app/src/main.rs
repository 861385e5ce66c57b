use std::path::PathBuf;

use anyhow::{Context, Result};
use dashboard_app::{parse_page_snapshot, AppError, DashboardSession};
use dashboard_domain::{ComplaintId, RowPosition, StatusLabel};
use dashboard_mutation::MutationOutcome;

const DEFAULT_CLICK_TARGET: &str = "TD";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = parse_cli_flags()?;
    let config = dashboard_config::load_from_env()?;

    let raw = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("failed to read page snapshot '{}'", cli.page.display()))?;
    let snapshot = parse_page_snapshot(&raw)?;
    let mut session = DashboardSession::connect(config, snapshot)?;

    if let Some(query) = cli.filter.as_deref() {
        session.apply_filter(query);
    }
    if let Some(row_id) = cli.select.as_ref() {
        session.select_row_by_id(row_id)?;
    }
    if let Some(position) = cli.click {
        let target = cli.target.as_deref().unwrap_or(DEFAULT_CLICK_TARGET);
        session.click_row(position, target);
    }
    for (row_id, status) in cli.status_changes {
        if let MutationOutcome::Failed { error, .. } = session.change_status(&row_id, status).await {
            tracing::warn!(row_id = %row_id, error = %error, "status change did not apply");
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.report())?);
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliFlags {
    page: PathBuf,
    filter: Option<String>,
    select: Option<ComplaintId>,
    click: Option<RowPosition>,
    target: Option<String>,
    status_changes: Vec<(ComplaintId, StatusLabel)>,
}

fn parse_cli_flags() -> Result<CliFlags, AppError> {
    let mut page = None;
    let mut filter = None;
    let mut select = None;
    let mut click = None;
    let mut target = None;
    let mut status_changes = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" => page = Some(PathBuf::from(read_cli_value(&arg, args.next())?)),
            "--filter" => {
                filter = Some(args.next().ok_or_else(|| missing_value(&arg, "<query>"))?);
            }
            "--select" => select = Some(ComplaintId::new(read_cli_value(&arg, args.next())?)),
            "--click" => {
                let raw = read_cli_value(&arg, args.next())?;
                let position = raw.parse::<usize>().map_err(|_| {
                    AppError::Configuration(format!(
                        "Flag '--click' expects a row position, got '{raw}'."
                    ))
                })?;
                click = Some(RowPosition::new(position));
            }
            "--target" => target = Some(read_cli_value(&arg, args.next())?),
            "--set-status" => {
                let raw = read_cli_value(&arg, args.next())?;
                status_changes.push(parse_status_change(&raw)?);
            }
            "--help" | "-h" => {
                print_cli_help();
                std::process::exit(0);
            }
            value if value.starts_with("--") => {
                return Err(AppError::Configuration(format!(
                    "Unknown flag '{value}'. Run with --help for valid flags."
                )));
            }
            unknown => {
                return Err(AppError::Configuration(format!(
                    "Unexpected argument '{unknown}'. Run with --help for valid flags."
                )));
            }
        }
    }

    let page = page.ok_or_else(|| {
        AppError::Configuration(
            "Missing --page. Use --page <snapshot.json> to load a dashboard page.".to_owned(),
        )
    })?;

    Ok(CliFlags {
        page,
        filter,
        select,
        click,
        target,
        status_changes,
    })
}

fn print_cli_help() {
    println!("Usage: dashboard --page <snapshot.json> [--filter <query>] [--select <row-id>] [--click <position> [--target <tag>]] [--set-status <row-id>=<status>]...");
    println!();
    println!("  --page <path>                  Page snapshot with rows, markers and charts");
    println!("  --filter <query>               Show only rows containing the query");
    println!("  --select <row-id>              Center the map on the row's marker");
    println!("  --click <position>             Click a row by table position");
    println!("  --target <tag>                 Element the click originated from (default TD)");
    println!("  --set-status <row-id>=<status> Submit a status change; may be repeated");
    println!("  --help                         Show this help message");
}

fn missing_value(flag: &str, placeholder: &str) -> AppError {
    AppError::Configuration(format!(
        "Missing value after {flag}. Use {flag} {placeholder}."
    ))
}

fn read_cli_value(flag: &str, value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| missing_value(flag, "<value>"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Configuration(format!(
            "Flag '{flag}' requires a non-empty value."
        )));
    }
    Ok(value.to_owned())
}

fn parse_status_change(raw: &str) -> Result<(ComplaintId, StatusLabel), AppError> {
    let (row_id, status) = raw
        .split_once('=')
        .map(|(row_id, status)| (row_id.trim(), status.trim()))
        .filter(|(row_id, status)| !row_id.is_empty() && !status.is_empty())
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "Invalid --set-status '{raw}'. Use --set-status <row-id>=<status>."
            ))
        })?;
    Ok((ComplaintId::new(row_id), StatusLabel::new(status)))
}
