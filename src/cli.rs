use crate::client::GitHubClient;
use crate::config::Config;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use reqwest::StatusCode;
use std::io::Write;

pub fn build_cli() -> Command {
    Command::new("github-fetch")
        .about("Fetch complete, paginated collections from the GitHub REST API")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .subcommand(
            Command::new("rate-limit")
                .about("Print the current rate limit status")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Query the status endpoint even if the snapshot is fresh")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("fetch")
                .about("Fetch every page starting at a URL or API path")
                .arg(Arg::new("url").required(true))
                .arg(
                    Arg::new("no-flatten")
                        .long("no-flatten")
                        .help("Keep one array per page instead of one flat array")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("expect")
                        .long("expect")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(u16))
                        .help("Accepted status codes (default: 200)"),
                ),
        )
        .subcommand(
            Command::new("repos")
                .about("Collect all repositories of an organization")
                .arg(Arg::new("org").required(true)),
        )
        .subcommand(
            Command::new("members")
                .about("Collect all members of an organization")
                .arg(Arg::new("org").required(true)),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, else RUST_LOG, else info.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Execute the selected subcommand and print its JSON result to stdout.
pub async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let cfg = Config::from_env().map_err(anyhow::Error::msg)?;
    let mut client = GitHubClient::from_config(cfg)?;

    let output = match matches.subcommand() {
        Some(("rate-limit", sub)) => {
            serde_json::to_value(client.rate_limit_status(sub.get_flag("force"), false).await?)?
        }
        Some(("fetch", sub)) => {
            let target = sub.get_one::<String>("url").map(String::as_str).unwrap_or_default();
            let url = if target.starts_with('/') {
                client.url(target)
            } else {
                target.to_string()
            };
            let expected = match sub.get_many::<u16>("expect") {
                Some(codes) => codes
                    .map(|c| StatusCode::from_u16(*c))
                    .collect::<Result<Vec<_>, _>>()?,
                None => vec![StatusCode::OK],
            };
            let flatten = !sub.get_flag("no-flatten");
            serde_json::to_value(client.fetch_all_pages(&url, flatten, &expected).await?)?
        }
        Some(("repos", sub)) => {
            let org = sub.get_one::<String>("org").map(String::as_str).unwrap_or_default();
            serde_json::to_value(client.collect_org_repos(org).await?)?
        }
        Some(("members", sub)) => {
            let org = sub.get_one::<String>("org").map(String::as_str).unwrap_or_default();
            serde_json::to_value(client.collect_org_members(org).await?)?
        }
        other => anyhow::bail!("unknown command: {:?}", other.map(|(name, _)| name)),
    };

    let mut out = std::io::stdout();
    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    out.flush()?;
    Ok(())
}
