//! CLI definition and command dispatch for stacksift.
//!
//! ## Configuration Precedence
//!
//! 1. CLI flags (e.g., `--config`, `--catalog`, `--token`)
//! 2. Environment variables (`STACKSIFT_CONFIG`, `STACKSIFT_VERBOSE`,
//!    `STACKSIFT_CATALOG`, `GITHUB_TOKEN`)
//! 3. Config file (`~/.stacksift/config.yaml` or path from `--config`)
//! 4. Built-in defaults

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use crate::ui::table::{self, SyncRow};
use crate::ui::{ColorMode, MessageType, Style};

use stacksift_core::{
    fetch_language_breakdown, AliasIndex, CatalogCache, Credential, DetectOptions,
    DetectionResult, Detector, FileCatalog, RepoRef, StackError, StacksiftConfig, TokenScheme,
};
use stacksift_github::GitHubClient;

// ============================================================================
// CLI Definition
// ============================================================================

/// Detect the developer tools a repository uses from its dependency manifests
#[derive(Parser, Debug)]
#[command(name = "stacksift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "STACKSIFT_VERBOSE")]
    pub verbose: bool,

    /// Path to configuration file (default: ~/.stacksift/config.yaml)
    #[arg(long, global = true, env = "STACKSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output mode: always, never, or auto
    #[arg(long, global = true, env = "STACKSIFT_COLOR", default_value = "auto")]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// Hosting API credential flags.
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Hosting API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Authorization scheme: 'bearer' or 'token' (legacy personal access tokens)
    #[arg(long, default_value = "bearer")]
    pub token_scheme: TokenScheme,
}

impl AuthArgs {
    fn credential(&self) -> Result<Credential, StackError> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Credential::new(token, self.token_scheme)),
            _ => Err(StackError::InvalidConfiguration {
                message: "No hosting API token provided".to_string(),
                hint: "Set GITHUB_TOKEN or pass --token".to_string(),
            }),
        }
    }
}

/// Tool catalog location flag.
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Tool catalog file, JSON or YAML (overrides catalog.path in config)
    #[arg(long, env = "STACKSIFT_CATALOG")]
    pub catalog: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the tools one repository depends on
    #[command(after_help = r#"EXAMPLES:
    # Detect tools for a repository
    stacksift detect acme/web --catalog tools.json

    # Legacy personal access token
    stacksift detect acme/web --token-scheme token

    # JSON for scripting
    stacksift detect acme/web --json | jq '.toolIds'
"#)]
    Detect {
        /// Repository as OWNER/REPO
        repo: String,

        #[command(flatten)]
        catalog: CatalogArgs,

        #[command(flatten)]
        auth: AuthArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Detect tools for many repositories in batches
    #[command(after_help = r#"EXAMPLES:
    # Several repositories
    stacksift sync acme/web acme/api acme/infra

    # From a file (one OWNER/REPO per line, '#' comments allowed)
    stacksift sync --repos-file repos.txt --json
"#)]
    Sync {
        /// Repositories as OWNER/REPO
        repos: Vec<String>,

        /// File with one OWNER/REPO per line
        #[arg(long)]
        repos_file: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,

        #[command(flatten)]
        auth: AuthArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the top languages of a repository by source bytes
    #[command(after_help = r#"EXAMPLES:
    stacksift languages acme/web
    stacksift languages acme/web --json
"#)]
    Languages {
        /// Repository as OWNER/REPO
        repo: String,

        #[command(flatten)]
        auth: AuthArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Inspect the tool catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

/// Catalog subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Load the catalog, build the alias index and report alias collisions
    #[command(after_help = r#"EXAMPLES:
    stacksift catalog check --catalog tools.yaml
    stacksift catalog check --json
"#)]
    Check {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one tool and the package aliases that resolve to it
    #[command(after_help = r#"EXAMPLES:
    stacksift catalog show react
    stacksift catalog show "Spring Boot" --json
"#)]
    Show {
        /// Tool slug or display name (case-insensitive)
        tool: String,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Entry point
// ============================================================================

/// Run the CLI.
///
/// Returns `ExitCode::SUCCESS` on success, or `ExitCode::FAILURE` on error.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always; debug only with --verbose. RUST_LOG wins when set.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stacksift_core={0},stacksift_github={0},stacksift={0}",
            log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let style = Style::new(cli.color);

    let config = match &cli.config {
        Some(path) => StacksiftConfig::from_path(path),
        None => StacksiftConfig::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your config at ~/.stacksift/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context("Failed to load configuration", Some(&e.to_string()), Some(&hint))
            );
            return ExitCode::FAILURE;
        }
    };

    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!(
                "{}",
                style.message(MessageType::Err, &format!("Failed to start async runtime: {}", e))
            );
            return ExitCode::FAILURE;
        }
    };

    let ctx = AppContext {
        style: &style,
        config: &config,
        runtime: &runtime,
    };

    let result = match cli.command {
        Command::Detect {
            repo,
            catalog,
            auth,
            json,
        } => handle_detect(&ctx, &repo, catalog, auth, json),
        Command::Sync {
            repos,
            repos_file,
            catalog,
            auth,
            json,
        } => handle_sync(&ctx, repos, repos_file, catalog, auth, json),
        Command::Languages { repo, auth, json } => handle_languages(&ctx, &repo, auth, json),
        Command::Catalog { action } => match action {
            CatalogAction::Check { catalog, json } => handle_catalog_check(&ctx, catalog, json),
            CatalogAction::Show {
                tool,
                catalog,
                json,
            } => handle_catalog_show(&ctx, &tool, catalog, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&style, &e));
            ExitCode::FAILURE
        }
    }
}

/// Shared state for command handlers.
struct AppContext<'a> {
    style: &'a Style,
    config: &'a StacksiftConfig,
    runtime: &'a Runtime,
}

impl AppContext<'_> {
    fn catalog_path(&self, args: &CatalogArgs) -> Result<PathBuf, StackError> {
        let path = args
            .catalog
            .clone()
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| StackError::InvalidConfiguration {
                message: "No tool catalog configured".to_string(),
                hint: "Pass --catalog PATH or set catalog.path in the config file".to_string(),
            })?;
        tracing::debug!(path = %path.display(), "Using tool catalog");
        Ok(path)
    }

    fn client(&self) -> anyhow::Result<GitHubClient> {
        GitHubClient::from_config(&self.config.github).context("Failed to create hosting API client")
    }

    fn detector(&self, catalog: &CatalogArgs, options: DetectOptions) -> anyhow::Result<Detector> {
        let source = FileCatalog::new(self.catalog_path(catalog)?);
        let cache = CatalogCache::new(Arc::new(source));
        Ok(Detector::new(Arc::new(self.client()?), Arc::new(cache), options))
    }
}

/// Turn a command error into user-facing text.
///
/// A rejected credential, a rate limit and a configuration problem each get
/// their own hint; anything else is reported as-is.
fn render_error(style: &Style, err: &anyhow::Error) -> String {
    match err.downcast_ref::<StackError>() {
        Some(e @ StackError::CredentialAuth { .. }) => style.error_with_context(
            "The hosting API rejected the credential",
            Some(&e.to_string()),
            Some("Re-authenticate: refresh the token and pass it via --token or GITHUB_TOKEN"),
        ),
        Some(e @ StackError::RateLimited { .. }) => style.error_with_context(
            "The hosting API rate limit is exhausted",
            Some(&e.to_string()),
            Some("Wait for the limit to reset, then run the command again"),
        ),
        Some(StackError::InvalidConfiguration { message, hint }) => {
            style.error_with_context(message, None, Some(hint.as_str()))
        }
        Some(e @ StackError::CatalogUnavailable(_)) => style.error_with_context(
            "Tool catalog unavailable",
            Some(&e.to_string()),
            Some("Run `stacksift catalog check` to validate the catalog file"),
        ),
        _ => style.message(MessageType::Err, &format!("{:#}", err)),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_detect(
    ctx: &AppContext<'_>,
    repo: &str,
    catalog: CatalogArgs,
    auth: AuthArgs,
    json: bool,
) -> anyhow::Result<()> {
    let repo: RepoRef = repo.parse()?;
    let credential = auth.credential()?;
    let detector = ctx.detector(
        &catalog,
        DetectOptions::interactive(&ctx.config.detection),
    )?;

    let (result, index) = ctx.runtime.block_on(async {
        let index = detector.catalog().index().await?;
        let result = detector
            .detect_with_index(&index, &repo, &credential)
            .await?;
        Ok::<_, StackError>((result, index))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let style = ctx.style;
    let repo_label = style.repo(&result.repo.to_string());
    if result.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("{}: no known tools detected", repo_label)
            )
        );
    } else {
        println!(
            "{}",
            style.message(
                MessageType::Ok,
                &format!("{}: {} tool(s) detected", repo_label, result.tool_ids.len())
            )
        );
        for id in &result.tool_ids {
            let name = index.display_name(id).unwrap_or(id.as_str());
            println!(
                "{}",
                style.list_item("+", &format!("{} ({})", name, style.tool_id(id.as_str())))
            );
        }
    }
    println!(
        "{}",
        style.message_detail("Manifests", &manifest_summary(&result))
    );

    Ok(())
}

fn handle_sync(
    ctx: &AppContext<'_>,
    repos: Vec<String>,
    repos_file: Option<PathBuf>,
    catalog: CatalogArgs,
    auth: AuthArgs,
    json: bool,
) -> anyhow::Result<()> {
    let repos = collect_repos(repos, repos_file.as_ref())?;
    if repos.is_empty() {
        return Err(StackError::InvalidConfiguration {
            message: "No repositories given".to_string(),
            hint: "Pass OWNER/REPO arguments or --repos-file PATH".to_string(),
        }
        .into());
    }

    let credential = auth.credential()?;
    let detector = ctx.detector(&catalog, DetectOptions::bulk(&ctx.config.detection))?;

    let (report, index) = ctx.runtime.block_on(async {
        let index = detector.catalog().index().await?;
        let report = detector.detect_many(&repos, &credential).await?;
        Ok::<_, StackError>((report, index))
    })?;

    let all_failed = report.succeeded() == 0;

    if json {
        let entries: Vec<_> = report
            .entries
            .iter()
            .map(|(repo, outcome)| match outcome {
                Ok(result) => json!({
                    "repo": repo.to_string(),
                    "ok": true,
                    "toolIds": result.tool_ids,
                    "manifests": result.manifests,
                }),
                Err(e) => json!({
                    "repo": repo.to_string(),
                    "ok": false,
                    "error": e.to_string(),
                    "credentialError": e.is_credential_error(),
                }),
            })
            .collect();
        let doc = json!({
            "generatedAt": report.generated_at.to_rfc3339(),
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "repos": entries,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let style = ctx.style;
        let rows: Vec<SyncRow> = report
            .entries
            .iter()
            .map(|(repo, outcome)| match outcome {
                Ok(result) => SyncRow {
                    repo: repo.to_string(),
                    ok: true,
                    tools: result.tool_ids.len(),
                    detail: tool_names(&index, result),
                },
                Err(e) => SyncRow {
                    repo: repo.to_string(),
                    ok: false,
                    tools: 0,
                    detail: e.to_string(),
                },
            })
            .collect();

        println!("{}", table::render_sync_table(&rows));
        println!();

        let tally = format!(
            "{} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        let msg_type = match (report.failed(), all_failed) {
            (0, _) => MessageType::Ok,
            (_, false) => MessageType::Warn,
            (_, true) => MessageType::Err,
        };
        println!("{}", style.message(msg_type, &tally));

        if report
            .entries
            .values()
            .any(|r| matches!(r, Err(e) if e.is_credential_error()))
        {
            println!(
                "{}",
                style.message(
                    MessageType::Hint,
                    "Some repositories rejected the credential; re-authenticate and sync again"
                )
            );
        }
    }

    if all_failed {
        anyhow::bail!("Detection failed for all {} repositories", report.len());
    }
    Ok(())
}

fn handle_languages(ctx: &AppContext<'_>, repo: &str, auth: AuthArgs, json: bool) -> anyhow::Result<()> {
    let repo: RepoRef = repo.parse()?;
    let credential = auth.credential()?;
    let client = ctx.client()?;

    let breakdown = ctx
        .runtime
        .block_on(fetch_language_breakdown(&client, &repo, &credential))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    let style = ctx.style;
    if breakdown.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("{}: no language statistics", style.repo(&repo.to_string()))
            )
        );
    } else {
        println!("{}", style.section(&repo.to_string()));
        println!("{}", table::render_languages_table(&breakdown));
    }
    Ok(())
}

fn handle_catalog_check(ctx: &AppContext<'_>, catalog: CatalogArgs, json: bool) -> anyhow::Result<()> {
    let path = ctx.catalog_path(&catalog)?;
    let cache = CatalogCache::new(Arc::new(FileCatalog::new(&path)));
    let index = ctx.runtime.block_on(cache.index())?;

    if json {
        let doc = json!({
            "path": path.display().to_string(),
            "tools": index.tool_count(),
            "aliases": index.alias_count(),
            "conflicts": index.conflicts(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let style = ctx.style;
    println!(
        "{}",
        style.message(
            MessageType::Info,
            &format!("Loaded catalog {}", path.display())
        )
    );
    println!("{}", style.message_detail("Tools", &index.tool_count().to_string()));
    println!(
        "{}",
        style.message_detail("Package aliases", &index.alias_count().to_string())
    );
    println!();

    let conflicts = index.conflicts();
    if conflicts.is_empty() {
        println!("{}", style.message(MessageType::Ok, "No alias conflicts"));
    } else {
        println!(
            "{}",
            style.message(
                MessageType::Warn,
                &format!(
                    "{} alias conflict(s); the first registered tool keeps each alias",
                    conflicts.len()
                )
            )
        );
        println!("{}", table::render_conflicts_table(conflicts));
    }

    Ok(())
}

fn handle_catalog_show(
    ctx: &AppContext<'_>,
    query: &str,
    catalog: CatalogArgs,
    json: bool,
) -> anyhow::Result<()> {
    let path = ctx.catalog_path(&catalog)?;
    let cache = CatalogCache::new(Arc::new(FileCatalog::new(&path)));
    let index = ctx.runtime.block_on(cache.index())?;

    let Some(id) = index.find_tool(query) else {
        anyhow::bail!("No tool with slug or name `{}` in {}", query, path.display());
    };
    let name = index.display_name(id).unwrap_or(id.as_str());
    let aliases = index.aliases_of(id);

    if json {
        let doc = json!({
            "id": id,
            "name": name,
            "packageAliases": aliases,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let style = ctx.style;
    println!("{}", style.section(name));
    println!("{}", style.message_detail("Id", id.as_str()));
    if aliases.is_empty() {
        println!("{}", style.message_detail("Package aliases", "none"));
    } else {
        println!("{}", style.message_detail("Package aliases", &aliases.join(", ")));
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Merge positional repositories with those from `--repos-file`, keeping
/// first-seen order and dropping duplicates.
fn collect_repos(args: Vec<String>, file: Option<&PathBuf>) -> anyhow::Result<Vec<RepoRef>> {
    let mut raw = args;
    if let Some(path) = file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read repository list {}", path.display()))?;
        raw.extend(
            content
                .lines()
                .map(|line| line.split('#').next().unwrap_or("").trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    let mut seen = BTreeSet::new();
    let mut repos = Vec::with_capacity(raw.len());
    for entry in raw {
        let repo: RepoRef = entry.parse()?;
        if seen.insert(repo.clone()) {
            repos.push(repo);
        }
    }
    Ok(repos)
}

fn tool_names(index: &AliasIndex, result: &DetectionResult) -> String {
    let mut names: Vec<&str> = result
        .tool_ids
        .iter()
        .map(|id| index.display_name(id).unwrap_or(id.as_str()))
        .collect();
    names.sort_unstable();
    names.join(", ")
}

fn manifest_summary(result: &DetectionResult) -> String {
    if result.manifests.is_empty() {
        "none found".to_string()
    } else {
        result.manifests.join(", ")
    }
}
