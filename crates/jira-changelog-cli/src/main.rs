//! jira-changelog: CLI tool to add Jira issues to a Keep a Changelog file

mod config;

use anyhow::{Context, Result};
use clap::builder::{PossibleValue, PossibleValuesParser, TypedValueParser};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use config::{CONFIG_FILE_NAME, Config};
use jira_changelog_core::{
    DocumentNode, Issue, IssueId, Section, Summary, add_issue, adf_to_markdown, browse_url,
    parse_document,
};

#[derive(Parser, Debug)]
#[command(name = "jira-changelog")]
#[command(about = "Add Jira issues to a Keep a Changelog file")]
#[command(version)]
#[command(after_help = "Examples:
  jira-changelog add --section Fixed --id ABC-123 --summary \"Fix login\"
  jira-changelog add --section Added --id ABC-7 --summary-adf description.json
  jira-changelog render description.json      # Print an ADF document as Markdown
  jira-changelog init                         # Create _jira-changelog.toml")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: _jira-changelog.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an issue entry under ## [Unreleased]
    Add {
        /// Changelog section (case-insensitive)
        #[arg(short, long, ignore_case = true, value_parser = section_parser())]
        section: Section,

        /// Issue key, e.g. ABC-123
        #[arg(long)]
        id: IssueId,

        /// Issue summary as plain text
        #[arg(long, required_unless_present = "summary_adf")]
        summary: Option<String>,

        /// Issue summary as an ADF JSON file ("-" for stdin)
        #[arg(long, value_name = "FILE", conflicts_with = "summary")]
        summary_adf: Option<PathBuf>,

        /// Issue URL (default: <jira.base_url>/browse/<ID>)
        #[arg(long)]
        url: Option<String>,

        /// Changelog file (default: changelog.path from config, or CHANGELOG.md)
        #[arg(long)]
        changelog: Option<PathBuf>,

        /// Print the updated changelog instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Render an ADF JSON document as Markdown
    Render {
        /// ADF JSON file ("-" for stdin)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a configuration file
    Init {
        /// Output path (default: _jira-changelog.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON schema of the configuration file instead
        #[arg(long)]
        schema: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Add {
            section,
            id,
            summary,
            summary_adf,
            url,
            changelog,
            dry_run,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let summary = match (summary, summary_adf) {
                (Some(text), _) => Summary::plain(&text)?,
                (None, Some(path)) => Summary::from_adf(&read_adf(&path)?)?,
                (None, None) => anyhow::bail!("Either --summary or --summary-adf is required"),
            };
            let url = match url {
                Some(url) => url,
                None => issue_url(&config, &id)?,
            };
            let path = changelog.unwrap_or_else(|| config.changelog_path());

            add_command(&Issue::new(id, url, summary), section, &path, dry_run)
        }
        Command::Render { input, output } => render_command(&input, output.as_deref()),
        Command::Init {
            output,
            schema,
            force,
        } => init_command(output.as_deref(), schema, force),
    }
}

/// Section names, each listed with its description in `--help`
fn section_parser() -> impl TypedValueParser<Value = Section> {
    PossibleValuesParser::new(
        Section::ALL.map(|section| PossibleValue::new(section.as_str()).help(section.description())),
    )
    .try_map(|name| name.parse::<Section>())
}

/// Log to stderr; `RUST_LOG` takes precedence over the flags
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Load the config given with `--config`, or `_jira-changelog.toml` from the
/// current directory when it exists
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::debug!("Using config: {}", path.display());
        return Config::load(path);
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    match Config::load_from_dir(&cwd)? {
        Some(config) => {
            log::debug!("Using config: {}", cwd.join(CONFIG_FILE_NAME).display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn issue_url(config: &Config, id: &IssueId) -> Result<String> {
    let base_url = config.jira.base_url.as_deref().with_context(|| {
        format!("No issue URL: pass --url or set jira.base_url in {CONFIG_FILE_NAME}")
    })?;
    Ok(browse_url(base_url, id)?)
}

/// Read an ADF JSON document from a file, or from stdin for `-`
fn read_adf(path: &Path) -> Result<Vec<DocumentNode>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?
    };

    parse_document(&content).with_context(|| format!("Invalid ADF document: {}", path.display()))
}

fn add_command(issue: &Issue, section: Section, path: &Path, dry_run: bool) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("Changelog not found: {}", path.display());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let applied = add_issue(&content, issue, section);

    if dry_run {
        print!("{}", applied.text);
        return Ok(());
    }

    if !applied.inserted {
        log::info!("{} is already in {}", issue.id, path.display());
        return Ok(());
    }

    write_atomic(path, &applied.text)?;
    log::info!("Added {} to {} in {}", issue.id, section, path.display());

    Ok(())
}

/// Replace `path` with `content` through a temporary file in the same
/// directory, so readers never see a partial write
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write: {}", file.path().display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    file.persist(path)
        .with_context(|| format!("Failed to write: {}", path.display()))?;

    Ok(())
}

fn render_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let nodes = read_adf(input)?;
    let markdown = adf_to_markdown(&nodes);

    match output {
        Some(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            log::info!("{}", path.display());
        }
        None => print!("{markdown}"),
    }

    Ok(())
}

fn init_command(output: Option<&Path>, schema: bool, force: bool) -> Result<()> {
    let content = if schema {
        Config::json_schema_string()?
    } else {
        format!(
            "# jira-changelog configuration\n\n{}",
            Config::sample().to_toml()?
        )
    };

    let path = match (output, schema) {
        (Some(path), _) => path,
        (None, true) => {
            println!("{content}");
            return Ok(());
        }
        (None, false) => Path::new(CONFIG_FILE_NAME),
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(path, &content).with_context(|| format!("Failed to write: {}", path.display()))?;
    log::info!("Created {}", path.display());

    Ok(())
}
