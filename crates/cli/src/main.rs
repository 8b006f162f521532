// ABOUTME: CLI for folio: prints a post's heading outline, inserts the contents widget, or places a sidebar.
// ABOUTME: Reads pages from a file, stdin or a URL and writes HTML or JSON to stdout or a file.

mod config;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_outline::{ContentsPlugin, Outcome};
use folio_sidebar::{apply_sidebar, PageInfo, SidebarClient, SidebarOutcome};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Build contents lists and place sidebars in rendered blog pages.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Contents lists and sidebars for blog pages", long_about = None)]
struct Cli {
    /// Config file (defaults to ./folio.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (otherwise FOLIO_LOG, default warn).
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the heading outline of a post as JSON.
    Outline {
        /// Page file, URL, or "-" for stdin.
        target: String,

        #[command(flatten)]
        selectors: SelectorArgs,

        /// Output compact JSON instead of pretty.
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Insert the contents widget into a post.
    Contents {
        /// Page file, URL, or "-" for stdin.
        target: String,

        #[command(flatten)]
        selectors: SelectorArgs,

        /// Hide the title.
        #[arg(long)]
        no_title: bool,

        /// Title text.
        #[arg(long)]
        title: Option<String>,

        /// Disable the button collapsing the whole list.
        #[arg(long)]
        no_main_dropdown: bool,

        /// Disable the per-heading toggles.
        #[arg(long)]
        no_individual_dropdowns: bool,

        /// Start with the list collapsed.
        #[arg(long)]
        closed: bool,

        /// Print a JSON report instead of the page.
        #[arg(long)]
        json: bool,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Move the page's sidebar from the site's sidebars page into it.
    Sidebar {
        /// Page file, URL, or "-" for stdin.
        target: String,

        /// Public URL of the page; defaults to the target when it is a URL.
        #[arg(long)]
        url: Option<String>,

        /// Sidebars page to use instead of fetching it from the site (file or URL).
        #[arg(long)]
        sidebars: Option<String>,

        /// Fail instead of printing the page unchanged when no sidebar can be placed.
        #[arg(long)]
        strict: bool,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct SelectorArgs {
    /// Selector of the post body.
    #[arg(long)]
    content_selector: Option<String>,

    /// Selector of the blocks whose headings are listed ("" for anywhere).
    #[arg(long)]
    heading_scope: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("folio_cli=debug,folio_outline=debug,folio_sidebar=debug")
    } else {
        EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Outline {
            target,
            selectors,
            compact,
        } => {
            let plugin = contents_plugin(&config, &selectors, |b| b)?;
            let html = load_text(&target).await?;
            let outline = plugin
                .outline(&html)
                .ok_or_else(|| anyhow!("{}: no content region found", target))?;
            let text = if compact {
                serde_json::to_string(&outline)?
            } else {
                serde_json::to_string_pretty(&outline)?
            };
            write_output(None, &text)
        }
        Command::Contents {
            target,
            selectors,
            no_title,
            title,
            no_main_dropdown,
            no_individual_dropdowns,
            closed,
            json,
            output,
        } => {
            let plugin = contents_plugin(&config, &selectors, |mut b| {
                if no_title {
                    b = b.title_enabled(false);
                }
                if let Some(text) = title {
                    b = b.title_text(text);
                }
                if no_main_dropdown {
                    b = b.main_dropdown_enabled(false);
                }
                if no_individual_dropdowns {
                    b = b.individual_dropdowns_enabled(false);
                }
                if closed {
                    b = b.open_by_default(false);
                }
                b
            })?;
            let html = load_text(&target).await?;
            let outcome = plugin.apply(&html);

            if json {
                let report = match &outcome {
                    Outcome::Inserted(report) => json!({
                        "outcome": outcome.kind(),
                        "created_block": report.created_block,
                        "options": report.options,
                        "outline": report.outline,
                        "html": report.html,
                    }),
                    _ => json!({ "outcome": outcome.kind() }),
                };
                return write_output(output, &serde_json::to_string_pretty(&report)?);
            }

            match outcome {
                Outcome::Inserted(report) => write_output(output, &report.html),
                other => {
                    tracing::warn!(page = %target, outcome = other.kind(), "contents list not inserted");
                    write_output(output, &html)
                }
            }
        }
        Command::Sidebar {
            target,
            url,
            sidebars,
            strict,
            output,
        } => {
            let page_url = match url {
                Some(u) => u,
                None if is_url(&target) => target.clone(),
                None => bail!("--url is required when the page is not read from a URL"),
            };
            let html = load_text(&target).await?;

            let placed = match sidebars {
                Some(source) => {
                    let sidebars_html = load_text(&source).await?;
                    let page = PageInfo::from_url(&page_url)?;
                    match apply_sidebar(&html, &page, &sidebars_html) {
                        Ok(placed) => SidebarOutcome::Placed(placed),
                        Err(error) => SidebarOutcome::Unchanged {
                            html: html.clone(),
                            error,
                        },
                    }
                }
                None => {
                    let client = SidebarClient::builder().config(&config.sidebar).build()?;
                    client.place(&html, &page_url).await
                }
            };

            match placed {
                SidebarOutcome::Unchanged { error, .. } if strict => Err(error.into()),
                SidebarOutcome::Unchanged { html, error } => {
                    tracing::warn!(%error, "page left without sidebar");
                    write_output(output, &html)
                }
                SidebarOutcome::Placed(html) => write_output(output, &html),
            }
        }
    }
}

/// Plugin from config, then selector flags, then option flags applied by `flags`.
fn contents_plugin<F>(config: &Config, selectors: &SelectorArgs, flags: F) -> Result<ContentsPlugin>
where
    F: FnOnce(folio_outline::ContentsPluginBuilder) -> folio_outline::ContentsPluginBuilder,
{
    let mut builder = ContentsPlugin::builder().overrides(config.contents.overrides.clone());
    if let Some(css) = selectors
        .content_selector
        .as_ref()
        .or(config.contents.content_selector.as_ref())
    {
        builder = builder.content_selector(css.clone());
    }
    if let Some(css) = selectors
        .heading_scope
        .as_ref()
        .or(config.contents.heading_scope.as_ref())
    {
        builder = builder.heading_scope(css.clone());
    }
    Ok(flags(builder).build()?)
}

fn is_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

async fn load_text(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    if is_url(target) {
        let client = reqwest::Client::builder()
            .user_agent(folio_sidebar::options::DEFAULT_USER_AGENT)
            .build()?;
        let fetched =
            folio_sidebar::resource::fetch(&client, target, &Default::default()).await?;
        return Ok(fetched.text());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    fs::read_to_string(&path).with_context(|| format!("failed to read {}", target))
}

fn write_output(path: Option<PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(p) => fs::write(&p, text).with_context(|| format!("failed to write {}", p.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
