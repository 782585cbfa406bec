mod config;
mod replay;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use scribe_editor_core::{
    FormatRegistry, SelectionRange, comment, insert_format, plain, toc, try_insert_format,
};
use scribe_export::{Platform, export_bundle, export_for_platform, export_html, social_token};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(version, about = "Scribe - markdown transforms, history replay and export", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file [default: <config dir>/scribe/scribe.toml]
    #[arg(long, global = true, env = "SCRIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove private comments
    Strip {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },
    /// List private comments, one per line
    Comments { input: Option<PathBuf> },
    /// Project markdown to plain text
    Plain { input: Option<PathBuf> },
    /// Replace {{TOC}} with a table of contents
    Toc {
        input: Option<PathBuf>,

        /// Treat the input as rendered HTML instead of markdown
        #[arg(long)]
        html: bool,
    },
    /// Export markdown for a publishing platform
    Export {
        input: Option<PathBuf>,

        /// Target platform (github or devto) [default: from config]
        #[arg(long)]
        platform: Option<Platform>,

        /// Write a bundle (document plus image plan) into this directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Featured image URL, bundled first
        #[arg(long)]
        featured: Option<String>,
    },
    /// Apply a toolbar token to a selection and print the result as JSON
    Insert {
        input: Option<PathBuf>,

        #[arg(long)]
        token: String,

        /// Selection start, in UTF-16 code units
        #[arg(long)]
        start: usize,

        /// Selection end [default: start]
        #[arg(long)]
        end: Option<usize>,

        /// Reject out-of-range selections instead of clamping them
        #[arg(long)]
        strict: bool,
    },
    /// List the built-in toolbar tokens
    Tokens,
    /// Build the token that inserts a linked social icon
    Social {
        /// x, email, discord, youtube, website, dev, linkedin or instagram
        platform: String,
        /// Handle, address or URL
        profile: String,
    },
    /// Wrap an HTML fragment in a standalone page, filling {{TOC}}
    Html { input: Option<PathBuf> },
    /// Replay a JSON-lines event log against a document and print the state
    Replay {
        /// Event log
        events: PathBuf,

        /// Initial markdown (empty if omitted)
        #[arg(long)]
        initial: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Strip { input } => {
            print!("{}", comment::strip(&read_input(input.as_deref())?));
        }
        Commands::Comments { input } => {
            for body in comment::extract(&read_input(input.as_deref())?) {
                println!("{body}");
            }
        }
        Commands::Plain { input } => {
            println!("{}", plain::to_plain_text(&read_input(input.as_deref())?));
        }
        Commands::Toc { input, html } => {
            let text = read_input(input.as_deref())?;
            let output = if html {
                toc::process_toc_in_html(&text)
            } else {
                toc::export_markdown_with_toc(&text)
            };
            print!("{output}");
        }
        Commands::Export {
            input,
            platform,
            out,
            featured,
        } => {
            let markdown = read_input(input.as_deref())?;
            let platform = platform.unwrap_or(config.export.platform);
            match out {
                Some(dir) => write_bundle(&markdown, platform, featured.as_deref(), &dir, &config)?,
                None => print!("{}", export_for_platform(&markdown, platform)),
            }
        }
        Commands::Insert {
            input,
            token,
            start,
            end,
            strict,
        } => {
            let buffer = read_input(input.as_deref())?;
            let selection = SelectionRange::new(start, end.unwrap_or(start));
            let insertion = if strict {
                try_insert_format(&buffer, selection, &token)?
            } else {
                insert_format(&buffer, selection, &token)
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&insertion).into_diagnostic()?
            );
        }
        Commands::Tokens => {
            for token in FormatRegistry::builtin().tokens() {
                println!("{token}");
            }
        }
        Commands::Social { platform, profile } => {
            println!("{}", social_token(&platform, &profile)?);
        }
        Commands::Html { input } => {
            println!("{}", export_html(&read_input(input.as_deref())?));
        }
        Commands::Replay { events, initial } => {
            let log = std::fs::read_to_string(&events).into_diagnostic()?;
            let events = replay::parse_log(&log)?;
            let initial = match initial {
                Some(path) => std::fs::read_to_string(path).into_diagnostic()?,
                None => String::new(),
            };
            let outcome = replay::replay(&initial, &events, config.history);
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).into_diagnostic()?
            );
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
            Ok(buf)
        }
    }
}

fn write_bundle(
    markdown: &str,
    platform: Platform,
    featured: Option<&str>,
    dir: &Path,
    config: &Config,
) -> Result<()> {
    let bundle = export_bundle(markdown, featured, platform, &config.export.image_folder);

    std::fs::create_dir_all(dir).into_diagnostic()?;
    let document = dir.join(&bundle.document.path);
    std::fs::write(&document, &bundle.document.contents).into_diagnostic()?;
    println!("✓ Wrote {}", document.display());

    if bundle.images.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir.join(&bundle.image_folder)).into_diagnostic()?;
    println!("→ Images to fetch:");
    for (image, path) in bundle.image_paths() {
        println!("  {} -> {}", image.url, dir.join(path).display());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
