use std::io::BufRead;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxmap_core::{OutputFormat, TranscriptMatch, VoxmapConfig};
use voxmap_index::{IndexStats, WalkOptions};
use voxmap_match::{find_in_transcript_with, MatchOptions, Session};

#[derive(Parser)]
#[command(
    name = "voxmap",
    version,
    about = "Resolve voice transcripts to code artifacts",
    long_about = "Voxmap keeps a live index of a repository's files, folders, components, and\n\
                   functions, and resolves spoken-style transcripts against it: multi-word\n\
                   phrases first, then scored single words, each rewritten in place to\n\
                   @artifact back-references.\n\n\
                   Examples:\n  \
                     voxmap resolve 'open the user profile' --path .   Resolve one transcript\n  \
                     voxmap index --path .                             Build the index, print stats\n  \
                     voxmap watch --path . < transcripts.txt           Resolve stdin lines live\n  \
                     voxmap init                                       Create a .voxmap.toml config"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .voxmap.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a transcript against the artifact index
    #[command(long_about = "Resolve a transcript against the artifact index.\n\n\
        Builds the index over the given tree, then runs the two-pass matcher:\n\
        multi-word phrases against component and file names first, then scored\n\
        single words against files, components, and functions.\n\n\
        Examples:\n  voxmap resolve 'open the user profile' --path .\n  voxmap resolve 'show me the Button component' --format json")]
    Resolve {
        /// Transcript text to resolve
        transcript: String,

        /// Tree to index (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Build the artifact index and print its statistics
    #[command(long_about = "Build the artifact index and print its statistics.\n\n\
        Enumerates tracked files, extracts component and function declarations\n\
        with tree-sitter, and reports entry counts for all four index maps.\n\n\
        Examples:\n  voxmap index --path .\n  voxmap index --path ../app --format json")]
    Index {
        /// Tree to index (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Watch a tree and resolve transcripts from stdin
    #[command(long_about = "Watch a tree and resolve transcripts from stdin.\n\n\
        Initializes a live session: the index follows file creations, changes,\n\
        deletions, and renames while each stdin line is resolved against the\n\
        current state. Exits on end of input.\n\n\
        Example:\n  voxmap watch --path . < transcripts.txt")]
    Watch {
        /// Tree to index and watch (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Create a default .voxmap.toml configuration file
    #[command(long_about = "Create a default .voxmap.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .voxmap.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        // Bold/bright header
        println!("\x1b[1m\x1b[33m⚡\x1b[0m \x1b[1mvoxmap\x1b[0m v{version} — say it, find it\n");

        println!("Quick start:");
        println!("  \x1b[36mvoxmap init\x1b[0m                   Create a .voxmap.toml config file");
        println!("  \x1b[36mvoxmap index --path .\x1b[0m         Build the artifact index");
        println!(
            "  \x1b[36mvoxmap resolve 'the button'\x1b[0m   Resolve a transcript against it\n"
        );

        println!("All commands:");
        println!("  \x1b[32mresolve\x1b[0m      Resolve a transcript against the index");
        println!("  \x1b[32mindex\x1b[0m        Build the index and print statistics");
        println!("  \x1b[32mwatch\x1b[0m        Live session resolving stdin lines under churn");
        println!("  \x1b[32minit\x1b[0m         Create default configuration\n");
    } else {
        println!("voxmap v{version} — say it, find it\n");

        println!("Quick start:");
        println!("  voxmap init                   Create a .voxmap.toml config file");
        println!("  voxmap index --path .         Build the artifact index");
        println!("  voxmap resolve 'the button'   Resolve a transcript against it\n");

        println!("All commands:");
        println!("  resolve      Resolve a transcript against the index");
        println!("  index        Build the index and print statistics");
        println!("  watch        Live session resolving stdin lines under churn");
        println!("  init         Create default configuration\n");
    }

    println!("Run 'voxmap <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "voxmap=debug,voxmap_core=debug,voxmap_index=debug,voxmap_match=debug"
    } else {
        "voxmap=info,voxmap_core=info,voxmap_index=info,voxmap_match=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_result(result: &TranscriptMatch, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(result).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            print!("{}", result.to_markdown());
        }
        OutputFormat::Text => {
            print!("{result}");
        }
    }
    Ok(())
}

fn print_stats(root: &std::path::Path, stats: &IndexStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "root": root.display().to_string(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Index Statistics\n");
            println!("- **Root:** `{}`", root.display());
            println!("- **File keys:** {}", stats.file_keys);
            println!("- **Folders:** {}", stats.folders);
            println!("- **Components:** {}", stats.components);
            println!("- **Functions:** {}", stats.functions);
        }
        OutputFormat::Text => {
            println!("Indexed {}", root.display());
            println!("  File keys:  {}", stats.file_keys);
            println!("  Folders:    {}", stats.folders);
            println!("  Components: {}", stats.components);
            println!("  Functions:  {}", stats.functions);
        }
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Voxmap Configuration
# See: https://github.com/voxmap/voxmap

[index]
# Glob patterns excluded from enumeration and watching.
# excludes = ["node_modules"]
# Respect .gitignore files during enumeration.
# use_gitignore = true

[match]
# Appended to the built-in stop-word set.
# extra_stop_words = ["umm", "uh"]
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => VoxmapConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".voxmap.toml");
            if default_path.exists() {
                VoxmapConfig::from_file(default_path)?
            } else {
                VoxmapConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        if !config.matching.extra_stop_words.is_empty() {
            eprintln!(
                "Extra stop words: {}",
                config.matching.extra_stop_words.join(", "),
            );
        }
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Resolve {
            ref transcript,
            ref path,
        }) => {
            let index = voxmap_index::build_index(path, WalkOptions::from(&config.index))?;
            let result =
                find_in_transcript_with(&index, transcript, &MatchOptions::from(&config.matching));
            print_result(&result, cli.format)?;
        }
        Some(Command::Index { ref path }) => {
            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .unwrap(),
                );
                pb.set_message(format!("Indexing {} ...", path.display()));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let index = voxmap_index::build_index(path, WalkOptions::from(&config.index))
                .inspect_err(|_e| {
                    if let Some(pb) = &spinner {
                        pb.finish_with_message("Failed");
                    }
                })?;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            print_stats(index.root(), &index.stats(), cli.format)?;
        }
        Some(Command::Watch { ref path }) => {
            let mut session = Session::new(&config);
            let stats = session.initialize(path)?;
            eprintln!(
                "Watching {} ({} file keys, {} components, {} functions)",
                session
                    .root()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                stats.file_keys,
                stats.components,
                stats.functions,
            );
            eprintln!("Reading transcripts from stdin; end input to exit.");

            for line in std::io::stdin().lock().lines() {
                let line = line.into_diagnostic().wrap_err("reading stdin")?;
                let transcript = line.trim();
                if transcript.is_empty() {
                    continue;
                }
                let result = session.find_in_transcript(transcript)?;
                match cli.format {
                    OutputFormat::Json => {
                        // One JSON object per input line.
                        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
                    }
                    OutputFormat::Markdown => {
                        print!("{}", result.to_markdown());
                    }
                    OutputFormat::Text => {
                        print!("{result}");
                    }
                }
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".voxmap.toml");
            if path.exists() {
                miette::bail!(miette::miette!(
                    help = "Remove the existing file or edit it in place",
                    ".voxmap.toml already exists"
                ));
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .voxmap.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "voxmap", &mut std::io::stdout());
        }
    }

    Ok(())
}
