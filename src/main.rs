use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use sitewright::config::{self, BuildOptions, IndexOptions};
use sitewright::index::IndexMode;
use sitewright::{output, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Static site builder for front-matter pages and Liquid layouts")]
#[command(long_about = "\
Static site builder for front-matter pages and Liquid layouts

Site structure:

  src/
  ├── pages/                        # Every page becomes <name>/index.html
  │   ├── 2024-01-01-hello.md       # Markdown
  │   ├── about.liquid              # Liquid template ({{ site.title }}, {{ page.title }})
  │   └── notes/
  │       └── index.html            # Plain HTML → notes/index.html
  └── layouts/
      ├── default.liquid            # Used unless a page sets `layout:`
      └── template.liquid           # Home page layout

Pages start with optional YAML front matter:

  ---
  title: Hi
  date: 2024-01-01
  abstract: A greeting
  tags: [intro]
  ---

Run 'sitewright gen-config' to print a documented options file.")]
#[command(version)]
struct Cli {
    /// Options file
    #[arg(long, default_value = "sitewright.toml", global = true)]
    config: PathBuf,

    /// Site source directory (overrides the options file)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory (overrides the options file)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log every page as it is built
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site, write the history index and home page
    Build {
        /// Copy the finished output into this directory
        #[arg(long)]
        publish: Option<PathBuf>,
        /// Home page mode
        #[arg(long, value_enum)]
        index_mode: Option<IndexModeArg>,
    },
    /// Read every page and check its layout exists, without writing anything
    Check,
    /// Print a stock options file with all settings documented
    GenConfig,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum IndexModeArg {
    Placeholder,
    Summary,
}

impl From<IndexModeArg> for IndexMode {
    fn from(arg: IndexModeArg) -> Self {
        match arg {
            IndexModeArg::Placeholder => IndexMode::Placeholder,
            IndexModeArg::Summary => IndexMode::Summary,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let flags = BuildOptions {
        source: cli.source.clone(),
        output: cli.output.clone(),
        ..Default::default()
    };

    match cli.command {
        Command::Build {
            publish,
            index_mode,
        } => {
            let overrides = BuildOptions {
                publish,
                index: IndexOptions {
                    mode: index_mode.map(IndexMode::from),
                    ..Default::default()
                },
                ..flags
            };
            let build_config = config::load_options(&cli.config)?
                .overlay(overrides)
                .resolve();
            let report = site::build(&build_config)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let build_config = config::load_options(&cli.config)?.overlay(flags).resolve();
            println!("==> Checking {}", build_config.source.display());
            let report = site::check(&build_config)?;
            output::print_check_output(&report, &build_config.index.layout);
            if !report.is_ok() {
                return Err("missing layouts".into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
}
