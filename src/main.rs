use clap::{Parser, Subcommand};
use photo_dump::generate::{self, PhotoDump};
use photo_dump::photo::Photo;
use photo_dump::site::Site;
use photo_dump::{config, output};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "photo-dump")]
#[command(about = "Publish a directory of dated photos as site pages")]
#[command(long_about = "\
Publish a directory of dated photos as site pages

Every image in the photos directory named like a blog post becomes a page
of its own, with a date, a slug, and a permalink. The image is copied
byte-for-byte to its permalink under the destination.

Site structure:

  .
  ├── config.toml                          # Optional, see 'gen-config'
  ├── _layouts/
  │   ├── photo.html                       # Wraps each photo page
  │   └── index.html                       # Listing (built-in if missing)
  └── _photos/
      ├── 2011-06-01-bay-to-breakers.jpg   # → /photos/2011-06-01-bay-to-breakers.jpg
      └── 2011-06-01-bay-to-breakers.toml  # Optional front matter

Names that do not follow YYYY-MM-DD-slug.ext are skipped with a warning.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory (overrides `destination` in config.toml)
    #[arg(long, global = true)]
    destination: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish every photo and the listing page
    Build,
    /// List photos and report invalid names without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            let mut site = Site::new(&cli.source, config)?;
            if let Some(dest) = cli.destination {
                site = site.with_destination(dest);
            }
            println!("==> Building {} → {}", cli.source.display(), site.dest.display());
            let report = site.process(&[&PhotoDump])?;
            output::print_build_output(&site, &report);
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            let dir = cli.source.join(&config.photos.dir);
            println!("==> Checking {}", dir.display());
            let photos = generate::discover(&dir, &config)?
                .iter()
                .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                .map(|name| Photo::new(&cli.source, &config.photos.dir, &name, &config.photos))
                .collect::<Result<Vec<_>, _>>()?;
            output::print_check_output(&photos);

            let invalid = photos.iter().filter(|p| p.url().is_err()).count();
            if invalid > 0 {
                return Err(format!("{invalid} photo name(s) are invalid").into());
            }
            println!("==> Photos are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = log_level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photo_dump={level}")));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_shows_warnings() {
        assert_eq!(log_level(0, false), "warn");
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(log_level(1, false), "info");
        assert_eq!(log_level(2, false), "debug");
        assert_eq!(log_level(9, false), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(log_level(3, true), "error");
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["photo-dump", "build", "--source", "site", "-vv"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("site"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Build));
    }
}
