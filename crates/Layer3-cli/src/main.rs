//! loadit CLI - Main entry point

mod commands;

use clap::{Parser, Subcommand};
use commands::LoaderOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// loadit - discover and load plugins from package directories
#[derive(Parser, Debug)]
#[command(name = "loadit")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the module paths discovered under the package roots
    Paths {
        #[command(flatten)]
        options: LoaderOptions,
    },
    /// Load every discovered module and print the matching plugins
    Load {
        #[command(flatten)]
        options: LoaderOptions,

        /// Only report strict subclasses of this class (module.Attr)
        #[arg(long, value_name = "CLASS")]
        ancestor: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.debug);

    let working_dir = std::env::current_dir()?;

    match &args.command {
        Command::Paths { options } => commands::run_paths(options, &working_dir, args.json),
        Command::Load { options, ancestor } => {
            commands::run_load(options, ancestor.as_deref(), &working_dir, args.json)
        }
    }
}

/// 로깅 초기화 (`RUST_LOG` 우선)
fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_command() {
        let args = Args::try_parse_from([
            "loadit",
            "load",
            "plugins",
            "vendor/plugins",
            "--ancestor",
            "plugins.base.Plugin",
            "--search-path",
            "lib",
            "--exclude",
            "plugins.old",
            "--strict",
            "--json",
        ])
        .unwrap();

        assert!(args.json);
        match args.command {
            Command::Load { options, ancestor } => {
                assert_eq!(options.roots, vec!["plugins", "vendor/plugins"]);
                assert_eq!(ancestor.as_deref(), Some("plugins.base.Plugin"));
                assert_eq!(options.search_paths, vec![std::path::PathBuf::from("lib")]);
                assert_eq!(options.excluded, vec!["plugins.old"]);
                assert!(options.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_path_help_mentions_working_directory() {
        use clap::CommandFactory;

        let command = Args::command();
        let load = command.find_subcommand("load").unwrap();
        let search_path = load
            .get_arguments()
            .find(|arg| arg.get_id() == "search_paths")
            .unwrap();

        let help = search_path.get_help().unwrap().to_string();
        assert!(help.contains("working directory"), "help: {}", help);
    }

    #[test]
    fn test_parse_paths_command() {
        let args = Args::try_parse_from(["loadit", "--debug", "paths", "--file-pattern", "^http"]).unwrap();

        assert!(args.debug);
        match args.command {
            Command::Paths { options } => {
                assert!(options.roots.is_empty());
                assert_eq!(options.file_pattern.as_deref(), Some("^http"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
