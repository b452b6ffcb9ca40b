use std::{fs, process};

use clap::Parser;
use quip::{Config, run_script};
use tracing_subscriber::EnvFilter;

/// quip runs small scripts: maps, lists, strings, functions and a handful of
/// natives for regular expressions and shell commands.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the contents as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// Print the value the script returns.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Stop with an error when the script fails at runtime instead of
    /// reporting the failure and carrying on.
    #[arg(short, long)]
    debug: bool,

    /// Log interpreter activity (scopes, calls) to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|e| {
                                              eprintln!("Failed to read the script '{}': {e}",
                                                        &args.contents);
                                              process::exit(1);
                                          })
    } else {
        args.contents
    };

    let config = Config::default().with_debug(args.debug);

    match run_script(&script, &config) {
        Ok(value) => {
            if args.pipe_mode {
                println!("{value}");
            }
        },
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    }
}
