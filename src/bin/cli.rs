//! mcrcon CLI
//!
//! Sends one command to an RCON server and prints the reply.
//!
//! Settings come from `MCRCON_HOST`, `MCRCON_PORT`, `MCRCON_PASS` and
//! `MCRCON_VERBOSE=yes`; flags override them.

use std::io::{self, Write};

use clap::Parser;
use mcrcon::config::Overrides;
use mcrcon::{client, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// mcrcon CLI
#[derive(Parser, Debug)]
#[command(name = "mcrcon")]
#[command(about = "Send a console command to a server over RCON")]
#[command(version = mcrcon::VERSION)]
struct Args {
    /// Server host
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Server RCON port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// RCON password
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Print the resolved settings before connecting
    #[arg(long)]
    verbose: bool,

    /// Read/write timeout in milliseconds (0 waits forever)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Command to run, words are joined with single spaces
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Overrides {
            host: args.host,
            port: args.port,
            password: args.password,
            verbose: args.verbose,
            timeout_ms: args.timeout_ms,
            command: args.command,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mcrcon=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = resolve_config(args, |key| std::env::var(key).ok())
        .and_then(|config| run(&config, &mut io::stdout().lock()));

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Defaults, then environment, then flags
fn resolve_config<F>(args: Args, lookup: F) -> mcrcon::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    Config::builder()
        .apply_env_with(lookup)
        .apply_overrides(args.into())
        .try_build()
}

/// Echo the settings if asked, run the command, print its reply
fn run<W: Write>(config: &Config, out: &mut W) -> mcrcon::Result<()> {
    if config.verbose {
        writeln!(out, "{}", config)?;
    }

    let output = client::run(config)?;
    write_output(out, &output.render())?;
    Ok(())
}

/// Print the reply as sent, adding a final newline only if it lacks one
fn write_output<W: Write>(out: &mut W, rendered: &str) -> io::Result<()> {
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
