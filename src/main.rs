//! resp-client - A Blocking RESP Client
//!
//! Command-line front end: reads commands from stdin, one per line, sends
//! them to the server and prints the replies.

use anyhow::Context;
use resp_client::{decode, Connection, ConnectionConfig, Reply};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// How each input line is turned into a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    /// Split on whitespace and send as an array of bulk strings
    Args,
    /// Send the line verbatim
    Inline,
}

/// CLI configuration
struct Config {
    /// Host to connect to
    host: String,
    /// Port to connect to
    port: u16,
    /// Send timeout, `None` for no timeout
    timeout: Option<Duration>,
    /// Queue all lines and send them as one batch
    pipeline: bool,
    encoding: Encoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: resp_client::DEFAULT_HOST.to_string(),
            port: resp_client::DEFAULT_PORT,
            timeout: None,
            pipeline: false,
            encoding: Encoding::Args,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = value_of(&args, i, "--host").to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = value_of(&args, i, "--port").parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                }
                "--timeout" | "-t" => {
                    let millis: i64 = value_of(&args, i, "--timeout")
                        .parse()
                        .unwrap_or_else(|_| {
                            eprintln!("Error: invalid timeout");
                            std::process::exit(1);
                        });
                    // -1 and 0 both mean "no timeout"
                    config.timeout = u64::try_from(millis)
                        .ok()
                        .filter(|&ms| ms > 0)
                        .map(Duration::from_millis);
                    i += 2;
                }
                "--pipeline" => {
                    config.pipeline = true;
                    i += 1;
                }
                "--inline" => {
                    config.encoding = Encoding::Inline;
                    i += 1;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("resp-client version {}", resp_client::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.host.clone(), self.port).with_io_timeout(self.timeout)
    }
}

/// Returns the value following the flag at `i`, or exits.
fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires a value", flag);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"
resp-client - A Blocking RESP Client

USAGE:
    resp-client [OPTIONS] < commands.txt

OPTIONS:
    -h, --host <HOST>      Server host (default: 127.0.0.1)
    -p, --port <PORT>      Server port (default: 6379)
    -t, --timeout <MS>     Send timeout in milliseconds, -1 or 0 for none (default: none)
        --pipeline         Queue every line and send them in one batch at end of input
        --inline           Send lines verbatim instead of as binary-safe arrays
    -v, --version          Print version information
        --help             Print this help message

EXAMPLES:
    echo PING | resp-client
    printf 'SET a 1\nINCR a\nGET a\n' | resp-client --pipeline
    echo 'INFO server' | resp-client --inline -p 6380

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=debug) to see connection events on stderr.
"#
    );
}

/// A request built from one line of input
enum Request<'a> {
    Inline(&'a str),
    Args(&'a str, Vec<&'a str>),
}

impl<'a> Request<'a> {
    /// Returns `None` for blank lines.
    fn parse(line: &'a str, encoding: Encoding) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match encoding {
            Encoding::Inline => Some(Request::Inline(line)),
            Encoding::Args => {
                let mut parts = line.split_whitespace();
                let name = parts.next()?;
                Some(Request::Args(name, parts.collect()))
            }
        }
    }
}

fn print_reply(out: &mut impl Write, reply: &Reply<String>) -> io::Result<()> {
    writeln!(out, "{}", reply)
}

fn run_interactive(conn: &mut Connection, config: &Config) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let Some(request) = Request::parse(&line, config.encoding) else {
            continue;
        };

        let result = match request {
            Request::Inline(text) => conn.send_command_decoded(text, decode::utf8_lossy),
            Request::Args(name, args) => {
                conn.send_command_args_decoded(name, &args, decode::utf8_lossy)
            }
        };

        match result {
            Ok(reply) => print_reply(&mut out, &reply)?,
            // Not fatal: a dropped connection is reopened by the next line
            Err(e) => eprintln!("(error) {}", e),
        }
    }

    Ok(())
}

fn run_pipeline(conn: &mut Connection, config: &Config) -> anyhow::Result<()> {
    let lines: Vec<String> = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<_>>()
        .context("failed to read stdin")?;

    let mut pipeline = conn.pipeline_with(decode::utf8_lossy);
    for line in &lines {
        match Request::parse(line, config.encoding) {
            Some(Request::Inline(text)) => {
                pipeline.queue(text);
            }
            Some(Request::Args(name, args)) => {
                pipeline.queue_args(name, &args);
            }
            None => {}
        }
    }

    debug!(commands = pipeline.len(), "Sending pipeline");
    let replies = pipeline.execute().context("pipeline failed")?;

    let mut out = io::stdout().lock();
    for reply in &replies {
        print_reply(&mut out, reply)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging on stderr so replies on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut conn = Connection::open(config.connection_config())
        .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))?;
    info!(host = %config.host, port = config.port, "Ready");

    if config.pipeline {
        run_pipeline(&mut conn, &config)?;
    } else {
        run_interactive(&mut conn, &config)?;
    }

    conn.dispose();
    Ok(())
}
