use std::ffi::CString;

use anyhow::Context;
use clap::{Parser, Subcommand};
use greetings::{GreetError, GreetingsLibrary};
use log::LevelFilter;
use rustgreetings::{GreetingConfig, GreetingRequest, GreetingService};

/// Shown instead of a greeting when the core rejects the input.
const FALLBACK_TEXT: &str = "Hello!";

/// CLI for the rustgreetings core
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the rustgreetings shared library; without it the linked core is called directly
    #[arg(long)]
    lib: Option<String>,

    /// More logging (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Greet somebody
    Hello {
        /// Name to greet
        #[arg(default_value = "")]
        name: String,
        /// Raw name bytes as hex, overrides NAME
        #[arg(long)]
        hex: Option<String>,
        /// Maximum name length in characters (in-process only)
        #[arg(long, default_value_t = rustgreetings::config::DEFAULT_MAX_NAME_CHARS)]
        max_chars: usize,
        /// Use the NUL-terminated entry point
        #[arg(long)]
        cstr: bool,
    },
    /// Show the ABI version of the library
    Version,
}

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => {
            log::error!("Exiting with code={code}");
            std::process::exit(code);
        }
        Err(e) => {
            log::error!("ERROR: {e:?}");
            std::process::exit(1)
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_timed_builder()
        .format_timestamp_millis()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Version => {
            let lib = cli.lib.as_deref().unwrap_or_default();
            if lib.is_empty() {
                println!("rustgreetings ABI version is {} (linked)", rustgreetings::ffi::ABI_VERSION);
                return Ok(0);
            }
            let lib = GreetingsLibrary::open(lib).with_context(|| format!("cannot open '{lib}'"))?;
            println!("rustgreetings ABI version is {}", lib.abi_version());
            Ok(0)
        }
        Commands::Hello { name, hex, max_chars, cstr } => {
            let name = match hex {
                Some(hex) => decode_hex(&hex)?,
                None => name.into_bytes(),
            };
            match cli.lib {
                Some(lib) => hello_library(&lib, &name, cstr),
                None => Ok(hello_linked(&name, max_chars)),
            }
        }
    }
}

fn hello_library(lib: &str, name: &[u8], cstr: bool) -> anyhow::Result<i32> {
    let lib = GreetingsLibrary::open(lib).with_context(|| format!("cannot open '{lib}'"))?;
    if cstr {
        let name = CString::new(name)?;
        let code = match lib.greet(&name) {
            Some(greeting) => {
                println!("{greeting}");
                0
            }
            None => fallback("rejected"),
        };
        return Ok(code);
    }
    // the greeting borrows `lib`, so it must be gone before `lib` is
    let code = match lib.say_hello(name) {
        Ok(greeting) => {
            println!("{}", greeting.to_str()?);
            0
        }
        Err(GreetError::Rejected(status)) => fallback(&lib.status_message(status as u32)),
        Err(e) => return Err(e.into()),
    };
    Ok(code)
}

fn hello_linked(name: &[u8], max_chars: usize) -> i32 {
    let service = GreetingService::new(GreetingConfig::default().with_max_name_chars(max_chars));
    match service.say_hello(GreetingRequest::new(name)) {
        Ok(greeting) => {
            println!("{}", greeting.as_str());
            0
        }
        Err(e) => fallback(&e.to_string()),
    }
}

fn fallback(reason: &str) -> i32 {
    log::warn!("greeting failed: {reason}");
    println!("{FALLBACK_TEXT}");
    2
}

fn decode_hex(hex: &str) -> anyhow::Result<Vec<u8>> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        anyhow::bail!("expected an even number of hex digits");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("bad hex at {i}")))
        .collect()
}
