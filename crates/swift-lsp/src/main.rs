//! Swift Language Server binary
//!
//! Speaks LSP over stdio to any LSP-compatible editor and forwards
//! semantic queries to a loaded analyzer service.
//!
//! Usage:
//!   swift-lsp \[options\]
//!
//! Options:
//!   --stdio      Use stdio for communication (default)
//!   --log        Enable verbose logging to stderr
//!   --health     Quick health check
//!   --version    Show version information
//!   --help       Show this help message

use std::env;
use std::process;

use swift_lsp::ServerConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config = ServerConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--stdio" => {}
            "--log" => config.verbose = true,
            "--health" => {
                println!("ok {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--version" => {
                println!("swift-lsp {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if config.verbose {
        eprintln!("Swift Language Server starting...");
    }

    // The server core is transport- and service-generic; a platform
    // adapter binds the loaded analyzer library to the service trait.
    // No adapter is compiled into this build yet.
    eprintln!("swift-lsp: no analyzer adapter is available in this build");
    process::exit(1);
}

fn print_help() {
    eprintln!("Swift Language Server");
    eprintln!();
    eprintln!("Usage: swift-lsp [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --stdio      Use stdio for communication (default)");
    eprintln!("  --log        Enable verbose logging to stderr");
    eprintln!("  --health     Quick health check (prints 'ok <version>')");
    eprintln!("  --version    Show version information");
    eprintln!("  --help       Show this help message");
}
