//! Meshkey CLI - hide and recover asset keys in glTF documents.

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

#[derive(Parser)]
#[command(name = "meshkey")]
#[command(author, version, about = "Steganographic key embedding for glTF assets", long_about = None)]
struct Cli {
    /// Suppress user-facing output (errors still go to stderr)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a document's key and write the encoded document plus its token
    Encode {
        /// Path to the source .gltf document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// User identifier (up to 10 digits; random when omitted)
        #[arg(long)]
        uid: Option<u64>,

        /// Validity window in seconds (up to 5 digits)
        #[arg(long, default_value_t = 300)]
        validity: u32,

        /// Shuffle sequence length (1..=10 matrix offsets are drawn)
        #[arg(long, default_value_t = 10)]
        sequence_len: usize,
    },

    /// Recover the key from an encoded document and its token
    Decode {
        /// Path to the encoded .gltf document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Token string; read from <FILE stem>_token.txt when omitted
        #[arg(long)]
        token: Option<String>,
    },

    /// Parse a token on its own and print its fields
    Inspect {
        /// The 96-symbol token, or a path to a token file
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            file,
            uid,
            validity,
            sequence_len,
        } => commands::encode::execute(file, uid, validity, sequence_len, cli.quiet),
        Commands::Decode { file, token } => commands::decode::execute(file, token, cli.quiet),
        Commands::Inspect { token } => commands::inspect::execute(token, cli.quiet),
    };

    if let Err(err) = result {
        let exit_code = exit_codes::ExitCode::from_anyhow(&err);
        eprintln!("error: {:#}", err);
        exit(exit_code.code);
    }
}
