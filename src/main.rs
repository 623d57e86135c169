// src/main.rs

use clap::{Parser, Subcommand};
use huffcodec::{HuffmanCodec, logger};

#[derive(Parser)]
#[command(name = "huffcodec", version = "1.0")]
#[command(about = "Huffman-code text into a self-describing payload and back.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text into a `<tree>|<bitstream>` payload
    Encode {
        text: String,
        /// Emit only the raw bitstream (measures bit length, cannot be decoded)
        #[arg(long)]
        no_tree: bool,
    },
    /// Decode a payload produced by `encode`
    Decode { payload: String },
    /// Print the code table for a text
    Codes { text: String },
}

fn main() -> huffcodec::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Encode { text, no_tree } => {
            let mut codec = HuffmanCodec::new();
            let payload = codec.encode(&text, !no_tree)?;
            println!("{payload}");
        }
        Commands::Decode { payload } => {
            let mut codec = HuffmanCodec::new();
            codec.load_payload(payload);
            println!("{}", codec.decode()?);
        }
        Commands::Codes { text } => {
            let mut codec = HuffmanCodec::new();
            codec.encode(&text, false)?;
            let mut entries: Vec<(char, String)> = codec
                .codes()
                .iter()
                .map(|(symbol, code)| (*symbol, code.clone()))
                .collect();
            entries.sort();
            for (symbol, code) in entries {
                println!("{symbol:?} -> {code}");
            }
        }
    }
    Ok(())
}
