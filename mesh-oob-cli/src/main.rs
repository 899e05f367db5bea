//! OOB selection tool for Bluetooth Mesh provisioning
//!
//! Reads a device's provisioning capabilities, lets the user pick the
//! authentication method on the terminal and prints the Start PDU to send.

use clap::{Args, Parser, Subcommand};
use log::info;
use mesh_oob_proto::{InputAction, OutputAction, Pdu};
use mesh_oob_select::{SelectionFlow, SelectionListener, compute_available_methods};
use std::path::PathBuf;

mod capabilities;
mod terminal;

#[derive(Parser)]
#[command(name = "mesh-oob")]
#[command(about = "Pick the OOB authentication method for Bluetooth Mesh provisioning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Capabilities PDU parameters as hex (type byte optional)
    #[arg(short, long)]
    capabilities: Option<String>,
    /// JSON capability descriptor file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the authentication methods the device allows
    Methods {
        #[command(flatten)]
        source: Source,
    },
    /// Choose the authentication method interactively
    Select {
        #[command(flatten)]
        source: Source,
    },
    /// Decode a Capabilities PDU to JSON
    Decode {
        /// Capabilities PDU parameters as hex
        #[arg(value_name = "HEX")]
        hex: Option<String>,
    },
}

/// Prints each listener callback to stderr, keeping stdout for results
struct StatusListener;

impl SelectionListener for StatusListener {
    fn on_no_oob_selected(&mut self) {
        eprintln!("No OOB authentication selected");
    }

    fn on_static_oob_selected(&mut self, value: &str) {
        eprintln!("Static OOB selected ({} hex digits)", value.len());
    }

    fn on_output_oob_action_selected(&mut self, action: OutputAction) {
        eprintln!("Output OOB selected: {}", action.label());
    }

    fn on_input_oob_action_selected(&mut self, action: InputAction) {
        eprintln!("Input OOB selected: {}", action.label());
    }

    fn on_selection_cancelled(&mut self) {
        eprintln!("OOB selection cancelled");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Methods { source } => {
            let descriptor = capabilities::load(source.capabilities.as_deref(), source.file.as_deref())?;
            for (i, method) in compute_available_methods(&descriptor).iter().enumerate() {
                println!("{}) {}", i + 1, method);
            }
        }
        Commands::Select { source } => {
            let descriptor = capabilities::load(source.capabilities.as_deref(), source.file.as_deref())?;
            info!("capabilities: {descriptor:?}");

            let stdin = std::io::stdin();
            let mut view = terminal::TerminalView::new(stdin.lock(), std::io::stderr());
            let flow = SelectionFlow::new(descriptor.clone(), StatusListener);
            let outcome = flow.run(&mut view)?;

            println!("{}", serde_json::to_string(&outcome)?);
            if let Some(start) = outcome.to_start(&descriptor) {
                let pdu = Pdu::start(&start).to_bytes();
                println!("{}", data_encoding::HEXLOWER.encode(&pdu));
            }
        }
        Commands::Decode { hex } => {
            let hex = capabilities::hex_source(hex.as_deref()).ok_or(capabilities::LoadError::Missing)?;
            let caps = capabilities::parse_hex(&hex)?;
            println!("{}", serde_json::to_string_pretty(&caps)?);
        }
    }

    Ok(())
}
