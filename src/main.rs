use std::path::PathBuf;

use clap::{Parser, Subcommand};

use globetrotter::protocol::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Host a quiz server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// JSON file to load the destinations from
        #[arg(short, long, default_value = "destinations.json")]
        destinations: PathBuf,

        /// Base URL embedded into challenge invite links
        #[arg(long, default_value = "http://localhost:8712")]
        base_url: String,
    },

    /// Play against a server
    Play {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Invite code from a friend's challenge link
        #[arg(long)]
        invite: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve {
            port,
            destinations,
            base_url,
        } => globetrotter::server::run(port, destinations, base_url).await,
        Command::Play { host, port, invite } => globetrotter::client::run(host, port, invite).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
