use clap::Parser;
use client::network::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Join the lobby immediately under this alias
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Starting client...");
    let mut client = Client::new(&args.server).await?;

    if client.view().is_host {
        println!("You are the host: set an alias and a score to play up to!");
    }

    if let Some(name) = &args.name {
        client.join(name).await?;
    }

    client.run().await?;

    Ok(())
}
