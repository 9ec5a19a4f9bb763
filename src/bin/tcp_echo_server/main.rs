use std::io;

use clap::Parser;
use log::info;

use framecast::echo::{tcp::TcpEchoServer, DEFAULT_PORT};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Echoes back every byte received over TCP")]
pub struct CommandLineEchoServerOptions {
    #[clap(long, default_value = "0.0.0.0")]
    host: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineEchoServerOptions::parse();

    let server = TcpEchoServer::bind((options.host.as_str(), options.port)).await?;

    tokio::select! {
        result = server.serve() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
