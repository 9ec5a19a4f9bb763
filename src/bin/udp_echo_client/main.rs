use std::io;

use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use framecast::echo::{udp::UdpEchoClient, DEFAULT_PORT};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Sends stdin lines to a UDP echo server, 'q' quits")]
pub struct CommandLineEchoClientOptions {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineEchoClientOptions::parse();

    let client = UdpEchoClient::new((options.host.as_str(), options.port)).await?;
    let mut lines = BufReader::new(stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }

        let (reply, server_address) = client.echo(line.as_bytes()).await?;
        println!("Received from {}: {}", server_address, String::from_utf8_lossy(&reply));
    }

    Ok(())
}
