use std::io;

use clap::Parser;
use log::info;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use framecast::echo::{tcp::TcpEchoClient, DEFAULT_PORT};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Sends stdin lines to a TCP echo server, 'q' quits")]
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

    let mut client = TcpEchoClient::connect((options.host.as_str(), options.port)).await?;
    let mut lines = BufReader::new(stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let reply = match client.echo(line.as_bytes()).await {
            Ok(reply) => reply,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                info!("Server closed the connection");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        println!("Received: {}", String::from_utf8_lossy(&reply));
    }

    client.close().await
}
