use anyhow::Result;
use clap::Parser;

mod cache;
mod cli;
mod config;
mod evidence;
mod generator;
mod html;
mod llm;
mod memory;
mod outlet;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.to_config();
    let options = args.to_options();

    if args.check_connection {
        let client = llm::client::LLMClient::new(config)?;
        return client.check_connection().await;
    }

    let result = generator::workflow::launch(&config, &args.query, &options).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
