use anyhow::Result;
use clap::Parser;
use next_release::config::{Args, Config};
use next_release::github_client::GithubClient;
use next_release::{outputs, Bumper};
use std::process::ExitCode;
use std::sync::Arc;

async fn run() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    let client = GithubClient::new(&config.token, &config.graphql_url)?;
    let bumper = Bumper::new(Arc::new(client), config.clone());

    let outcome = bumper.run().await?;
    let values = outcome.outputs();
    let pairs: Vec<(&str, &str)> = values
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    outputs::write_outputs(config.output.as_deref(), &pairs)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", outputs::error_annotation(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}
