use anyhow::Context;
use clap::Subcommand;

use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Show server information from the API root endpoint")]
    Info {
        #[arg(long, help = "Server base URL (defaults to MPJ_API_URL or localhost)")]
        url: Option<String>,
    },

    #[command(about = "Check server health from the API /health endpoint")]
    Health {
        #[arg(long, help = "Server base URL (defaults to MPJ_API_URL or localhost)")]
        url: Option<String>,
    },
}

fn base_url(url: Option<String>) -> String {
    url.or_else(|| std::env::var("MPJ_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string())
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Info { url } => {
            let base = base_url(url);
            let body: serde_json::Value = reqwest::Client::new()
                .get(&base)
                .send()
                .await
                .with_context(|| format!("failed to reach {}", base))?
                .json()
                .await
                .context("server returned non-JSON body")?;
            print_value(&body, &output_format);
            Ok(())
        }
        ServerCommands::Health { url } => {
            let base = base_url(url);
            let res = reqwest::Client::new()
                .get(format!("{}/health", base))
                .send()
                .await
                .with_context(|| format!("failed to reach {}", base))?;
            let status = res.status();
            let body: serde_json::Value = res.json().await.context("server returned non-JSON body")?;
            print_value(&body, &output_format);
            if !status.is_success() {
                anyhow::bail!("server reported {}", status);
            }
            Ok(())
        }
    }
}

fn print_value(value: &serde_json::Value, format: &OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", value),
        OutputFormat::Text => println!("{:#}", value),
    }
}
