use clap::Subcommand;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::is_development;
use crate::services::OtpService;

#[derive(Subcommand)]
pub enum OtpCommands {
    #[command(about = "Issue a code for a phone number and print it")]
    Issue {
        #[arg(help = "Indonesian mobile number, e.g. 081234567890")]
        phone: String,
        #[arg(long, help = "Claim whose verification this code completes")]
        claim_id: Option<Uuid>,
    },
}

pub async fn handle(cmd: OtpCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        OtpCommands::Issue { phone, claim_id } => {
            // Printing plaintext codes is a local-development shortcut;
            // staging/production issue through the SMS provider.
            if !is_development!() {
                anyhow::bail!("otp issue is only available in development mode (APP_ENV)");
            }

            let service = OtpService::new().await?;
            let issued = service.issue(&phone, claim_id).await?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "otp_id": issued.id,
                        "otp_code": issued.code,
                        "expires_at": issued.expires_at,
                    })
                ),
                OutputFormat::Text => {
                    println!("otp_id:     {}", issued.id);
                    println!("otp_code:   {}", issued.code);
                    println!("expires_at: {}", issued.expires_at);
                }
            }
            Ok(())
        }
    }
}
