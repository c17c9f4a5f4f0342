use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::is_development;
use crate::services::ProfileService;

#[derive(Subcommand)]
pub enum SeedCommands {
    #[command(about = "Seed one fixture account per role tier")]
    Users,
}

pub async fn handle(cmd: SeedCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SeedCommands::Users => {
            if !is_development!() {
                anyhow::bail!("seeding is only available in development mode (APP_ENV)");
            }

            let service = ProfileService::new().await?;
            let profiles = service.seed_dev_users().await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
                OutputFormat::Text => {
                    for profile in &profiles {
                        println!(
                            "{}  {:<20} {:<15} {:?} ({:?})",
                            profile.id, profile.nama, profile.phone, profile.role, profile.status_account
                        );
                    }
                    println!("Seeded {} profiles", profiles.len());
                }
            }
            Ok(())
        }
    }
}
