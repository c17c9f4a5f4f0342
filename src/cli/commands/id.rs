use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::format::{format_niam, format_nip, Niam, Nip};

#[derive(Subcommand)]
pub enum IdCommands {
    #[command(about = "Format an institution code (7 digits)")]
    Nip {
        #[arg(help = "Code in either form, e.g. 2601001 or 26.01.001")]
        code: String,
    },

    #[command(about = "Format a personnel code (2-letter prefix + 9 digits)")]
    Niam {
        #[arg(help = "Code in either form, e.g. AN260100101 or AN.26.01.001.01")]
        code: String,
    },
}

pub async fn handle(cmd: IdCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        IdCommands::Nip { code } => {
            if Nip::parse(&code).is_none() {
                anyhow::bail!("not a valid NIP: {}", code);
            }
            print_both(&format_nip(&code, true), &format_nip(&code, false), &output_format);
            Ok(())
        }
        IdCommands::Niam { code } => {
            if Niam::parse(&code).is_none() {
                anyhow::bail!("not a valid NIAM: {}", code);
            }
            print_both(&format_niam(&code, true), &format_niam(&code, false), &output_format);
            Ok(())
        }
    }
}

fn print_both(clean: &str, dotted: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "clean": clean, "dotted": dotted })
        ),
        OutputFormat::Text => {
            println!("clean:  {}", clean);
            println!("dotted: {}", dotted);
        }
    }
}
