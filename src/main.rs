//! AURA CLI binary

use aura::cli::{render_summary, AuraApp, Cli, Commands};
use aura::negotiation::{BorrowerSeed, NegotiationEngine};
use aura::NegotiationConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = NegotiationConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Demo => {
            tracing::info!("Running negotiation demo");
            let app = AuraApp::new(config);
            let summary = app.run_demo().await?;
            println!("{}", render_summary(&summary));
        }

        Commands::Decide {
            wallet,
            missed,
            name,
        } => {
            let mut engine = NegotiationEngine::with_config(config);
            let seed = BorrowerSeed::default()
                .name(name)
                .wallet(wallet)
                .missed_amount(missed);
            engine.ensure_borrower("CLI", seed);

            match engine.decide_offer("CLI") {
                Some(decision) => {
                    println!("{}", decision.message);
                    println!("rationale: {}", decision.rationale);
                }
                None => anyhow::bail!("Borrower record was not created"),
            }
        }

        Commands::Session => {
            let app = AuraApp::new(config);
            app.run_interactive().await?;
        }
    }

    Ok(())
}
