mod commands;

use alloy_primitives::Address;
use bazaar_core::{
    market_service, to_ledger_amount, view, CatalogService, NewListing, Session, Settings,
    SimLedger,
};
use bazaar_core::sim::SIM_MARKETPLACE_ADDRESS;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use commands::{Cli, Commands, ConfigCommands};
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(error) = handle_command(cli).await {
        eprintln!("{} {}", "ERROR:".red(), error);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_command(cli: Cli) -> Result<(), String> {
    match &cli.command {
        Commands::Demo { balance } => run_demo(balance).await.map_err(|e| e.to_string()),

        Commands::Config { command } => handle_config_command(command, &cli),

        Commands::Completion { shell, output } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(path).map_err(|e| e.to_string())?;
                    generate(*shell, &mut cmd, name, &mut file);
                }
                None => generate(*shell, &mut cmd, name, &mut std::io::stdout()),
            }
            Ok(())
        }
    }
}

fn handle_config_command(command: &ConfigCommands, cli: &Cli) -> Result<(), String> {
    let path = cli.config.display().to_string();
    match command {
        ConfigCommands::Init => {
            Settings::default()
                .save_to_file(&path)
                .map_err(|e| e.to_string())?;
            println!("Wrote default configuration to {}", path.bold());
            Ok(())
        }
        ConfigCommands::Show => {
            let settings = if cli.config.exists() {
                Settings::from_file(&path).map_err(|e| e.to_string())?
            } else {
                Settings::default()
            };
            let rendered = toml::to_string(&settings).map_err(|e| e.to_string())?;
            print!("{}", rendered);
            Ok(())
        }
    }
}

/// Scripted walkthrough of the whole client surface: connect, balance,
/// catalog sync, listing, purchase, upvote, review.
async fn run_demo(opening_balance: &str) -> Result<(), bazaar_core::CoreError> {
    let account = Address::repeat_byte(0x11);
    let seller = Address::repeat_byte(0x22);

    let sim = Arc::new(SimLedger::new(account, to_ledger_amount(opening_balance)?));
    sim.seed_product(
        seller,
        "Solar Lamp",
        "https://example.com/lamp.png",
        "Rechargeable desk lamp",
        "Nairobi",
        to_ledger_amount("1.50")?,
    );
    sim.seed_product(
        seller,
        "Clay Teapot",
        "https://example.com/teapot.png",
        "Hand-thrown teapot",
        "Lagos",
        to_ledger_amount("2.00")?,
    );

    println!("{}", "Connecting wallet...".bold());
    let session = Session::connect(
        sim.as_ref(),
        sim.clone(),
        SIM_MARKETPLACE_ADDRESS,
        sim.clone(),
    )
    .await?;
    println!("Active account: {}", view::short_address(session.account()));
    println!("Balance: {} cUSD\n", session.balance().await?.green());

    let mut catalog = CatalogService::new();
    catalog.refresh(&session).await?;
    print_catalog(&catalog);

    println!("{}", "Listing a new product...".bold());
    let receipt = market_service::list_product(
        &session,
        &mut catalog,
        &NewListing {
            name: "Woven Basket".to_string(),
            image: "https://example.com/basket.png".to_string(),
            description: "Sisal basket".to_string(),
            location: "Accra".to_string(),
            price: "0.99".to_string(),
        },
    )
    .await?;
    info!("Listing confirmed in {}", receipt.tx_hash);
    print_catalog(&catalog);

    println!("{}", "Buying product 1...".bold());
    let receipt = market_service::buy_product(&session, &mut catalog, 1).await?;
    info!("Purchase confirmed in {}", receipt.tx_hash);
    println!("Balance after purchase: {} cUSD\n", session.balance().await?.green());

    market_service::upvote_product(&session, &mut catalog, 0).await?;
    market_service::add_review(&session, &mut catalog, 0, "Bright and sturdy.").await?;

    print_catalog(&catalog);
    if let Some(product) = catalog.snapshot().and_then(|s| s.get(0)) {
        println!("{}", "Reviews for product 0:".bold());
        for line in view::review_lines(product) {
            println!("  {} {}", line.author.cyan(), line.body);
        }
    }

    Ok(())
}

fn print_catalog(catalog: &CatalogService) {
    let Some(snapshot) = catalog.snapshot() else {
        println!("(no catalog synced yet)");
        return;
    };
    println!("{}", "Catalog:".bold());
    for card in view::product_cards(snapshot) {
        println!(
            "  [{}] {} - {} cUSD, {} sold, {} upvotes, {} reviews ({}, {})",
            card.index,
            card.name.bold(),
            card.price_display.green(),
            card.sold,
            card.upvotes,
            card.review_count,
            card.location,
            card.owner.cyan(),
        );
    }
    println!();
}
