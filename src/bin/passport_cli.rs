use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use dpp_passport::{
    config::{self, AppConfig},
    context::{ClientState, LoadState, PassportLoader, PassportSnapshot},
    i18n::{parse_accept_language, AVAILABLE_LANGUAGES},
    models::ApparelDppData,
    query::PassportQuery,
    services::{
        dpp::{
            format_circularity_percent, format_dpp_date, format_environmental_metric,
            process_dpp_data, ProcessedDpp,
        },
        location::format_full_address,
        nutrition::NutrientType,
    },
};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;
    config::init_tracing(config.log_level(), config.log_json);
    debug!(environment = %config.environment, api_url = %config.api_url, "configuration loaded");

    match cli.command {
        Commands::Fetch(args) => handle_fetch(&config, args, cli.json).await?,
        Commands::Dpp(args) => handle_dpp(args, cli.json).await?,
        Commands::Languages => handle_languages(cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "dpp-passport",
    about = "Load and inspect Digital Product Passport records",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one page load and print the resulting snapshot
    Fetch(FetchArgs),
    /// Summarise an apparel passport document
    Dpp(DppArgs),
    /// List the languages passport pages are offered in
    Languages,
}

#[derive(Args)]
struct FetchArgs {
    /// Raw page query string, e.g. "gtin=...&serial=..."; explicit flags win
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    gtin: Option<String>,
    #[arg(long)]
    serial: Option<String>,
    #[arg(long = "scanid")]
    scan_id: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    preview: bool,
    /// Stored page language; wins when it is one the pages offer
    #[arg(long)]
    language: Option<String>,
    /// Browser Accept-Language header used when no stored language applies
    #[arg(long)]
    accept_language: Option<String>,
    /// Accept cookies before loading, adopting the scan id as local user
    #[arg(long, action = ArgAction::SetTrue)]
    accept_consent: bool,
    /// Stored cookie consent value ("accepted" enables scan updates)
    #[arg(long)]
    consent: Option<String>,
    /// Stored local user id of a returning visitor
    #[arg(long)]
    local_user: Option<String>,
}

#[derive(Args)]
struct DppArgs {
    /// Path to an apparel passport JSON document
    path: PathBuf,
}

fn build_query(args: &FetchArgs) -> PassportQuery {
    let mut query = args
        .query
        .as_deref()
        .map(PassportQuery::parse)
        .unwrap_or_default();

    if let Some(gtin) = args.gtin.as_deref().filter(|v| !v.is_empty()) {
        query.gtin = Some(gtin.to_string());
    }
    if let Some(serial) = args.serial.as_deref().filter(|v| !v.is_empty()) {
        query.serial = Some(serial.to_string());
    }
    if let Some(scan_id) = args.scan_id.clone() {
        query = query.with_scan_id(scan_id);
    }
    if args.preview {
        query.preview = true;
    }
    query
}

async fn handle_fetch(config: &AppConfig, args: FetchArgs, json: bool) -> Result<()> {
    let query = build_query(&args);
    let mut client = ClientState::new(args.consent.as_deref(), args.local_user.as_deref());
    let browser_languages = args
        .accept_language
        .as_deref()
        .map(parse_accept_language)
        .unwrap_or_default();

    let mut loader =
        PassportLoader::from_config(config).context("failed to construct passport loader")?;
    if args.accept_consent {
        client = loader.accept_consent(&query, &client).await;
        debug!(local_user = ?client.local_user, "cookie consent accepted");
    }
    let snapshot = loader
        .load_negotiated(&query, &client, args.language.as_deref(), browser_languages.as_slice())
        .await;

    if json {
        print_json(&snapshot)?;
    } else {
        render_snapshot(&snapshot);
    }

    Ok(())
}

fn render_snapshot(snapshot: &PassportSnapshot) {
    match snapshot.state() {
        LoadState::Loading => println!("Loading..."),
        LoadState::Error => {
            if let Some(error) = &snapshot.error {
                println!("Error: {}", error.message);
                println!("{}", error.call_to_action);
                if let Some(email) = &error.support_email {
                    println!("Support: {}", email);
                }
            }
        }
        LoadState::Loaded if snapshot.is_not_found() => {
            println!("No product passport found for this code.");
        }
        LoadState::Loaded => render_loaded(snapshot),
    }
}

fn render_loaded(snapshot: &PassportSnapshot) {
    let product_name = snapshot
        .product()
        .and_then(|p| p.product_name.as_deref())
        .unwrap_or("N/A");
    println!("Product: {}", product_name);
    if let Some(brand) = snapshot.brand().and_then(|b| b.brand_name.as_deref()) {
        println!("Brand: {}", brand);
    }
    println!("GTIN: {}", snapshot.gtin().unwrap_or("N/A"));
    println!("Serial: {}", snapshot.serial().unwrap_or("N/A"));
    println!("Lot: {}", snapshot.lot_number().unwrap_or("N/A"));

    let Some(derived) = snapshot.derived() else {
        return;
    };

    println!("Issue date: {}", derived.issue_date);
    if let Some(description) = &derived.product_description {
        println!("Description: {}", description);
    }

    let details = &derived.location_details;
    println!(
        "Made at: {} ({})",
        details.location_name.as_deref().unwrap_or("N/A"),
        details.region.as_deref().unwrap_or("N/A")
    );
    if let Some(location) = snapshot.commission_location() {
        let address = format_full_address(location);
        if !address.is_empty() {
            println!("Address: {}", address);
        }
    }

    if let Some(nutrition) = &derived.nutrition {
        if !nutrition.nutrients.is_empty() {
            println!("Nutrition:");
            for kind in NutrientType::iter() {
                if nutrition.nutrients.get_known(kind).is_some() {
                    println!(
                        "  - {:?}: {} ({})",
                        kind,
                        nutrition.value(kind),
                        nutrition.daily_value(kind)
                    );
                }
            }
        }
        if let Some(servings) = nutrition.servings_per_container {
            println!("Servings per container: {}", servings);
        }
    }

    if !derived.event_rows.is_empty() {
        println!("Journey:");
        for row in &derived.event_rows {
            println!("  - {} • {} • {}", row.date, row.biz_step, row.location_name);
        }
    }

    if !derived.material_provenance.is_empty() {
        println!("Materials:");
        for row in &derived.material_provenance {
            let indent = "  ".repeat(row.depth + 1);
            if row.traceable {
                println!(
                    "{}- {} (lot {}) from {}",
                    indent, row.product_name, row.lot_number, row.region
                );
            } else {
                println!("{}- No detailed traceability available for this material", indent);
            }
        }
    }
}

async fn handle_dpp(args: DppArgs, json: bool) -> Result<()> {
    let raw = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let data: ApparelDppData = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a valid passport document", args.path.display()))?;
    let processed = process_dpp_data(data);

    if json {
        print_json(&processed)?;
    } else {
        render_dpp(&processed);
    }

    Ok(())
}

fn render_dpp(processed: &ProcessedDpp) {
    let data = &processed.data;
    println!("Product: {}", data.product_name.as_deref().unwrap_or("N/A"));
    println!("Identifier: {}", processed.computed.product_identifier);
    if let Some(link) = processed.digital_link() {
        println!("Digital link: {}", link);
    }
    if let Some(production) = &data.production {
        println!(
            "Produced: {}",
            format_dpp_date(production.date_produced.as_deref())
        );
    }

    match processed.computed.total_recycled_content {
        Some(percent) => println!("Recycled content: {}%", percent),
        None => println!("Recycled content: -"),
    }

    if processed.computed.has_circularity_data {
        if let Some(circularity) = &data.circularity {
            println!(
                "Recyclable: {}",
                format_circularity_percent(circularity.recyclable_percent)
            );
        }
    }

    if processed.computed.has_environmental_data {
        if let Some(env) = &data.environmental {
            println!(
                "Carbon footprint: {}",
                format_environmental_metric(env.carbon_footprint_kg, "kg CO2e")
            );
            println!("Water used: {}", format_environmental_metric(env.water_used_l, "L"));
            println!(
                "Energy used: {}",
                format_environmental_metric(env.energy_used_kwh, "kWh")
            );
        }
    }
}

fn handle_languages(json: bool) -> Result<()> {
    if json {
        print_json(&AVAILABLE_LANGUAGES)?;
    } else {
        for language in AVAILABLE_LANGUAGES {
            println!("- {} ({}) {}", language.code, language.abbreviation, language.name);
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
