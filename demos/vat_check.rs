use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vatid::abn::AbnClient;
use vatid::core::*;
use vatid::ukvat::{UkVatClient, UkVatCredentials};
use vatid::vies::ViesClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "vatid=debug".into()))
        .init();

    // Format validation (no network required)
    println!("=== VAT ID Parsing ===\n");

    let samples = [
        "DE123456789",
        "atu 1234 5678",
        "NL822010690B01",
        "GB123456789",
        "AU51824753556",
        "AU41824753556", // bad checksum
        "DE12345678",    // too short
        "XX999999999",   // unknown country
    ];

    for raw in &samples {
        match VatId::parse(raw) {
            Ok(id) => println!(
                "  {raw:<18} => {id} (country={}, number={})",
                id.country_code(),
                id.number()
            ),
            Err(e) => println!("  {raw:<18} => INVALID: {e}"),
        }
    }

    let codes: Vec<_> = supported_country_codes().collect();
    println!("\nSupported prefixes: {}", codes.join(" "));

    // Existence checks (requires network)
    println!("\n=== Registry Lookups ===\n");

    let vies = ViesClient::builder()
        .retries(3)
        .timeout(Duration::from_secs(15))
        .build()?;
    let mut builder = Validator::builder().vies(vies.clone());

    match UkVatCredentials::from_env() {
        Ok(creds) => builder = builder.uk_vat(UkVatClient::new(creds)?),
        Err(e) => println!("  GB lookups are format-only: {e}"),
    }
    match AbnClient::from_env() {
        Ok(abn) => builder = builder.abn(abn.build()?),
        Err(e) => println!("  AU lookups are format-only: {e}"),
    }
    let validator = builder.build();
    println!();

    let lookups = std::env::args().skip(1).collect::<Vec<_>>();
    let lookups = if lookups.is_empty() {
        vec!["NL822010690B01".to_string(), "DE811907980".to_string()]
    } else {
        lookups
    };

    for raw in &lookups {
        let outcome = match validator.validate(raw).await {
            Ok(()) => "registered".to_string(),
            Err(VatError::NotFound) => "not registered".to_string(),
            Err(e) => format!("ERROR: {e}"),
        };
        println!("  {raw:<18} => {outcome}");
    }

    // Registry details via VIES
    if let Some(id) = lookups
        .iter()
        .filter_map(|raw| VatId::parse(raw).ok())
        .find(|id| validator.route_for(id) == Route::Vies)
    {
        println!("\n=== VIES Details for {id} ===\n");
        match vies.lookup(&id).await {
            Ok(result) => {
                println!("  valid:   {}", result.valid);
                println!("  date:    {}", result.request_date.as_deref().unwrap_or("-"));
                println!("  name:    {}", result.name.as_deref().unwrap_or("-"));
                println!("  address: {}", result.address.as_deref().unwrap_or("-"));
            }
            Err(e) => println!("  ERROR: {e}"),
        }
    }

    Ok(())
}
