use anyhow::Result;

use parallax_core::{AppConfig, ImageFetcher};

pub async fn run(config: &AppConfig, json: bool) -> Result<()> {
    let request = config.search_request()?;
    let fetcher = ImageFetcher::new(config)?;

    tracing::info!("Searching for '{}'", request.query());
    let records = fetcher.fetch(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No photos found for '{}'.", request.query());
        return Ok(());
    }

    println!("Photos for '{}' ({}):\n", request.query(), records.len());
    for record in &records {
        println!("  {}  {}", record.id, record.caption());
        println!("    {}", record.full_url);
    }

    Ok(())
}
