//! Logs in and lists the measurements of the last month.
//!
//! Run with:
//! `POCKETRADAR_LOGIN=... POCKETRADAR_PASSWORD=... cargo run --example histories`

use chrono::{Duration, Utc};
use pocketradar::{api::HistoryQuery, Client, Credential, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("pocketradar=debug,histories=info")
        .init();

    let login = std::env::var("POCKETRADAR_LOGIN").unwrap_or_default();
    let password = std::env::var("POCKETRADAR_PASSWORD").unwrap_or_default();

    let mut client = Client::builder().build()?;
    client
        .set_credential(Credential::new(login, password), true)
        .await?;

    let today = Utc::now();
    let query = HistoryQuery::new()
        .date_start(today - Duration::days(30))
        .date_end(today);

    match client.history().get_histories(query).await {
        Ok(response) if response.has_error()? => {
            eprintln!("Service error: {}", response.body());
        }
        Ok(response) => println!("Histories: {:#}", response.decoded_body()?),
        Err(Error::HttpError { status, raw_response, .. }) => {
            eprintln!("HTTP error {}: {}", status, raw_response);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
