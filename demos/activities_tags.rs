//! Fetches the activity tags of an account using a known access token.
//!
//! Run with: `POCKETRADAR_TOKEN=... cargo run --example activities_tags`

use pocketradar::{Client, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("pocketradar=debug,activities_tags=info")
        .init();

    let token = std::env::var("POCKETRADAR_TOKEN").unwrap_or_default();

    let mut client = Client::builder().build()?;
    client.set_access_token(Some(token), false).await?;

    let response = client.tags().get_activities_tags().await?;

    println!("Status: {}", response.status());
    if response.has_error()? {
        println!("Service error: {}", response.body());
    } else {
        println!("Activities: {:#}", response.decoded_body()?);
    }

    Ok(())
}
