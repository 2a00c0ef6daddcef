//! Command-line walk through the admin client
//!
//! This example demonstrates:
//! - Loading `AdminConfig` from YAML with environment overrides
//! - Logging in and threading the credential into the client
//! - Loading stores and searching them without accents
//! - Reading the liturgical program of each event
//!
//! ```text
//! cargo run --example admin_cli -- [config.yaml] [query]
//! CHOIR_USERNAME=admin CHOIR_PASSWORD=secret cargo run --example admin_cli -- admin.yaml "nhap le"
//! ```

use anyhow::{Context, Result};
use choir::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("choir=info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => AdminConfig::from_yaml_file(&path)?,
        _ => AdminConfig::default(),
    }
    .with_env_overrides()?;
    let query = args.next().unwrap_or_default();

    println!("🎵 Choir admin");
    println!("   API: {}\n", config.api_base_url);

    let mut client = RestClient::from_config(&config)?;
    if let (Ok(username), Ok(password)) = (
        std::env::var("CHOIR_USERNAME"),
        std::env::var("CHOIR_PASSWORD"),
    ) {
        let credential = client
            .login(&username, &password)
            .await
            .context("login failed")?;
        client = client.with_credential(credential);
        println!("✅ Logged in as {}\n", username);
    }

    let songs = ResourceStore::<Song>::with_filter_spec(
        Arc::new(client.service::<Song>()),
        config.filter_spec_for(ResourceKind::Song),
    );
    let events = ResourceStore::<Event>::with_filter_spec(
        Arc::new(client.service::<Event>()),
        config.filter_spec_for(ResourceKind::Event),
    );

    if let Err(err) = songs.load().await {
        eprintln!("❌ Songs: {}", err.user_message());
    }
    if let Err(err) = events.load().await {
        eprintln!("❌ Events: {}", err.user_message());
    }

    songs.set_query(query.as_str());
    events.set_query(query.as_str());

    let matching_songs = songs.filtered_view();
    println!("📖 Songs ({} of {}):", matching_songs.len(), songs.len());
    for song in &matching_songs {
        let page = song
            .songbook_page
            .as_ref()
            .map(FieldValue::to_search_text)
            .unwrap_or_default();
        println!(
            "   - {} [{} {}]",
            song.title,
            song.songbook.as_deref().unwrap_or("-"),
            page
        );
    }

    let all_songs = songs.records();
    let matching_events = events.filtered_view();
    println!("\n📅 Events ({} of {}):", matching_events.len(), events.len());
    for event in &matching_events {
        println!(
            "   - {} ({})",
            event.title,
            event.event_type.as_deref().unwrap_or("?")
        );
        for (part, slot) in event.program().iter() {
            let title = slot
                .song_id
                .as_ref()
                .and_then(|id| all_songs.iter().find(|s| s.id() == Some(id)))
                .map(|s| s.title.as_str())
                .unwrap_or("-");
            match &slot.note {
                Some(note) => println!("       {}: {} ({})", part.label(), title, note),
                None => println!("       {}: {}", part.label(), title),
            }
        }
    }

    Ok(())
}
