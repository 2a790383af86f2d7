//! Subcommand handlers. Each prints one JSON document to stdout.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tripmap_assistant::{AssistantClient, Conversation};
use tripmap_core::{days, AppConfig, DaySelection, Destination};
use tripmap_extract::{extract, normalize};
use tripmap_geo::{BoundaryResolver, InMemoryBoundaryCache};
use tripmap_render::{GeoJsonEngine, ReadyGate, RenderSync};

/// Reads the whole input, from stdin when `path` is `-`.
pub(crate) fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

pub(crate) fn selection_from(day: Option<u32>) -> DaySelection {
    day.map_or(DaySelection::All, DaySelection::Day)
}

/// # Errors
///
/// Returns an error if the input cannot be read.
pub(crate) fn run_extract(input: &str) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let extraction = extract(&text);
    let destinations = extraction
        .structured_data
        .as_ref()
        .map(normalize)
        .unwrap_or_default();
    if destinations.is_empty() {
        tracing::info!("no structured itinerary found in input");
    }

    let out = json!({
        "cleaned_text": extraction.cleaned_text,
        "days": days(&destinations),
        "destinations": destinations,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the input cannot be read, the geocoder client cannot
/// be built, or the render pass fails.
pub(crate) async fn run_render(config: &AppConfig, input: &str, day: Option<u32>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let destinations = extract(&text)
        .structured_data
        .as_ref()
        .map(normalize)
        .unwrap_or_default();
    let map = render(config, destinations, day).await?;
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if no API key is configured, the assistant request
/// fails, or the render pass fails.
pub(crate) async fn run_ask(config: &AppConfig, message: &str, day: Option<u32>) -> anyhow::Result<()> {
    let client = AssistantClient::from_config(config)?;
    let mut conversation = Conversation::new(client);
    let exchange = conversation
        .ask(message)
        .await
        .context("assistant request failed")?;

    let map = if exchange.destinations.is_empty() {
        serde_json::Value::Null
    } else {
        render(config, exchange.destinations, day).await?
    };
    let out = json!({
        "reply": exchange.cleaned_text,
        "map": map,
        "transcript": conversation.transcript(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Runs one render pass against a [`GeoJsonEngine`] with the live geocoder.
async fn render(
    config: &AppConfig,
    destinations: Vec<Destination>,
    day: Option<u32>,
) -> anyhow::Result<serde_json::Value> {
    let cache = Arc::new(InMemoryBoundaryCache::new());
    let resolver = BoundaryResolver::from_config(config, cache)?;
    let sync = RenderSync::new(GeoJsonEngine::new(), resolver, ReadyGate::already_ready());
    let available = days(&destinations);
    sync.set_points(destinations);
    sync.select(selection_from(day));

    let outcome = sync.sync().await?;
    let view = sync.view();
    let features = sync.with_engine(GeoJsonEngine::to_feature_collection);

    Ok(json!({
        "days": available,
        "selection": view.selected_day,
        "combined_bound": view.combined_bound,
        "pass": outcome,
        "geojson": features,
    }))
}
