//! Weather station demo.
//!
//! This example shows how to:
//! - Attach displays to a station
//! - Push readings to every display
//! - Detach a display and use a drop-to-unsubscribe handle
//!
//! Run with: cargo run --example weather_station
//! Set RUST_LOG=statehub=debug to see hub events.

use statehub::displays::{CurrentConditionsDisplay, StatisticsDisplay};
use statehub::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weather Station ===\n");

    let config = HubConfig::loader().with_env_overrides("HUB", "__").load()?;
    let station = Subject::builder()
        .with_config(config)
        .with_history(8)
        .build(0.0_f64)?;

    let current = Arc::new(CurrentConditionsDisplay::new());
    let stats = Arc::new(StatisticsDisplay::new());
    station.attach(current.clone());
    station.attach(stats.clone());

    println!("--- Reading 1 ---");
    station.set_state(25.5)?;

    println!("\n--- Reading 2 ---");
    station.set_state(30.0)?;

    println!("\n--- Detaching current conditions ---");
    station.detach(&current);
    station.set_state(28.0)?;

    println!("\n--- Temporary alert subscriber ---");
    let alert = station.subscribe("heat-alert", |t: &f64| {
        if *t > 29.0 {
            println!("Heat alert: {:.1}", t);
        }
        Ok(())
    });
    station.set_state(31.2)?;
    drop(alert);

    println!("\n--- Rolling back one reading ---");
    station.rollback(1)?;

    println!("\nFinal reading: {:.1}", station.state());
    println!("Readings stored: {}", station.version());
    println!("Statistics display saw {} readings", stats.count());

    Ok(())
}
