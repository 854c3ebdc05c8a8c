// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `orgloopd`: a thin binary that assembles a default engine and runs it
//! to completion (SPEC_FULL §A).
//!
//! This stands in for the CLI `apply` surface without reproducing it —
//! loading connectors from a config file requires YAML parsing, schema
//! validation, and a connector registry, all explicitly out of scope
//! (§1). What this binary demonstrates is the part that *is* in scope:
//! the full startup order, the listener, and the graceful drain sequence
//! (§4.9), wired up with whatever topology the embedding caller supplies.
//! Without a connector registry to load from disk, the default topology
//! here is empty — sources/actors/routes a real deployment would declare
//! are for the out-of-scope composition layer to build and hand to
//! [`orgloop_engine::Engine::start`] instead of this `main`.

use clap::Parser;
use orgloop_engine::{Engine, EngineConfig, EngineTopology};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default data directory, relative to the working directory the process
/// is launched from (mirrors the teacher's `oj-daemon` convention of a
/// dotfile-free, explicit `--data-dir` over an implicit home-directory
/// default).
const DEFAULT_DATA_DIR: &str = "./orgloop-data";

#[derive(Debug, Parser)]
#[command(name = "orgloopd", about = "Run an OrgLoop engine instance to completion")]
struct Args {
    /// Root directory for the WAL and checkpoint store.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Port the loopback webhook/hook listener binds to (§4.4).
    #[arg(long, default_value_t = orgloop_listener::DEFAULT_PORT)]
    port: u16,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = EngineConfig::new(args.data_dir.clone());
    config.listener.addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), args.port);

    tracing::info!(data_dir = %args.data_dir.display(), port = args.port, "starting orgloop engine");

    // No connector registry exists here (out of scope, §1): a real
    // deployment assembles `EngineTopology` from its own connector
    // instances before calling `Engine::start`. This binary's contract
    // is the supervisor lifecycle, not topology composition.
    let topology = EngineTopology::new();
    let engine = Engine::start(topology, config, Vec::new()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, draining");

    let report = engine.shutdown().await;
    tracing::info!(
        in_flight_at_drain_start = report.in_flight_at_drain_start,
        forced = report.forced,
        "engine shut down"
    );

    Ok(())
}
