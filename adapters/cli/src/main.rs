#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted Skirmish match headlessly.

mod scenario;

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use skirmish_core::{Command, EntityId, Event};
use skirmish_world::{self as world, query, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenario::Scenario;

#[derive(Debug, Parser)]
#[command(name = "skirmish")]
#[command(about = "Runs a scripted Skirmish match and prints the result as JSON")]
struct Cli {
    /// Path to a scenario TOML file.
    scenario: PathBuf,

    /// Upper bound on simulated ticks; the run stops early once a team wins.
    #[arg(long, default_value_t = 2_400)]
    ticks: u64,

    /// What to print on stdout.
    #[arg(long, value_enum, default_value_t = Output::Summary)]
    output: Output,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Aggregate counts and the winner.
    Summary,
    /// Every event, one JSON document per line.
    Events,
    /// Final session snapshot.
    Snapshot,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    ticks: u64,
    winner: Option<EntityId>,
    deployed: usize,
    rejected: usize,
    damage_dealt: f32,
    destroyed: usize,
}

impl Summary {
    fn collect(session: &Session, events: &[Event]) -> Self {
        let mut summary = Self {
            ticks: session.tick(),
            winner: session.winner().cloned(),
            ..Self::default()
        };
        for event in events {
            match event {
                Event::UnitDeployed { .. } => summary.deployed += 1,
                Event::DeployRejected { .. } | Event::CardRejected { .. } => summary.rejected += 1,
                Event::DamageDealt { amount, .. } => summary.damage_dealt += amount,
                Event::EntityDestroyed { .. } => summary.destroyed += 1,
                _ => {}
            }
        }
        summary
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = Scenario::load(&cli.scenario)?;
    let (session, events) = run(&scenario, cli.ticks)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        Output::Summary => {
            serde_json::to_writer_pretty(&mut out, &Summary::collect(&session, &events))?;
            writeln!(out)?;
        }
        Output::Events => {
            for event in &events {
                serde_json::to_writer(&mut out, event)?;
                writeln!(out)?;
            }
        }
        Output::Snapshot => {
            serde_json::to_writer_pretty(&mut out, &query::snapshot(&session))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run(scenario: &Scenario, ticks: u64) -> Result<(Session, Vec<Event>)> {
    let mut session = Session::new(scenario.config, &scenario.session_blueprint())
        .context("scenario does not describe a playable session")?;
    let mut script = scenario.script()?;
    let dt = scenario.config.tick_duration();
    let mut events = Vec::new();

    for tick in 0..ticks {
        for command in script.remove(&tick).unwrap_or_default() {
            world::apply(&mut session, command, &mut events);
        }
        world::apply(&mut session, Command::Tick { dt }, &mut events);
        if session.winner().is_some() {
            break;
        }
    }

    info!(
        ticks = session.tick(),
        winner = ?session.winner(),
        events = events.len(),
        "Match finished"
    );
    Ok((session, events))
}
