//! duolink demo
//!
//! Two nodes joined by an in-memory null modem, each running as its own task
//! at the configured tick rate. Each side plays a scripted game: pick up a
//! coin, then walk onto the exit. Ctrl-C makes both sides leave.

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use duolink_core::error::{DuolinkError, Result};
use duolink_node::config::{self, NodeConfig};
use duolink_node::dispatch::Node;
use duolink_node::session::{GameLayer, LocalEvent, Role, SessionOutcome, SessionState};
use duolink_node::transport::{LoopbackLink, NullModem};

/// Scripted stand-in for the level layer.
struct ScriptedGame {
    ticks_in_game: u32,
    coin_at: u32,
    exit_at: u32,
    remote_coins: u32,
    outcome: Option<SessionOutcome>,
}

impl ScriptedGame {
    fn new(coin_at: u32, exit_at: u32) -> Self {
        Self {
            ticks_in_game: 0,
            coin_at,
            exit_at,
            remote_coins: 0,
            outcome: None,
        }
    }

    /// Milestone for this tick, if any. Standing on the exit repeats.
    fn step(&mut self) -> Option<LocalEvent> {
        self.ticks_in_game += 1;
        if self.ticks_in_game == self.coin_at {
            Some(LocalEvent::CoinTaken)
        } else if self.ticks_in_game >= self.exit_at {
            Some(LocalEvent::ReachedExit)
        } else {
            None
        }
    }
}

impl GameLayer for ScriptedGame {
    fn load_level(&mut self, role: Role) -> Result<()> {
        let level = role
            .level()
            .ok_or_else(|| DuolinkError::Internal("no level without a role".into()))?;
        tracing::info!(level, "level loaded");
        Ok(())
    }

    fn unload_level(&mut self) {
        tracing::debug!("level unloaded");
    }

    fn remote_coin_taken(&mut self) {
        self.remote_coins += 1;
    }

    fn session_ended(&mut self, outcome: SessionOutcome) {
        self.outcome = Some(outcome);
    }
}

struct Side {
    name: &'static str,
    /// Ticks to wait before asking for multiplayer.
    request_after: u32,
    game: ScriptedGame,
}

async fn run_side(
    side: Side,
    link: LoopbackLink,
    cfg: NodeConfig,
    mut stop: watch::Receiver<bool>,
) -> Result<Option<SessionOutcome>> {
    let Side {
        name,
        request_after,
        mut game,
    } = side;
    let irq = link.interrupts();
    let mut node = Node::new(name, link.clone(), &cfg);
    let period = Duration::from_secs(1) / cfg.session.tick_hz;
    let mut interval = tokio::time::interval(period);
    let mut ticks: u32 = 0;
    let mut stop_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = stop.changed(), if stop_open => {
                match changed {
                    Ok(()) if *stop.borrow() => {
                        node.leave(&mut game)?;
                    }
                    Ok(()) => {}
                    Err(_) => stop_open = false,
                }
            }
        }

        link.clock()?;
        node.drain(&irq, &mut game)?;

        ticks += 1;
        if ticks == request_after {
            node.request_multiplayer()?;
        }
        node.on_tick(&mut game)?;
        if node.state() == SessionState::InGame {
            if let Some(evt) = game.step() {
                node.local_event(evt, &mut game)?;
            }
        }

        let done = matches!(node.state(), SessionState::Ended(_));
        if done && node.transport().outbound_len() == 0 {
            tracing::info!(
                node = name,
                remote_coins = game.remote_coins,
                coins = node.session().relay().coins(),
                "side finished"
            );
            return Ok(game.outcome);
        }
    }
}

fn join_failed(e: tokio::task::JoinError) -> DuolinkError {
    DuolinkError::Internal(format!("node task failed: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "duolink.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    tracing::info!(
        path = %path,
        baud = cfg.line.baud,
        tick_hz = cfg.session.tick_hz,
        "duolink demo starting"
    );

    let (link_a, link_b) = NullModem::pair();
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c, leaving");
            let _ = stop_tx.send(true);
        }
    });

    let a = Side {
        name: "alpha",
        request_after: 1,
        game: ScriptedGame::new(30, 120),
    };
    // Start the second side inside the first one's beaconing phase so the
    // discovery roles are not symmetric.
    let b = Side {
        name: "bravo",
        request_after: cfg.session.discovery_grace_ticks + 30,
        game: ScriptedGame::new(45, 200),
    };

    let task_a = tokio::spawn(run_side(a, link_a, cfg.clone(), stop_rx.clone()));
    let task_b = tokio::spawn(run_side(b, link_b, cfg, stop_rx));

    let outcome_a = task_a.await.map_err(join_failed)??;
    let outcome_b = task_b.await.map_err(join_failed)??;

    tracing::info!(
        alpha = outcome_a.map(|o| o.as_str()).unwrap_or("none"),
        bravo = outcome_b.map(|o| o.as_str()).unwrap_or("none"),
        "demo finished"
    );
    Ok(())
}
