//! Headless skirmish demo
//!
//! Spawns two squads with opposing behaviors, runs the tick loop against
//! the wall clock for a short phase, and logs the outcome. Useful for
//! eyeballing the engine without any presentation layer:
//!
//!   RUST_LOG=debug cargo run --bin skirmish

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hexfray::combat::{Battlefield, CombatUnit, InteractionResolver, StepEvent, UnitStats};
use hexfray::core::{PlayerId, SimulationConfig};
use hexfray::grid::HexCoord;
use hexfray::phase::{build_sequence, Participant, PhaseState, TurnColor, TurnPhaseController};
use hexfray::scheduler::TickScheduler;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("starting headless skirmish");

    let config = SimulationConfig::default();
    let scheduler = TickScheduler::new(&config);
    let world = Arc::new(Mutex::new(Battlefield::new(8)));

    {
        let mut field = world.lock().expect("fresh battlefield lock");
        for (q, r) in [(-4, 0), (-4, 1), (-3, -1)] {
            let mut unit = CombatUnit::new(PlayerId(1), UnitStats::default());
            unit.movement_behavior = "hunter".to_string();
            unit.combat_behavior = "aggressive".to_string();
            field
                .spawn(unit, HexCoord::new(q, r))
                .expect("red spawn cell free");
        }
        for (q, r) in [(4, 0), (4, -1), (3, 1)] {
            let mut unit = CombatUnit::new(PlayerId(2), UnitStats::default());
            unit.movement_behavior = "prowler".to_string();
            unit.combat_behavior = "guardian".to_string();
            field
                .spawn(unit, HexCoord::new(q, r))
                .expect("blue spawn cell free");
        }
    }

    let mut resolver = InteractionResolver::new(&config, world.clone(), scheduler.handle());
    resolver.set_step_hook(Arc::new(|ev: &StepEvent| {
        if let StepEvent::Attack { source, target, damage, lethal, .. } = ev {
            tracing::info!(?source, ?target, damage, lethal, "hit");
        }
    }));
    assert!(scheduler.handle().register_component(Box::new(resolver)));

    let controller = TurnPhaseController::new(
        &config,
        scheduler.handle(),
        world.clone(),
        build_sequence(2, Duration::from_secs(3), Duration::from_secs(3)),
        vec![
            Participant { id: PlayerId(1), color: TurnColor::Red, health: 100 },
            Participant { id: PlayerId(2), color: TurnColor::Blue, health: 100 },
        ],
    );

    scheduler.start();
    controller.start().expect("phase not yet started");

    while controller.state() != PhaseState::Finished {
        std::thread::sleep(Duration::from_millis(200));
    }
    scheduler.stop();

    for participant in controller.participants() {
        tracing::info!(
            player = participant.id.0,
            health = participant.health,
            "phase settled"
        );
    }
}
