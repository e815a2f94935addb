//! Maze Sim
//!
//! Headless demo: builds a small maze and replays a scripted run through it,
//! logging every event the simulation emits.

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use maze_sim::{
    game::{player, tick::tick},
    Direction, GameEvent, InputFrame, LevelData, VERSION,
};

const DELTA: f32 = 1.0 / 60.0;

const DEMO_LEVEL: &str = "\
Height=5
Width=9
0,0=0\n1,0=0\n2,0=0\n3,0=0\n4,0=0\n5,0=0\n6,0=0\n7,0=0\n8,0=0
0,1=0\n8,1=0
0,2=1\n4,2=3\n6,2=4\n8,2=2
0,3=0\n5,3=5\n8,3=0
0,4=0\n1,4=0\n2,4=0\n3,4=0\n4,4=0\n5,4=0\n6,4=0\n7,4=0\n8,4=0
";

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Maze Sim v{}", VERSION);

    let data = LevelData::parse(DEMO_LEVEL).context("failed to parse demo level")?;
    info!(width = data.width, height = data.height, "level parsed");

    let seed = 2026;
    let mut grid = data.build_grid(1, seed).context("failed to build grid")?;
    info!(
        seed,
        statics = grid.statics().len(),
        enemies = grid.enemies().len(),
        "grid ready"
    );

    // Scripted run: head down the corridor, detour up for the key, then
    // dash for the exit, swinging once on the way past the ghost.
    let mut ticks = 0u32;
    let mut outcome = "script exhausted";
    for i in 0..1200 {
        let input = match i {
            0..=74 => InputFrame::walk(Direction::Right),
            75..=94 => InputFrame::walk(Direction::Up),
            95..=114 => InputFrame::walk(Direction::Down),
            115 => InputFrame::walk(Direction::Right).with_dash(),
            130 => InputFrame::walk(Direction::Right).with_attack(),
            _ => InputFrame::walk(Direction::Right),
        };
        let result = tick(&mut grid, &input, DELTA);
        ticks += 1;
        for event in &result.events {
            match event {
                GameEvent::Sound(_) => {}
                other => info!(tick = ticks, event = ?other, "event"),
            }
        }
        if result.victory {
            outcome = "victory";
            break;
        }
        if result.game_over {
            outcome = "game over";
            break;
        }
    }

    let p = grid.player();
    info!(
        outcome,
        ticks,
        position = ?p.entity.position(),
        health = p.entity.health(),
        key = p.has_key(),
        "run finished"
    );
    info!(
        "player health {:.0}/{:.0}",
        p.entity.health().max(0.0),
        player::STARTING_HEALTH
    );
    Ok(())
}
