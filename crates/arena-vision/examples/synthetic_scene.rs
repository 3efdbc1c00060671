//! Replay a synthetic arena through the full pipeline and print what it sees.
//!
//! ```text
//! cargo run -p arena-vision --example synthetic_scene -- debug
//! ```
//!
//! The optional argument is the log level (default `info`).

use std::time::Duration;

use arena_vision::capture::ImageSequenceDevice;
use arena_vision::scene::{reference_arena, Scene, BALL_RED, WALL_BLUE};
use arena_vision::{Pipeline, PipelineParams};
use log::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    arena_vision::core::init_with_level(level)?;

    // A second arena where the ball touches a blob and must be recovered by
    // the circle pass.
    let cluttered = Scene::new(640, 480, [0, 0, 0])
        .disk(320.0, 240.0, 45.0, BALL_RED)
        .rect(330, 230, 420, 250, BALL_RED)
        .rect(40, 60, 600, 72, WALL_BLUE)
        .render();

    let device = ImageSequenceDevice::from_frames(vec![reference_arena(), cluttered]).with_fps(5.0);
    let mut pipeline = Pipeline::start(device, PipelineParams::default())?;

    for _ in 0..6 {
        std::thread::sleep(Duration::from_millis(150));
        let set = pipeline.tick();
        println!(
            "frame {:?}: {} ellipses, {} circles, {} wall segments",
            set.frame_sequence,
            set.ellipses().count(),
            set.circles().count(),
            set.walls.len()
        );
        for ball in &set.balls {
            let c = ball.center();
            println!("  ball at ({:.1}, {:.1})", c.x, c.y);
        }
    }

    pipeline.shutdown();
    Ok(())
}
