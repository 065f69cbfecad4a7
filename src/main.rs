use trackrun::models::track::demo_configs;
use trackrun::{Engine, SimulationParameters};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn print_readouts(engine: &Engine) {
    for (snap, [speed, distance]) in engine.snapshots().iter().zip(engine.readouts()) {
        println!(
            "  {} ({:>5}): {:<18} {:<18} a = {:.3} m/s²{}",
            snap.label,
            snap.color,
            speed,
            distance,
            snap.acceleration,
            if snap.arrived { "  [arrived]" } else { "" },
        );
    }
}

fn run_frames(engine: &mut Engine, clock_ms: &mut f64, frames: usize) {
    for _ in 0..frames {
        engine.frame(*clock_ms);
        *clock_ms += FRAME_MS;
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Same line-up as the classroom page, but with three different pushes.
    let params = SimulationParameters::default().with_track_length(50.0);
    let mut engine = match Engine::new(demo_configs(), params) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("bad session config: {}", e);
            std::process::exit(1);
        }
    };
    for (i, (speed, mass)) in [(2.0, 10.0), (4.0, 10.0), (4.0, 25.0)].into_iter().enumerate() {
        if let Err(e) = engine.set_body(i, speed, mass) {
            eprintln!("bad body controls: {}", e);
            std::process::exit(1);
        }
    }

    let mut clock_ms = 0.0;
    engine.start();
    run_frames(&mut engine, &mut clock_ms, 60);
    println!("t = {:.3} s ({})", engine.simulator().time(), engine.state().as_str());
    print_readouts(&engine);

    engine.pause();
    clock_ms += 5000.0; // paused time is not simulated
    engine.start();
    run_frames(&mut engine, &mut clock_ms, 60);
    println!("t = {:.3} s ({})", engine.simulator().time(), engine.state().as_str());
    print_readouts(&engine);

    engine.reset();
    println!("after reset ({}):", engine.state().as_str());
    print_readouts(&engine);
}
