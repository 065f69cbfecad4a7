use crate::error::{check_mass, check_speed, SimError};
use crate::models::track::{demo_configs, marker_positions, readout};
use crate::sim::{BodyConfig, BodySnapshot, SimulationParameters, Simulator};
use tracing::{debug, info, trace, warn};

/// Session state governing whether frames advance the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }
}

/// Start/pause/reset buttons and their keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Reset,
}

impl Control {
    /// Space and Enter start, `p` pauses, `r` resets (case-insensitive).
    pub fn from_key(key: &str) -> Option<Control> {
        match key {
            " " | "Enter" => Some(Control::Start),
            k if k.eq_ignore_ascii_case("p") => Some(Control::Pause),
            k if k.eq_ignore_ascii_case("r") => Some(Control::Reset),
            _ => None,
        }
    }
}

/// Turns frame callbacks into simulated seconds.
pub trait TickSource {
    /// Seconds to advance for a frame arriving at `timestamp_ms`. Never negative.
    fn next_dt(&mut self, timestamp_ms: f64, time_scale: f64) -> f64;

    /// Forget the previous frame; called whenever the session (re)starts.
    fn restart(&mut self);
}

/// `requestAnimationFrame` clock: the first frame after a restart yields 0,
/// later frames the scaled wall-clock delta.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl TickSource for FrameClock {
    fn next_dt(&mut self, timestamp_ms: f64, time_scale: f64) -> f64 {
        let last = self.last_ms.replace(timestamp_ms).unwrap_or(timestamp_ms);
        let dt = (timestamp_ms - last) / 1000.0 * time_scale;
        // clocks may jump backwards or hand us garbage; the core only takes dt >= 0
        if dt.is_finite() { dt.max(0.0) } else { 0.0 }
    }

    fn restart(&mut self) {
        self.last_ms = None;
    }
}

/// One classroom session: bodies, controls and the run state machine.
#[derive(Debug)]
pub struct Engine<S: TickSource = FrameClock> {
    sim: Simulator,
    /// Slider values per body; reset speeds come from here.
    configs: Vec<BodyConfig>,
    params: SimulationParameters,
    state: RunState,
    clock: S,
}

impl Engine<FrameClock> {
    pub fn new(configs: Vec<BodyConfig>, params: SimulationParameters) -> Result<Self, SimError> {
        Self::with_source(configs, params, FrameClock::default())
    }

    /// Three-body classroom line-up with default controls.
    pub fn new_demo() -> Self {
        Self::build(demo_configs(), SimulationParameters::default(), FrameClock::default())
    }
}

impl<S: TickSource> Engine<S> {
    pub fn with_source(
        configs: Vec<BodyConfig>,
        params: SimulationParameters,
        clock: S,
    ) -> Result<Self, SimError> {
        params.validate()?;
        for c in &configs {
            c.validate()?;
        }
        Ok(Self::build(configs, params, clock))
    }

    fn build(configs: Vec<BodyConfig>, params: SimulationParameters, clock: S) -> Self {
        info!(bodies = configs.len(), ?params, "session created");
        Self {
            sim: Simulator::new(&configs),
            configs,
            params,
            state: RunState::Idle,
            clock,
        }
    }

    pub fn len(&self) -> usize { self.sim.len() }
    pub fn is_empty(&self) -> bool { self.sim.is_empty() }
    pub fn state(&self) -> RunState { self.state }
    pub fn params(&self) -> &SimulationParameters { &self.params }
    pub fn configs(&self) -> &[BodyConfig] { &self.configs }
    pub fn simulator(&self) -> &Simulator { &self.sim }

    /// `Idle | Paused -> Running`. Starting while running changes nothing.
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        self.clock.restart();
        info!(from = self.state.as_str(), "start");
        self.state = RunState::Running;
    }

    /// `Running -> Paused`; ignored in any other state.
    pub fn pause(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        info!(time = self.sim.time(), "pause");
        self.state = RunState::Paused;
    }

    /// Back to `Idle` with every body on the start line at its slider speed.
    pub fn reset(&mut self) {
        let speeds: Vec<f64> = self.configs.iter().map(|c| c.speed).collect();
        // configs and bodies are built from the same list, lengths always agree
        if let Err(e) = self.sim.reset(&speeds) {
            warn!(error = %e, "reset skipped, bodies keep their state");
        }
        info!(from = self.state.as_str(), "reset");
        self.state = RunState::Idle;
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::Start => self.start(),
            Control::Pause => self.pause(),
            Control::Reset => self.reset(),
        }
    }

    /// Handle a key press. Returns whether it mapped to a control.
    pub fn key(&mut self, key: &str) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.apply(control);
                true
            }
            None => false,
        }
    }

    /// Animation-frame callback. Returns whether another frame should be requested.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        let dt = self.clock.next_dt(timestamp_ms, self.params.time_scale);
        self.advance(dt);
        true
    }

    /// Tick by an explicit `dt` if running. Negative or non-finite values count as 0.
    pub fn advance(&mut self, dt: f64) {
        if self.state != RunState::Running {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.sim.tick(dt, &self.params);
        trace!(dt, moving = self.sim.moving_count(self.params.track_length), "frame");
    }

    pub fn set_params(&mut self, params: SimulationParameters) -> Result<(), SimError> {
        params.validate()?;
        debug!(?params, "parameters updated");
        self.params = params;
        self.sim.clamp_to(params.track_length);
        Ok(())
    }

    /// Speed/mass slider input: takes effect on the live body now and on the next reset.
    pub fn set_body(&mut self, index: usize, speed: f64, mass: f64) -> Result<(), SimError> {
        check_speed(speed)?;
        check_mass(mass)?;
        let body = self.sim.body_mut(index)?;
        body.set_speed(speed);
        body.set_mass(mass);
        let config = &mut self.configs[index];
        config.speed = speed;
        config.mass = mass;
        debug!(index, speed, mass, "body controls updated");
        Ok(())
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.sim.body_snapshots(self.params.track_length)
    }

    pub fn readouts(&self) -> Vec<[String; 2]> {
        self.snapshots().iter().map(readout).collect()
    }

    pub fn marker_positions(&self, width: f64, height: f64) -> Vec<[f64; 2]> {
        let positions: Vec<f64> = self.sim.bodies().iter().map(|b| b.position()).collect();
        marker_positions(&positions, self.params.track_length, width, height)
    }

    /// `[position, speed, acceleration]` per body, flattened.
    pub fn states_flat(&self) -> Vec<f32> {
        self.sim
            .state_matrix()
            .into_iter()
            .flat_map(|row| row.map(|v| v as f32))
            .collect()
    }
}
