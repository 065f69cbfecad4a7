pub mod engine;
pub mod error;
pub mod models;
pub mod sim;
pub use engine::{Control, Engine, FrameClock, RunState, TickSource};
pub use error::SimError;
pub use sim::{BodyConfig, BodySnapshot, SimulationParameters, Simulator};

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use tracing::debug;

/// Ускорение свободного падения для нормальной силы трения (м/с²).
pub const G: f64 = 9.81;

/// Материальная точка на 1-D треке: позиция, скорость и последнее вычисленное ускорение.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Метка только для отображения ("A", "B", ...); физика её не читает.
    label: String,
    color: String,
    mass: f64,
    speed: f64,
    position: f64,
    acceleration: f64,
}

impl Body {
    /// Тело на старте трека, без ускорения.
    pub fn new(label: impl Into<String>, color: impl Into<String>, mass: f64, speed: f64) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            mass,
            speed,
            position: 0.0,
            acceleration: 0.0,
        }
    }

    /// Баланс сил при текущей скорости.
    ///
    /// Движущая сила равна `mass * speed`: покоящееся тело остаётся в покое, а
    /// движущееся разгоняется тем сильнее, чем быстрее едет. Трение и
    /// сопротивление воздуха направлены против; результирующая сила не бывает
    /// меньше нуля.
    pub fn apply_forces(&mut self, friction_coefficient: f64, air_resistance_coefficient: f64) {
        let friction = friction_coefficient * self.mass * G;
        let air_resistance = air_resistance_coefficient * self.speed;
        let driving_force = self.mass * self.speed;

        let net_force = (driving_force - friction - air_resistance).max(0.0);
        self.acceleration = net_force / self.mass;
    }

    /// Один шаг явного Эйлера. Дойдя до конца трека, тело останавливается навсегда.
    pub fn update(&mut self, dt: f64, track_length: f64) {
        self.speed = (self.speed + self.acceleration * dt).max(0.0);
        self.position += self.speed * dt;
        self.clamp_to(track_length);
    }

    /// Финиш: тело на `track_length` или дальше ставится в конец трека и останавливается.
    pub fn clamp_to(&mut self, track_length: f64) {
        if self.position >= track_length {
            if !self.arrived_at(track_length) {
                debug!(label = %self.label, track_length, "body arrived");
            }
            self.position = track_length;
            self.speed = 0.0;
            self.acceleration = 0.0;
        }
    }

    /// Вернуть на старт с заданной скоростью.
    pub fn reset(&mut self, speed: f64) {
        self.position = 0.0;
        self.speed = speed;
        self.acceleration = 0.0;
    }

    /// true, если тело стоит в конце трека заданной длины.
    pub fn arrived_at(&self, track_length: f64) -> bool {
        self.position == track_length && self.speed == 0.0
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn color(&self) -> &str { &self.color }
    pub fn mass(&self) -> f64 { self.mass }
    pub fn speed(&self) -> f64 { self.speed }
    pub fn position(&self) -> f64 { self.position }
    pub fn acceleration(&self) -> f64 { self.acceleration }

    pub fn set_mass(&mut self, mass: f64) { self.mass = mass; }
    pub fn set_speed(&mut self, speed: f64) { self.speed = speed; }
    pub fn set_position(&mut self, position: f64) { self.position = position; }

    /// Снимок состояния в виде массива [position, speed, acceleration].
    pub fn state_array(&self) -> [f64; 3] {
        [self.position, self.speed, self.acceleration]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn force_balance_matches_hand_computation() {
        let mut b = Body::new("A", "red", 10.0, 5.0);
        b.apply_forces(0.1, 0.05);
        // 50 - 9.81 - 0.25 = 39.94 N over 10 kg
        assert_relative_eq!(b.acceleration(), 3.994, epsilon = TOLERANCE);

        b.update(1.0, 100.0);
        assert_relative_eq!(b.speed(), 8.994, epsilon = TOLERANCE);
        assert_relative_eq!(b.position(), 8.994, epsilon = TOLERANCE);
    }

    #[test]
    fn net_force_never_negative() {
        let mut b = Body::new("A", "red", 10.0, 0.5);
        b.apply_forces(1.0, 2.0);
        assert_eq!(b.acceleration(), 0.0);
    }

    #[test]
    fn body_at_rest_stays_at_rest() {
        let mut b = Body::new("A", "red", 10.0, 0.0);
        b.apply_forces(0.0, 0.0);
        b.update(1.0, 100.0);
        assert_eq!(b.state_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn arrival_clamps_and_stops() {
        let mut b = Body::new("A", "red", 10.0, 5.0);
        b.set_position(100.0 - 0.01);
        b.update(1.0, 100.0);
        assert_eq!(b.state_array(), [100.0, 0.0, 0.0]);
        assert!(b.arrived_at(100.0));
    }

    #[test]
    fn clamp_to_shorter_track() {
        let mut b = Body::new("A", "red", 10.0, 4.0);
        b.set_position(80.0);
        b.clamp_to(100.0);
        assert_eq!(b.state_array(), [80.0, 4.0, 0.0]);
        b.clamp_to(50.0);
        assert_eq!(b.state_array(), [50.0, 0.0, 0.0]);
        assert!(b.arrived_at(50.0));
    }

    #[test]
    fn zero_length_track_is_already_arrived() {
        let mut b = Body::new("A", "red", 10.0, 3.0);
        b.apply_forces(0.1, 0.05);
        b.update(0.0, 0.0);
        assert_eq!(b.state_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn speed_clamped_when_acceleration_would_reverse() {
        let mut b = Body::new("A", "red", 1.0, 1.0);
        // force a negative acceleration directly through a stale value
        b.acceleration = -5.0;
        b.update(1.0, 100.0);
        assert_eq!(b.speed(), 0.0);
        assert_eq!(b.position(), 0.0);
    }

    #[test]
    fn reset_restores_start_line() {
        let mut b = Body::new("A", "red", 10.0, 5.0);
        b.apply_forces(0.0, 0.0);
        b.update(2.0, 1000.0);
        b.reset(7.5);
        assert_eq!(b.state_array(), [0.0, 7.5, 0.0]);
    }
}
