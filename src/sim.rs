use crate::error::{check_mass, check_speed, SimError};
use crate::Body;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const DEFAULT_FRICTION: f64 = 0.1;
pub const DEFAULT_AIR_RESISTANCE: f64 = 0.05;
pub const DEFAULT_TRACK_LENGTH: f64 = 100.0;
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

/// Начальная конфигурация одного тела.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: String,
    pub mass: f64,
    /// Скорость на старте и после каждого сброса (м/с).
    #[serde(default)]
    pub speed: f64,
}

impl BodyConfig {
    pub fn new(label: impl Into<String>, mass: f64, speed: f64) -> Self {
        Self {
            label: label.into(),
            color: String::new(),
            mass,
            speed,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Отклонить массу и скорость, с которыми модель сил не работает.
    pub fn validate(&self) -> Result<(), SimError> {
        check_mass(self.mass)?;
        check_speed(self.speed)?;
        Ok(())
    }
}

/// Кинематика одного тела после шага (для отрисовки и подписей).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub label: String,
    pub color: String,
    pub mass: f64,
    pub position: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub arrived: bool,
}

/// Общие параметры, читаются каждым шагом. Меняются только между шагами.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationParameters {
    pub friction_coefficient: f64,
    pub air_resistance_coefficient: f64,
    /// Конец трека (м), здесь тело финиширует.
    pub track_length: f64,
    /// Множитель: секунды реального времени -> модельные секунды.
    pub time_scale: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            friction_coefficient: DEFAULT_FRICTION,
            air_resistance_coefficient: DEFAULT_AIR_RESISTANCE,
            track_length: DEFAULT_TRACK_LENGTH,
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

impl SimulationParameters {
    pub fn with_friction(mut self, friction_coefficient: f64) -> Self {
        self.friction_coefficient = friction_coefficient;
        self
    }

    pub fn with_air_resistance(mut self, air_resistance_coefficient: f64) -> Self {
        self.air_resistance_coefficient = air_resistance_coefficient;
        self
    }

    pub fn with_track_length(mut self, track_length: f64) -> Self {
        self.track_length = track_length;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let coefficients = [
            ("friction coefficient", self.friction_coefficient),
            ("air resistance coefficient", self.air_resistance_coefficient),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidCoefficient { name, value });
            }
        }
        if !self.track_length.is_finite() || self.track_length <= 0.0 {
            return Err(SimError::InvalidTrackLength(self.track_length));
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SimError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Фиксированный упорядоченный набор тел, которые шагают вместе.
#[derive(Debug, Clone)]
pub struct Simulator {
    bodies: Vec<Body>,
    time: f64, // модельное время с последнего сброса
}

impl Simulator {
    pub fn new(configs: &[BodyConfig]) -> Self {
        let bodies = configs
            .iter()
            .map(|c| Body::new(c.label.clone(), c.color.clone(), c.mass, c.speed))
            .collect();
        Self { bodies, time: 0.0 }
    }

    pub fn len(&self) -> usize { self.bodies.len() }
    pub fn is_empty(&self) -> bool { self.bodies.is_empty() }
    pub fn time(&self) -> f64 { self.time }
    pub fn bodies(&self) -> &[Body] { &self.bodies }

    pub fn body(&self, index: usize) -> Result<&Body, SimError> {
        let count = self.bodies.len();
        self.bodies.get(index).ok_or(SimError::BodyOutOfBounds { index, count })
    }

    pub fn body_mut(&mut self, index: usize) -> Result<&mut Body, SimError> {
        let count = self.bodies.len();
        self.bodies
            .get_mut(index)
            .ok_or(SimError::BodyOutOfBounds { index, count })
    }

    /// Один шаг на `dt` секунд для всех тел, по порядку индексов.
    pub fn tick(&mut self, dt: f64, params: &SimulationParameters) {
        for body in self.bodies.iter_mut() {
            body.apply_forces(params.friction_coefficient, params.air_resistance_coefficient);
            body.update(dt, params.track_length);
        }
        self.time += dt;
        trace!(dt, time = self.time, "tick");
    }

    /// То же, что [`Simulator::tick`], но тела обрабатываются в пуле rayon (фича parallel).
    #[cfg(feature = "parallel")]
    pub fn tick_par(&mut self, dt: f64, params: &SimulationParameters) {
        use rayon::prelude::*;
        self.bodies.par_iter_mut().for_each(|body| {
            body.apply_forces(params.friction_coefficient, params.air_resistance_coefficient);
            body.update(dt, params.track_length);
        });
        self.time += dt;
        trace!(dt, time = self.time, "parallel tick");
    }

    /// Вернуть все тела на старт с переданными скоростями.
    pub fn reset(&mut self, initial_speeds: &[f64]) -> Result<(), SimError> {
        if initial_speeds.len() != self.bodies.len() {
            return Err(SimError::SpeedCountMismatch {
                expected: self.bodies.len(),
                got: initial_speeds.len(),
            });
        }
        for (body, &speed) in self.bodies.iter_mut().zip(initial_speeds) {
            body.reset(speed);
        }
        self.time = 0.0;
        debug!(bodies = self.bodies.len(), "simulator reset");
        Ok(())
    }

    /// Поставить в конец трека все тела, оказавшиеся на `track_length` или дальше.
    pub fn clamp_to(&mut self, track_length: f64) {
        for body in self.bodies.iter_mut() {
            body.clamp_to(track_length);
        }
    }

    /// Сколько тел ещё не доехало до конца трека.
    pub fn moving_count(&self, track_length: f64) -> usize {
        self.bodies.iter().filter(|b| !b.arrived_at(track_length)).count()
    }

    /// Матрица состояний Nx3 (position, speed, acceleration).
    pub fn state_matrix(&self) -> Vec<[f64; 3]> {
        self.bodies.iter().map(Body::state_array).collect()
    }

    pub fn body_snapshots(&self, track_length: f64) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|b| BodySnapshot {
                label: b.label().to_string(),
                color: b.color().to_string(),
                mass: b.mass(),
                position: b.position(),
                speed: b.speed(),
                acceleration: b.acceleration(),
                arrived: b.arrived_at(track_length),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three() -> Simulator {
        Simulator::new(&[
            BodyConfig::new("A", 10.0, 5.0),
            BodyConfig::new("B", 20.0, 2.0),
            BodyConfig::new("C", 5.0, 0.0),
        ])
    }

    #[test]
    fn tick_advances_each_body_independently() {
        let params = SimulationParameters::default();
        let mut sim = three();
        let mut lone = Body::new("B", "", 20.0, 2.0);

        sim.tick(0.5, &params);
        lone.apply_forces(params.friction_coefficient, params.air_resistance_coefficient);
        lone.update(0.5, params.track_length);

        assert_eq!(sim.bodies()[1], lone);
        assert_relative_eq!(sim.time(), 0.5);
    }

    #[test]
    fn zero_dt_keeps_position_and_speed() {
        let params = SimulationParameters::default();
        let mut sim = three();
        sim.tick(0.25, &params);
        let before = sim.state_matrix();
        sim.tick(0.0, &params);
        for (b, a) in before.iter().zip(sim.state_matrix()) {
            assert_eq!(b[0], a[0]);
            assert_eq!(b[1], a[1]);
        }
    }

    #[test]
    fn reset_requires_one_speed_per_body() {
        let mut sim = three();
        assert_eq!(
            sim.reset(&[1.0]),
            Err(SimError::SpeedCountMismatch { expected: 3, got: 1 })
        );
        sim.tick(1.0, &SimulationParameters::default());
        sim.reset(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sim.state_matrix(), vec![[0.0, 1.0, 0.0], [0.0, 2.0, 0.0], [0.0, 3.0, 0.0]]);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn body_lookup_out_of_bounds() {
        let sim = three();
        assert_eq!(sim.body(3).unwrap_err(), SimError::BodyOutOfBounds { index: 3, count: 3 });
        assert_eq!(sim.body(0).unwrap().label(), "A");
    }

    #[test]
    fn parameter_validation() {
        assert!(SimulationParameters::default().validate().is_ok());
        assert_eq!(
            SimulationParameters::default().with_friction(-0.1).validate(),
            Err(SimError::InvalidCoefficient { name: "friction coefficient", value: -0.1 })
        );
        assert_eq!(
            SimulationParameters::default().with_track_length(0.0).validate(),
            Err(SimError::InvalidTrackLength(0.0))
        );
        assert_eq!(
            SimulationParameters::default().with_time_scale(0.0).validate(),
            Err(SimError::InvalidTimeScale(0.0))
        );
        assert!(SimulationParameters::default().with_air_resistance(f64::NAN).validate().is_err());
    }

    #[test]
    fn snapshots_report_arrival() {
        let params = SimulationParameters::default().with_track_length(1.0);
        let mut sim = three();
        sim.tick(1.0, &params);
        let snaps = sim.body_snapshots(params.track_length);
        assert!(snaps[0].arrived);
        assert!(snaps[1].arrived);
        assert!(!snaps[2].arrived);
        assert_eq!(sim.moving_count(params.track_length), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_tick_matches_sequential() {
        let params = SimulationParameters::default();
        let mut a = three();
        let mut b = three();
        for _ in 0..120 {
            a.tick(1.0 / 60.0, &params);
            b.tick_par(1.0 / 60.0, &params);
        }
        assert_eq!(a.state_matrix(), b.state_matrix());
    }
}
