#![cfg(target_arch = "wasm32")]

use crate::engine::Engine;
use crate::models::track::{demo_configs, panel_title, slider_ranges, SliderRange};
use crate::sim::{BodyConfig, SimulationParameters};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_name = "sessionDefaults")]
pub fn session_defaults() -> JsValue {
    let defaults = SessionConfig {
        bodies: Some(demo_configs()),
        params: Some(SimulationParameters::default()),
    };
    serde_wasm_bindgen::to_value(&defaults).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen(js_name = "sliderRanges")]
pub fn slider_ranges_js() -> js_sys::Array {
    let out = js_sys::Array::new();
    for (name, range) in slider_ranges() {
        out.push(&slider_range_to_js(name, range));
    }
    out
}

fn slider_range_to_js(name: &str, range: &SliderRange) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(name));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("min"), &JsValue::from_f64(range.min));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("max"), &JsValue::from_f64(range.max));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("step"), &JsValue::from_f64(range.step));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("default"),
        &JsValue::from_f64(range.default),
    );
    JsValue::from(obj)
}

#[wasm_bindgen]
pub struct WasmSim {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmSim {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSim {
        WasmSim { engine: Engine::new_demo() }
    }

    /// Build a session from a config object:
    /// {
    ///   bodies?: [{ label?: string, color?: string, mass: number, speed?: number }],
    ///   params?: { frictionCoefficient?, airResistanceCoefficient?, trackLength?, timeScale? }
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmSim, JsValue> {
        let cfg: SessionConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
        let bodies = cfg.bodies.unwrap_or_else(demo_configs);
        let params = cfg.params.unwrap_or_default();
        let engine = Engine::new(bodies, params).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmSim { engine })
    }

    pub fn len(&self) -> usize { self.engine.len() }

    pub fn is_empty(&self) -> bool { self.engine.is_empty() }

    pub fn start(&mut self) { self.engine.start(); }

    pub fn pause(&mut self) { self.engine.pause(); }

    pub fn reset(&mut self) { self.engine.reset(); }

    /// "idle", "running" or "paused".
    pub fn state(&self) -> String { self.engine.state().as_str().to_string() }

    /// `requestAnimationFrame` callback; true means schedule another frame.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool { self.engine.frame(timestamp_ms) }

    pub fn key(&mut self, key: &str) -> bool { self.engine.key(key) }

    pub fn set_params(
        &mut self,
        friction: f64,
        air_resistance: f64,
        track_length: f64,
        time_scale: f64,
    ) -> Result<(), JsValue> {
        let params = SimulationParameters::default()
            .with_friction(friction)
            .with_air_resistance(air_resistance)
            .with_track_length(track_length)
            .with_time_scale(time_scale);
        self.engine
            .set_params(params)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_body(&mut self, index: usize, speed: f64, mass: f64) -> Result<(), JsValue> {
        self.engine
            .set_body(index, speed, mass)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `[position, speed, acceleration]` per body.
    pub fn states(&self) -> Vec<f32> { self.engine.states_flat() }

    pub fn snapshots(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.engine.snapshots()).unwrap_or(JsValue::NULL)
    }

    pub fn labels(&self) -> js_sys::Array {
        self.engine.configs().iter().map(|c| JsValue::from_str(&c.label)).collect()
    }

    pub fn colors(&self) -> js_sys::Array {
        self.engine.configs().iter().map(|c| JsValue::from_str(&c.color)).collect()
    }

    pub fn titles(&self) -> js_sys::Array {
        self.engine.configs().iter().map(|c| JsValue::from_str(&panel_title(c))).collect()
    }

    /// Two readout lines per body, flattened.
    pub fn readouts(&self) -> js_sys::Array {
        let out = js_sys::Array::new();
        for [speed, distance] in self.engine.readouts() {
            out.push(&JsValue::from_str(&speed));
            out.push(&JsValue::from_str(&distance));
        }
        out
    }

    /// Marker centers `[x0, y0, x1, y1, ...]` in canvas pixels.
    pub fn marker_positions(&self, width: f64, height: f64) -> Vec<f64> {
        self.engine
            .marker_positions(width, height)
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Default for WasmSim {
    fn default() -> Self { Self::new() }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionConfig {
    #[serde(default)]
    bodies: Option<Vec<BodyConfig>>,
    #[serde(default)]
    params: Option<SimulationParameters>,
}
