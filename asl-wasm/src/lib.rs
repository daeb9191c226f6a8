use asl_core::{Recognizer, RecognizerConfig};
use asl_shared::{FrameResult, Gesture, HandPose, Landmark, RecognizerSettings};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Splits a flat `[x0, y0, z0, x1, ...]` array into landmarks.
pub fn landmarks_from_flat(flat: &[f32]) -> Option<Vec<Landmark>> {
    if flat.len() % 3 != 0 {
        return None;
    }
    Some(
        flat.chunks_exact(3)
            .map(|p| Landmark::new(p[0], p[1], p[2]))
            .collect(),
    )
}

/// A chin given as `[x, y]` or `[x, y, z]`.
pub fn chin_from_flat(flat: &[f32]) -> Option<Landmark> {
    match *flat {
        [x, y] => Some(Landmark::new(x, y, 0.0)),
        [x, y, z] => Some(Landmark::new(x, y, z)),
        _ => None,
    }
}

pub fn pose_from_flat(flat: &[f32]) -> Result<HandPose, String> {
    let points = landmarks_from_flat(flat)
        .ok_or_else(|| format!("expected [x, y, z] triples, got {} values", flat.len()))?;
    HandPose::from_slice(&points).map_err(|e| e.to_string())
}

/// What `resolveFrame` hands back to JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub status: &'static str,
    pub gesture: Option<&'static str>,
    pub confidence: f32,
    pub feedback: Option<String>,
    pub message: Option<String>,
}

impl FrameOutcome {
    fn resolved(result: FrameResult) -> Self {
        Self {
            status: "ok",
            gesture: result.gesture.map(|g| g.name()),
            confidence: result.confidence,
            feedback: result.feedback.map(|f| f.to_string()),
            message: None,
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            status: "invalid_input",
            gesture: None,
            confidence: 0.0,
            feedback: None,
            message: Some(message),
        }
    }

    fn to_js(&self) -> Result<JsValue, JsValue> {
        let obj = js_sys::Object::new();
        let set = |key: &str, value: JsValue| js_sys::Reflect::set(&obj, &key.into(), &value);
        set("status", self.status.into())?;
        set("gesture", self.gesture.map_or(JsValue::NULL, JsValue::from))?;
        set("confidence", JsValue::from_f64(self.confidence as f64))?;
        set(
            "feedback",
            self.feedback.as_deref().map_or(JsValue::NULL, JsValue::from),
        )?;
        if let Some(message) = &self.message {
            set("message", message.as_str().into())?;
        }
        Ok(obj.into())
    }
}

fn parse_gesture(name: &str) -> Result<Gesture, String> {
    name.parse::<Gesture>()
        .map_err(|_| format!("unknown gesture {:?}", name))
}

/// Browser-facing recognizer session.
#[wasm_bindgen]
pub struct AslRecognizer {
    recognizer: Recognizer,
}

impl AslRecognizer {
    pub fn with_settings(settings: &RecognizerSettings) -> Self {
        Self {
            recognizer: Recognizer::new(RecognizerConfig::from_settings(settings)),
        }
    }

    /// Frame resolution without any JavaScript values involved.
    pub fn resolve(
        &mut self,
        hand: Option<&[f32]>,
        chin: Option<&[f32]>,
        now_ms: u64,
    ) -> FrameOutcome {
        let chin = chin.and_then(chin_from_flat);
        let points = match hand.map(|flat| (flat.len(), landmarks_from_flat(flat))) {
            None => None,
            Some((_, Some(points))) => Some(points),
            Some((len, None)) => {
                return FrameOutcome::invalid(format!(
                    "expected [x, y, z] triples, got {} values",
                    len
                ))
            }
        };
        match self.recognizer.resolve_frame(points.as_deref(), chin, now_ms) {
            Ok(result) => FrameOutcome::resolved(result),
            Err(e) => FrameOutcome::invalid(e.to_string()),
        }
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }
}

#[wasm_bindgen]
impl AslRecognizer {
    /// Creates a session, optionally from a JSON settings string.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<AslRecognizer, JsValue> {
        let settings = match settings_json.as_deref() {
            Some(json) => RecognizerSettings::from_json(json)
                .map_err(|e| JsValue::from_str(&format!("invalid settings: {}", e)))?,
            None => RecognizerSettings::default(),
        };
        console_log!("ASL recognizer ready ({:?})", settings);
        Ok(Self::with_settings(&settings))
    }

    /// Resolves one frame. `hand` and `chin` are flat coordinate arrays;
    /// without `now_ms` the page clock is used.
    #[wasm_bindgen(js_name = resolveFrame)]
    pub fn resolve_frame(
        &mut self,
        hand: Option<Vec<f32>>,
        chin: Option<Vec<f32>>,
        now_ms: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let now_ms = now_ms.or_else(page_time_ms).unwrap_or(0.0).max(0.0) as u64;
        let outcome = self.resolve(hand.as_deref(), chin.as_deref(), now_ms);
        if let Some(message) = &outcome.message {
            console_log!("Rejected frame at {} ms: {}", now_ms, message);
        }
        outcome.to_js()
    }

    /// Static classification only, no motion or display state involved.
    pub fn classify(&self, hand: Vec<f32>) -> Result<Option<String>, JsValue> {
        let pose = pose_from_flat(&hand).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.recognizer.classify(&pose).map(|g| g.name().to_string()))
    }

    #[wasm_bindgen(js_name = captureSample)]
    pub fn capture_sample(&mut self, gesture: &str, hand: Vec<f32>) -> Result<usize, JsValue> {
        let gesture = parse_gesture(gesture).map_err(|e| JsValue::from_str(&e))?;
        let pose = pose_from_flat(&hand).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.recognizer.capture_sample(gesture, pose))
    }

    #[wasm_bindgen(js_name = sampleCount)]
    pub fn sample_count(&self, gesture: &str) -> Result<usize, JsValue> {
        let gesture = parse_gesture(gesture).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.recognizer.samples().count(gesture))
    }

    pub fn reset(&mut self) {
        self.recognizer.reset();
    }
}

fn page_time_ms() -> Option<f64> {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
}
