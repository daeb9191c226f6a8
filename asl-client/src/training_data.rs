use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use asl_core::SampleStore;
use asl_shared::{Gesture, HandPose, Landmark};
use serde::{Deserialize, Serialize};

pub const LOAD_PATH: &str = "/api/training-data/load";
pub const SAVE_PATH: &str = "/api/training-data";

/// Body of a sample upload.
///
/// `gesture` is the folder spelling (`I_Me`), since the service builds the
/// sample file name from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleUpload {
    pub gesture: String,
    pub timestamp: String,
    pub landmarks: Vec<Landmark>,
}

impl SampleUpload {
    pub fn new(gesture: Gesture, pose: &HandPose, timestamp: String) -> Self {
        Self {
            gesture: folder_name(gesture),
            timestamp,
            landmarks: pose.landmarks().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    file: Option<String>,
    error: Option<String>,
}

/// Directory name the service files a gesture under.
pub fn folder_name(gesture: Gesture) -> String {
    gesture.name().replace('/', "_")
}

/// Builds a sample store from the `load` response body.
///
/// Entries with an unknown gesture name or a pose that is not 21 landmarks
/// are skipped.
pub fn store_from_json(body: &serde_json::Value) -> Result<SampleStore> {
    let Some(entries) = body.as_object() else {
        bail!("Training data must be an object keyed by gesture name");
    };

    let mut store = SampleStore::new();
    for (name, samples) in entries {
        let gesture = match name.parse::<Gesture>() {
            Ok(gesture) => gesture,
            Err(_) => {
                log::warn!("Skipping samples for unknown gesture {:?}", name);
                continue;
            }
        };
        let Some(samples) = samples.as_array() else {
            log::warn!("Samples for {} are not a list", gesture);
            continue;
        };

        for (i, sample) in samples.iter().enumerate() {
            let pose = serde_json::from_value::<Vec<Landmark>>(sample.clone())
                .map_err(anyhow::Error::from)
                .and_then(|points| HandPose::from_slice(&points).map_err(anyhow::Error::from));
            match pose {
                Ok(pose) => {
                    store.capture(gesture, pose);
                }
                Err(e) => log::warn!("Skipping {} sample {}: {}", gesture, i, e),
            }
        }
    }
    Ok(store)
}

pub struct TrainingDataClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl TrainingDataClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches every stored sample.
    pub fn load_all(&self) -> Result<SampleStore> {
        let url = format!("{}{}", self.base_url, LOAD_PATH);
        log::debug!("Loading training data from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach training-data service at {}", url))?;
        if !response.status().is_success() {
            bail!("Training-data service returned {}", response.status());
        }
        let body: serde_json::Value = response
            .json()
            .context("Training-data response is not JSON")?;
        let store = store_from_json(&body)?;

        let counts: BTreeMap<_, _> = store.counts().collect();
        log::info!("Loaded {} samples: {:?}", store.total(), counts);
        Ok(store)
    }

    /// Uploads one captured pose and returns the path the service saved it to.
    pub fn upload(&self, gesture: Gesture, pose: &HandPose) -> Result<String> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let upload = SampleUpload::new(gesture, pose, millis.to_string());

        let url = format!("{}{}", self.base_url, SAVE_PATH);
        let response = self
            .http
            .post(&url)
            .json(&upload)
            .send()
            .with_context(|| format!("Failed to upload sample to {}", url))?;
        let status = response.status();
        let reply: UploadResponse = response
            .json()
            .with_context(|| format!("Unexpected upload response ({})", status))?;

        match reply {
            UploadResponse {
                success: true,
                file: Some(file),
                ..
            } => {
                log::debug!("Saved {} sample as {}", gesture, file);
                Ok(file)
            }
            UploadResponse {
                error: Some(error), ..
            } => bail!("Training-data service rejected sample: {}", error),
            _ => bail!("Training-data service returned {} without a file", status),
        }
    }
}
