use crate::application::comparison_service::DEFAULT_ANNOTATION_TEMPLATE;
use crate::application::similarity::SimilarityIndex;
use crate::domain::patient::{PatientId, PatientProfile};
use crate::domain::plot::LayoutSettings;
use crate::domain::styling::Palette;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const ENV_PREFIX: &str = "APNOE";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PatientsConfig {
    #[serde(default)]
    pub patients: Vec<PatientProfile>,
    #[serde(default)]
    pub similarity: Vec<SimilarityEntry>,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default = "default_annotation_template")]
    pub annotation_template: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimilarityEntry {
    pub patient: PatientId,
    #[serde(default)]
    pub similar: Vec<PatientId>,
}

fn default_annotation_template() -> String {
    DEFAULT_ANNOTATION_TEMPLATE.to_string()
}

impl PatientsConfig {
    pub fn similarity_index(&self) -> SimilarityIndex {
        SimilarityIndex::new(
            self.similarity
                .iter()
                .map(|e| (e.patient.clone(), e.similar.clone())),
        )
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.palette.clone())
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_patients_config() -> anyhow::Result<PatientsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/patients"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a template string
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
