use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenegenConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub hashtags: HashtagConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Absent means wait for as long as the service takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// Which hashtag input the form opens with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HashtagInput {
    #[default]
    Picker,
    FreeText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagConfig {
    #[serde(default)]
    pub input: HashtagInput,

    /// Catalogue offered by the picker.
    #[serde(default = "default_hashtag_options")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_top_n() -> usize {
    crate::ranking::DEFAULT_TOP_N
}
fn default_hashtag_options() -> Vec<String> {
    [
        "#footmassager",
        "#neckmassager",
        "#backmassager",
        "#shouldermassager",
        "#legmassager",
        "#handmassager",
        "#heatedmassager",
        "#mysterybag",
        "#wranglerbag",
        "#topplanet",
        "#toplanet",
        "#MassageTherapy",
        "#Relaxation",
        "#StressRelief",
        "#Wellness",
        "#Health",
        "#SelfCare",
        "#PainRelief",
        "#Recovery",
        "#DeepTissueMassage",
        "#MassageAtHome",
        "#FeelBetter",
        "#MindBodySoul",
        "#BodyMassage",
        "#TherapeuticMassage",
        "#SpaDay",
        "Massage Devices",
        "Massager",
        "Massage Tools",
        "Home Massage",
        "Electric Massager",
        "Portable Massager",
        "Foot Massager",
        "Back Massager",
        "Neck Massager",
        "Shoulder Massager",
        "Hand Massager",
        "Leg Massager",
        "Heated Massager",
        "#FashionBags",
        "#StylishBags",
        "#BagTrends",
        "#BagLovers",
        "#BagCollection",
        "#DesignerBags",
        "#BagFashion",
        "#BagOfTheDay",
        "#BagAddict",
        "#Bags",
        "#Backpack",
        "#Handbag",
        "#ToteBag",
        "#ShoulderBag",
        "#CanvasBag",
        "#bagtrends",
        "#baglovers",
        "#summerbags",
        "fashion bags",
        "stylish bags",
        "trendy bags",
        "designer bags",
        "luxury bags",
        "affordable bags",
        "quality bags",
        "latest bag trends",
        "handbag",
        "tote bag",
        "shoulder bag",
        "crossbody bag",
        "clutch bag",
        "travel bag",
        "gym bag",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for HashtagConfig {
    fn default() -> Self {
        Self {
            input: HashtagInput::default(),
            options: default_hashtag_options(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl ScenegenConfig {
    /// Load config from ~/.config/scenegen/config.toml, creating defaults if missing.
    pub fn load() -> crate::error::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = ScenegenConfig::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::error::ScenegenError::Config(format!(
                "Failed to read config {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            crate::error::ScenegenError::Config(format!("Failed to parse config: {e}"))
        })
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            crate::error::ScenegenError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> crate::error::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            crate::error::ScenegenError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("scenegen").join("config.toml"))
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.service
            .timeout_seconds
            .map(std::time::Duration::from_secs)
    }
}
