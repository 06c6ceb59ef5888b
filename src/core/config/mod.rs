use anyhow::Context;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "crmserver.toml";

/// Environment prefix, e.g. `CRM_SERVER__PORT=9000` or `CRM_DATA__DATA_DIR=/srv/crm`.
pub const ENV_PREFIX: &str = "CRM_";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub sync: SyncConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS; empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

/// Where the four collection files live. File names are relative to `data_dir`
/// unless absolute.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub leads_file: PathBuf,
    pub employees_file: PathBuf,
    pub requests_file: PathBuf,
    pub tasks_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./lib"),
            leads_file: PathBuf::from("leads.json"),
            employees_file: PathBuf::from("data.json"),
            requests_file: PathBuf::from("leadRequests.json"),
            tasks_file: PathBuf::from("tasks.json"),
        }
    }
}

impl DataConfig {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn leads_path(&self) -> PathBuf {
        self.data_dir.join(&self.leads_file)
    }

    pub fn employees_path(&self) -> PathBuf {
        self.data_dir.join(&self.employees_file)
    }

    pub fn requests_path(&self) -> PathBuf {
        self.data_dir.join(&self.requests_file)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.tasks_file)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between background sync passes; 0 disables the poller.
    pub interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { interval_secs: 8 }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file (if present), then `CRM_*` variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, anyhow::Error> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.is_some() && !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        Self::figment(&path)
            .extract()
            .with_context(|| format!("invalid configuration (file {})", path.display()))
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
