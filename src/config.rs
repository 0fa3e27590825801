use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub api_addr: String,
    pub model_path: PathBuf,
    pub static_dir: PathBuf,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let api_addr = std::env::var("COVIDSCREEN_API_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let model_path = parse_path_env("COVIDSCREEN_MODEL_PATH", default_model_path);
        let static_dir = parse_path_env("COVIDSCREEN_STATIC_DIR", default_static_dir);

        CoreConfig {
            api_addr,
            model_path,
            static_dir,
        }
    }
}

fn parse_path_env(key: &str, default: fn() -> PathBuf) -> PathBuf {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => default(),
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("models")
        .join("covid_rf_selected_model.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}
