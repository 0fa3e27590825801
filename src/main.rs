// COVIDSCREEN - Core Service
// Carga el modelo una vez y sirve la API de prediccion

mod config;
mod http;
mod model;
mod predict;

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::config::CoreConfig;
use crate::http::ApiState;
use crate::model::Model;

fn main() {
    let _ = env_logger::try_init();

    if let Err(error) = run_console() {
        eprintln!("[COVIDSCREEN] {}", error);
    }
}

fn run_console() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                eprintln!("[COVIDSCREEN] Failed to listen for shutdown: {}", error);
            }
            let _ = shutdown_tx.send(());
        });

        run_until_shutdown(shutdown_rx).await;
    });

    Ok(())
}

async fn run_until_shutdown(shutdown_rx: oneshot::Receiver<()>) {
    let config = CoreConfig::from_env();

    // Loaded exactly once; absence degrades /predict to 500, never fatal.
    let model = match Model::load(&config.model_path) {
        Ok(model) => {
            log::info!("Model loaded successfully");
            Some(Arc::new(model))
        }
        Err(error) => {
            log::error!("Error loading model: {}", error);
            None
        }
    };

    let state = ApiState {
        model,
        static_dir: config.static_dir.clone(),
    };

    let api_addr = config.api_addr.clone();
    let api_handle = tokio::spawn(async move {
        if let Err(error) = crate::http::serve(api_addr, state).await {
            eprintln!("[API] Server error: {}", error);
        }
    });

    let _ = shutdown_rx.await;
    api_handle.abort();
}
