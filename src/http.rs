use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::model::Model;
use crate::predict::{self, PredictError};

#[derive(Clone)]
pub struct ApiState {
    pub model: Option<Arc<Model>>,
    pub static_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: f64,
    status: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn serve(addr: String, state: ApiState) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr: SocketAddr = addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict_route))
        .with_state(state)
        .layer(cors_layer())
}

async fn home(State(state): State<ApiState>) -> Response {
    let page = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&page).await {
        Ok(content) => Html(content).into_response(),
        Err(error) => {
            log::error!("Error rendering index.html: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load page: {}", error),
                }),
            )
                .into_response()
        }
    }
}

async fn predict_route(State(state): State<ApiState>, body: Bytes) -> Response {
    match run_predict(&state, &body) {
        Ok(proba) => {
            log::info!("Prediction successful: Probability = {:.2}", proba);
            (
                StatusCode::OK,
                Json(PredictResponse {
                    prediction: proba,
                    status: "success".to_string(),
                    message: format!("Likelihood of COVID-19 positive: {:.2}", proba),
                }),
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn run_predict(state: &ApiState, body: &[u8]) -> Result<f64, PredictError> {
    let model = state
        .model
        .as_ref()
        .ok_or(PredictError::ModelUnavailable)?;

    let payload = predict::parse_payload(body)?;
    log::debug!("Received input: {:?}", payload);

    let row = predict::validate(&payload)?;
    model
        .predict_proba(&row)
        .map_err(|error| PredictError::Inference(error.to_string()))
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            log::error!("{}", message);
        } else {
            log::warn!("{}", message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn cors_layer() -> CorsLayer {
    let allowed = std::env::var("COVIDSCREEN_CORS_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:5000,http://127.0.0.1:5000".to_string());

    let mut cors = if allowed.trim() == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = allowed
            .split(',')
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors = cors.allow_methods([Method::GET, Method::POST]);
    cors.allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
