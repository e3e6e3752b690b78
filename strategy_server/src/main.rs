use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use strategy_sim::{Comparison, Simulator, StrategySummary, TireCompound};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod types;

use config::ServerConfig;
use error::ApiError;
use types::{CompareIn, CompareOut, CompoundOut, SimulateOut, StrategyIn};

// ---------- Server state ----------

#[derive(Clone)]
struct AppState {
    sim: Simulator,
    cfg: Arc<ServerConfig>,
}

impl AppState {
    fn new(cfg: ServerConfig) -> Self {
        Self {
            sim: cfg.simulator(),
            cfg: Arc::new(cfg),
        }
    }
}

// ---------- Handlers ----------

async fn compounds() -> Json<Vec<CompoundOut>> {
    Json(TireCompound::ALL.into_iter().map(CompoundOut::from).collect())
}

async fn simulate(
    State(state): State<AppState>,
    Json(payload): Json<StrategyIn>,
) -> Result<Json<SimulateOut>, ApiError> {
    let strategy = payload.to_strategy(state.cfg.max_stints).map_err(|e| {
        tracing::warn!("rejected strategy: {}", e);
        e
    })?;

    let (summary, result) = StrategySummary::run("Strategy", &state.sim, &strategy);
    tracing::info!(
        "simulated stints={} laps={} total={:.2}s pits={:?}",
        strategy.stints().len(),
        result.lap_times.len(),
        result.total_time,
        result.pit_laps
    );

    Ok(Json(SimulateOut::new(summary, result)))
}

async fn compare(
    State(state): State<AppState>,
    Json(payload): Json<CompareIn>,
) -> Result<Json<CompareOut>, ApiError> {
    let parse = |label: &str, s: &StrategyIn| {
        s.to_strategy(state.cfg.max_stints).map_err(|e| {
            tracing::warn!("rejected strategy {}: {}", label, e);
            e
        })
    };
    let a = parse("A", &payload.a)?;
    let b = parse("B", &payload.b)?;

    let comparison = Comparison::run(&state.sim, &a, &b);
    tracing::info!(
        "compared A={:.2}s B={:.2}s verdict={:?}",
        comparison.a.total_time,
        comparison.b.total_time,
        comparison.verdict
    );

    let report = comparison.to_string();
    Ok(Json(CompareOut { comparison, report }))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/compounds", get(compounds))
        .route("/simulate", post(simulate))
        .route("/compare", post(compare))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServerConfig::from_env()?;
    tracing::info!(
        "config: pit_time={}s fuel_effect={}s max_stints={}",
        cfg.pit_time_s,
        cfg.fuel_effect_s,
        cfg.max_stints
    );

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let app = router(AppState::new(cfg));

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use serde_json::json;
    use strategy_sim::{SimError, Verdict};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(ServerConfig::default())
    }

    fn body<T: serde::de::DeserializeOwned>(v: serde_json::Value) -> Json<T> {
        Json(serde_json::from_value(v).expect("valid request body"))
    }

    #[tokio::test]
    async fn test_compounds_lists_table() {
        let Json(list) = compounds().await;
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0], json!({ "name": "Soft", "base_lap_time": 90.0, "wear_rate": 0.35 }));
        assert_eq!(json[2]["name"], "Hard");
    }

    #[tokio::test]
    async fn test_simulate_one_stop() {
        let req = json!({ "stints": [{ "laps": 20, "tire": "Soft" }, { "laps": 20, "tire": "Hard" }] });
        let Json(out) = simulate(State(state()), body(req)).await.unwrap();

        assert_eq!(out.lap_times.len(), 40);
        assert_eq!(out.pit_laps, vec![20]);
        assert_eq!(out.stints.len(), 2);
        assert_eq!(out.lap_series.len(), 40);
        assert_eq!(out.lap_series[20], (21, out.lap_times[20]));
        let expected = out.lap_times.iter().sum::<f64>() + 25.0;
        assert!((out.total_time - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_simulate_uses_configured_pit_time() {
        let cfg = ServerConfig { pit_time_s: 0.0, ..ServerConfig::default() };
        let req = json!({ "stints": [{ "laps": 5, "tire": "Medium" }, { "laps": 5, "tire": "Medium" }] });
        let Json(out) = simulate(State(AppState::new(cfg)), body(req)).await.unwrap();
        assert_eq!(out.total_time, out.lap_times[..5].iter().sum::<f64>() + out.lap_times[5..].iter().sum::<f64>());
    }

    #[tokio::test]
    async fn test_simulate_rejects_bad_input() {
        let req = json!({ "stints": [{ "laps": 20, "tire": "Wet" }] });
        let err = simulate(State(state()), body(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(SimError::UnknownCompound(ref n)) if n == "Wet"));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = json!({ "stints": [{ "laps": 0, "tire": "Soft" }] });
        let err = simulate(State(state()), body(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(SimError::InvalidLapCount { .. })));

        let req = json!({ "stints": [] });
        let err = simulate(State(state()), body(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(SimError::EmptyStrategy)));

        let stint = json!({ "laps": 10, "tire": "Soft" });
        let req = json!({ "stints": [stint.clone(), stint.clone(), stint.clone(), stint] });
        let err = simulate(State(state()), body(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(SimError::TooManyStints { count: 4, max: 3 })));
    }

    #[tokio::test]
    async fn test_compare_report() {
        let req = json!({
            "a": { "stints": [{ "laps": 20, "tire": "Soft" }, { "laps": 20, "tire": "Hard" }] },
            "b": { "stints": [{ "laps": 40, "tire": "Hard" }] }
        });
        let Json(out) = compare(State(state()), body(req)).await.unwrap();

        assert_eq!(out.comparison.b.pit_laps, Vec::<u32>::new());
        assert_eq!(
            out.comparison.verdict,
            Verdict::from_totals(out.comparison.a.total_time, out.comparison.b.total_time)
        );
        assert!(out.report.contains("Pit Stops After: 20\n"));
        assert!(out.report.contains("Pit Stops After: None\n"));

        let json = serde_json::to_value(&out).unwrap();
        assert!(json["report"].is_string());
        assert_eq!(json["a_result"]["pit_laps"], json!([20]));
        assert!(json["verdict"]["winner"].is_string());
    }

    #[tokio::test]
    async fn test_compare_rejects_either_side() {
        let req = json!({
            "a": { "stints": [{ "laps": 20, "tire": "Soft" }] },
            "b": { "stints": [{ "laps": 51, "tire": "Hard" }] }
        });
        let err = compare(State(state()), body(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(SimError::InvalidLapCount { laps: 51, .. })));
    }

    #[tokio::test]
    async fn test_router_serves_simulate() {
        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "stints": [{ "laps": 20, "tire": "Soft" }, { "laps": 20, "tire": "Hard" }] }).to_string(),
            ))
            .unwrap();

        let resp = router(state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let out: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(out["pit_laps"], json!([20]));
        assert_eq!(out["lap_times"].as_array().unwrap().len(), 40);
        assert_eq!(out["lap_series"][0][0], json!(1));
        assert_eq!(out["lap_series"][39][0], json!(40));
    }

    #[tokio::test]
    async fn test_router_rejects_unknown_compound() {
        let req = Request::builder()
            .method("POST")
            .uri("/compare")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "a": { "stints": [{ "laps": 20, "tire": "Soft" }] },
                    "b": { "stints": [{ "laps": 20, "tire": "Ultrasoft" }] }
                })
                .to_string(),
            ))
            .unwrap();

        let resp = router(state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let out: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(out["error"].as_str().unwrap().contains("Ultrasoft"));
    }
}
