use axum::{
    Json, Router,
    body::Body,
    http::{HeaderName, Request, Response, StatusCode, Uri},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{net::SocketAddr, time::Duration};

use checkout_pricing::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    response::{ApiResponse, Meta},
    routes::{create_api_router, doc::scalar_docs, health},
    state::AppState,
};

const REQUEST_ID: &str = "x-request-id";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkout_pricing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    tracing::info!(
        home_country = %config.pricing.home_country,
        default_zone_fee = config.pricing.default_zone_fee,
        default_zone_days = config.pricing.default_zone_days,
        "pricing configured"
    );
    let state = AppState::new(orm, config.pricing.clone(), &config.jwt_secret);

    let request_id_header = HeaderName::from_static(REQUEST_ID);
    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(scalar_docs())
        .fallback(not_found)
        .layer(http_trace_layer())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> tracing::Span,
    fn(&Request<Body>, &tracing::Span),
    fn(&Response<Body>, Duration, &tracing::Span),
>;

fn http_trace_layer() -> HttpTraceLayer {
    fn make_span(request: &Request<Body>) -> tracing::Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id(request)
        )
    }

    fn on_request(request: &Request<Body>, _span: &tracing::Span) {
        tracing::info!(
            request_id = %request_id(request),
            method = %request.method(),
            uri = %request.uri(),
            "request started"
        );
    }

    fn on_response(response: &Response<Body>, latency: Duration, _span: &tracing::Span) {
        tracing::info!(
            status = %response.status(),
            ms = %latency.as_millis(),
            "request finished"
        );
    }

    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request<Body>) -> tracing::Span)
        .on_request(on_request as fn(&Request<Body>, &tracing::Span))
        .on_response(on_response as fn(&Response<Body>, Duration, &tracing::Span))
}

/// Resolves on Ctrl+C or SIGTERM so in-flight coupon applications can commit.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
