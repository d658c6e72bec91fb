use std::{net::SocketAddr, sync::Arc};

use analytics_client::HttpUpstream;
use anyhow::{Context, Result};
use view_service::{api, config::AppConfig, metrics_server, observability, planner::PlannerParams, Controller};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let upstream = HttpUpstream::new(&cfg.upstream.base_url)?;
    let controller = Arc::new(Controller::new(Arc::new(upstream), cfg.display.clone()));

    // Initial planner fetch for the configured default selection.
    let params = PlannerParams::new(cfg.planner.default_budget, cfg.planner.default_category)
        .context("invalid [planner] defaults")?;
    let ticket = controller.select_planner(params).await;
    tokio::spawn({
        let controller = controller.clone();
        async move {
            controller.complete_planner(ticket).await;
        }
    });

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %cfg.upstream.base_url, "view service listening");

    axum::serve(listener, api::router(controller).into_make_service()).await?;

    Ok(())
}
