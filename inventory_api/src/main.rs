use std::sync::Arc;

use inventory_api::rpc::proto::inventory_service_server::InventoryServiceServer;
use inventory_api::rpc::InventoryGrpcService;
use inventory_api::state::AppState;
use inventory_infra::{
    InventoryServiceImpl, PgInventoryRepository, PgMovementRepository, QueryServiceImpl,
};
use shared_config::Config;
use shared_events::{EventSink, LoggingEventSink};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inventory_api=info,tower_http=info")),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let pool = Arc::new(
        shared_db::init_pool(
            &config.database_url,
            config.database_max_connections,
            config.database_statement_timeout_ms,
        )
        .await?,
    );
    shared_db::run_migrations(&pool).await?;

    let inventory_repository = Arc::new(PgInventoryRepository::new(pool.clone()));
    let movement_repository = Arc::new(PgMovementRepository::new(pool.clone()));

    let events: Arc<dyn EventSink> = build_event_sink(&config).await?;

    let inventory_service = Arc::new(InventoryServiceImpl::new(
        pool.clone(),
        inventory_repository.clone(),
        events,
    ));
    let query_service = Arc::new(QueryServiceImpl::new(inventory_repository, movement_repository));

    let state = AppState {
        inventory_service,
        query_service,
        pool: (*pool).clone(),
    };

    let http_addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let router = inventory_api::create_router(state.clone());
    let http_server = axum::serve(tokio::net::TcpListener::bind(http_addr).await?, router);

    let rpc_addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.rpc_port).parse()?;
    let grpc_service = InventoryServiceServer::new(InventoryGrpcService::new(state));
    let rpc_server = tonic::transport::Server::builder()
        .concurrency_limit_per_connection(config.rpc_max_concurrent_requests)
        .add_service(grpc_service)
        .serve(rpc_addr);

    tracing::info!(http_addr = %http_addr, rpc_addr = %rpc_addr, "starting inventory service");

    tokio::try_join!(
        async { http_server.await.map_err(Box::<dyn std::error::Error>::from) },
        async { rpc_server.await.map_err(Box::<dyn std::error::Error>::from) },
    )?;

    Ok(())
}

async fn build_event_sink(
    config: &Config,
) -> Result<Arc<dyn EventSink>, Box<dyn std::error::Error>> {
    #[cfg(feature = "nats")]
    if let Some(nats_url) = &config.nats_url {
        let client = async_nats::connect(nats_url).await?;
        return Ok(Arc::new(shared_events::NatsEventSink::new(
            client,
            "inventory",
        )));
    }

    #[cfg(not(feature = "nats"))]
    let _ = &config.nats_url;

    Ok(Arc::new(LoggingEventSink))
}
