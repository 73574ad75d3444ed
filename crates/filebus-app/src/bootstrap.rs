use std::future::Future;
use std::sync::Arc;

use filebus_config::{DispatchConfig, LogFormatSetting, LoggingSettings};
use filebus_dispatch::{DispatchSettings, Dispatcher, OperationBackend, SessionBus};
use filebus_jobs::{JobBus, JobFactory};
use filebus_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, record_bus_name};
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::{debug, info, warn};
use zbus::Connection;

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the dispatcher.
pub(crate) struct BootstrapDependencies {
    config: DispatchConfig,
    engine: Arc<dyn JobFactory>,
}

impl BootstrapDependencies {
    /// Load configuration from the file and environment layers for the engine's entrypoint.
    pub(crate) async fn from_env(engine: Arc<dyn JobFactory>) -> AppResult<Self> {
        let config = filebus_config::load()
            .await
            .map_err(|err| AppError::config("config.load", err))?;
        Ok(Self { config, engine })
    }
}

/// Entry point for the dispatcher boot sequence.
///
/// Serves `org.filebus.Operations` on the session bus with jobs built by `engine`, and returns
/// once SIGINT or SIGTERM arrives and the well-known name has been released.
///
/// # Errors
///
/// Returns an error if configuration or logging cannot be set up, the session bus is
/// unreachable, the dispatcher path or name is already taken, or signal handlers cannot be
/// installed.
pub async fn run_app(engine: Arc<dyn JobFactory>) -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env(engine).await?;
    Box::pin(run_app_with(dependencies, shutdown_signal())).await
}

/// Boot sequence that relies on injected dependencies and an injected shutdown trigger.
pub(crate) async fn run_app_with<S>(
    dependencies: BootstrapDependencies,
    shutdown: S,
) -> AppResult<()>
where
    S: Future<Output = AppResult<()>>,
{
    let BootstrapDependencies { config, engine } = dependencies;

    filebus_telemetry::init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("dispatcher");

    info!(
        destination = config.bus.destination.as_str(),
        object_path = config.bus.object_path.as_str(),
        confirmation = config.confirmation.as_str(),
        "filebus dispatcher bootstrap starting"
    );

    let connection = Connection::session()
        .await
        .map_err(|source| AppError::BusConnect { source })?;
    let bus: Arc<dyn JobBus> = Arc::new(SessionBus::new(connection.clone()));

    publish(&connection, &config, bus, engine).await?;
    claim_name(&connection, &config).await?;
    record_bus_name(config.bus.destination.as_str());
    info!("dispatcher ready");

    let outcome = shutdown.await;
    let released = release_name(&connection, &config).await;
    outcome?;
    released?;
    info!("dispatcher shutdown complete");
    Ok(())
}

/// Register the operations interface at the configured object path.
pub(crate) async fn publish(
    connection: &Connection,
    config: &DispatchConfig,
    bus: Arc<dyn JobBus>,
    engine: Arc<dyn JobFactory>,
) -> AppResult<()> {
    let object_path = config.bus.object_path.as_str();
    let dispatcher = Dispatcher::new(bus, engine, DispatchSettings::from_config(config));
    let registered = connection
        .object_server()
        .at(object_path, OperationBackend::new(dispatcher))
        .await
        .map_err(|source| AppError::Serve {
            object_path: object_path.to_string(),
            source,
        })?;
    if !registered {
        return Err(AppError::AddressInUse {
            object_path: object_path.to_string(),
        });
    }
    debug!(object_path, "operations interface registered");
    Ok(())
}

async fn claim_name(connection: &Connection, config: &DispatchConfig) -> AppResult<()> {
    let name = config.bus.destination.as_str();
    connection
        .request_name(name)
        .await
        .map_err(|err| AppError::name_request("bus.request_name", name, err))
}

async fn release_name(connection: &Connection, config: &DispatchConfig) -> AppResult<()> {
    let name = config.bus.destination.as_str();
    let released = connection
        .release_name(name)
        .await
        .map_err(|err| AppError::name_request("bus.release_name", name, err))?;
    if !released {
        warn!(name, "bus name was not owned at shutdown");
    }
    Ok(())
}

async fn shutdown_signal() -> AppResult<()> {
    let mut terminate = signal::unix::signal(SignalKind::terminate())
        .map_err(|err| AppError::io("signal.terminate", err))?;
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(|err| AppError::io("signal.ctrl_c", err))?;
            info!("received SIGINT, shutting down");
        }
        _ = terminate.recv() => {
            info!("received SIGTERM, shutting down");
        }
    }
    Ok(())
}

fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &settings.level,
        format: log_format(settings.format),
        ..LoggingConfig::default()
    }
}

const fn log_format(setting: Option<LogFormatSetting>) -> LogFormat {
    match setting {
        Some(LogFormatSetting::Json) => LogFormat::Json,
        Some(LogFormatSetting::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    }
}
