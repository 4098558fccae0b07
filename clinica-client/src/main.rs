//! clinica - probe the configured clinic backends and report their health

use clinica_client::{App, ClientConfig, logging};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::path::Path::new("clinica.yaml").exists().then(|| "clinica.yaml".to_string()));

    let config = ClientConfig::load(config_path.as_deref().map(std::path::Path::new)).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        ClientConfig::default()
    });

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let app = App::new(config).unwrap_or_else(|e| {
        tracing::error!("Failed to build client: {}", e);
        std::process::exit(1);
    });

    let report = app.check_connection().await;
    if !report.success {
        tracing::error!(message = %report.message, "Patients backend unreachable");
        std::process::exit(1);
    }
    tracing::info!(message = %report.message, "Patients backend reachable");

    match app.orquestador_store().estado_sistema().await {
        Ok(estado) => {
            let afectados = estado.servicios_afectados();
            if afectados.is_empty() {
                tracing::info!(general = ?estado.general, "All services up");
            } else {
                tracing::warn!(general = ?estado.general, afectados = ?afectados, "Some services are not up");
            }
        }
        Err(e) => tracing::warn!(error = %e.banner(), "System health unavailable"),
    }
}
