//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
  _____
 |_   _|_ _  __ _ _____      _____  ___ _ __
   | |/ _` |/ _` / __\ \ /\ / / _ \/ _ \ '_ \
   | | (_| | (_| \__ \\ V  V /  __/  __/ |_) |
   |_|\__,_|\__, |___/ \_/\_/ \___|\___| .__/
            |___/                      |_|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, backend: &str, downstream: Option<&str>) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:    http://{}/api/v1", addr);
    info!("Webhook:     http://{}/api/v1/invalidations", addr);
    info!("Health:      http://{}/health", addr);
    info!("API Docs:    http://{}/swagger-ui", addr);
    info!("Store:       {}", backend);
    info!("Downstream:  {}", downstream.unwrap_or("none (purges are logged only)"));
    info!("{}", separator);
}
