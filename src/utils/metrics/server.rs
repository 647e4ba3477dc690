//! Status server module
//!
//! This module provides an HTTP server exposing the watcher status, the stored
//! transaction histories and Prometheus metrics for scraping.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;
use tracing::{error, info};

use crate::{
	models::ChainKind,
	repositories::KeyValueStore,
	services::status::StatusService,
	utils::metrics::gather_metrics,
};

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Status endpoint handler
async fn status_handler<S: KeyValueStore + 'static>(
	status_service: web::Data<StatusService<S>>,
) -> impl Responder {
	match status_service.get_status().await {
		Ok(status) => HttpResponse::Ok().json(status),
		Err(e) => HttpResponse::InternalServerError().json(json!({ "error": e.to_string() })),
	}
}

/// Transaction history endpoint handler
async fn transactions_handler<S: KeyValueStore + 'static>(
	status_service: web::Data<StatusService<S>>,
	chain: web::Path<String>,
) -> impl Responder {
	let Some(chain) = ChainKind::from_tag(&chain) else {
		return HttpResponse::NotFound().json(json!({ "error": format!("Unknown chain: {}", chain) }));
	};
	match status_service.transactions(chain).await {
		Ok(history) => HttpResponse::Ok().json(history),
		Err(e) => HttpResponse::InternalServerError().json(json!({ "error": e.to_string() })),
	}
}

/// Registers the status routes on an actix app
pub fn configure_routes<S: KeyValueStore + 'static>(cfg: &mut web::ServiceConfig) {
	cfg.route("/status", web::get().to(status_handler::<S>))
		.route("/transactions/{chain}", web::get().to(transactions_handler::<S>))
		.route("/metrics", web::get().to(metrics_handler));
}

// Create status server
pub fn create_status_server<S: KeyValueStore + 'static>(
	bind_address: String,
	status_service: StatusService<S>,
) -> std::io::Result<actix_web::dev::Server> {
	let actual_bind_address = if std::env::var("IN_DOCKER").unwrap_or_default() == "true" {
		if let Some(port) = bind_address.split(':').nth(1) {
			format!("0.0.0.0:{}", port)
		} else {
			"0.0.0.0:8081".to_string()
		}
	} else {
		bind_address.clone()
	};

	info!(
		"Starting status server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	let status_data = web::Data::new(status_service);
	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(status_data.clone())
			.configure(configure_routes::<S>)
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
