//! HTTP server implementation
//!
//! Serverless in production spirit, a plain actix-web server in practice:
//! each request is handled independently with no shared mutable state
//! beyond the read-only configuration.

pub mod error;
pub mod routes;
pub mod state;

pub use error::GatewayError;
pub use state::AppState;

use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use tracing::info;

use crate::config::Config;

/// HTTP server wrapping the gateway routes.
pub struct HttpServer {
    bind_addr: String,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        info!("Creating HTTP server");
        let bind_addr = config.bind_addr();
        let state = AppState::new(config);

        Self { bind_addr, state }
    }

    /// Start serving; resolves only when the server shuts down.
    pub async fn start(self) -> std::io::Result<()> {
        let bind_addr = self.bind_addr;
        let state = web::Data::new(self.state);

        info!("Starting HTTP server on {}", bind_addr);

        ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(cors())
                .wrap(DefaultHeaders::new().add(("Server", "rokubun-gateway")))
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)?
        .run()
        .await
    }
}

/// The client is a static web app served from another origin.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
