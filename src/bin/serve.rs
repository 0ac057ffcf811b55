//! Serves one network over HTTP. See `mlpnet::api` for the routes.

use std::thread;

use anyhow::{anyhow, Result};
use clap::Parser;
use tiny_http::{Header, Response, Server, StatusCode};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use mlpnet::config::parse_topology;
use mlpnet::api::{read_body, respond, MAX_BODY_BYTES};
use mlpnet::{NetworkService, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Serve a trainable multilayer perceptron over HTTP")]
struct Args {
    /// Comma separated layer widths
    #[arg(short, long, default_value = "2,4,1")]
    topology: String,

    /// Gradient descent step size
    #[arg(short, long, default_value = "0.5")]
    learning_rate: f64,

    /// Epochs run when a request names none
    #[arg(long, default_value = "1000")]
    default_epochs: usize,

    /// Seed for the initial weights
    #[arg(short, long)]
    seed: Option<u64>,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Origin allowed to call the API from a browser
    #[arg(long, default_value = "http://localhost:3000")]
    allowed_origin: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl Args {
    fn config(&self) -> Result<ServiceConfig> {
        Ok(ServiceConfig {
            topology: parse_topology(&self.topology).map_err(|e| anyhow!(e))?,
            learning_rate: self.learning_rate,
            default_epochs: self.default_epochs,
            seed: self.seed,
            bind: self.bind.clone(),
            allowed_origin: self.allowed_origin.clone(),
            ..ServiceConfig::default()
        })
    }
}

/// Headers attached to every response.
#[derive(Clone)]
struct Headers(Vec<Header>);

impl Headers {
    fn new(allowed_origin: &str) -> Result<Self> {
        let pairs: [(&str, &str); 4] = [
            ("Content-Type", "application/json"),
            ("Access-Control-Allow-Origin", allowed_origin),
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
        ];
        let mut headers = Vec::with_capacity(pairs.len());
        for &(name, value) in &pairs {
            let header = Header::from_bytes(name.as_bytes(), value.as_bytes())
                .map_err(|_| anyhow!("invalid header {}: {}", name, value))?;
            headers.push(header);
        }
        Ok(Headers(headers))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.config()?;
    let headers = Headers::new(&config.allowed_origin)?;
    let bind = config.bind.clone();
    let service = NetworkService::new(config)?;

    let server = Server::http(&bind).map_err(|e| anyhow!("failed to bind {}: {}", bind, e))?;
    info!("Server listening on {}", bind);

    for request in server.incoming_requests() {
        let service = service.clone();
        let headers = headers.clone();
        thread::spawn(move || {
            let mut request = request;
            let reply = match read_body(request.as_reader(), MAX_BODY_BYTES) {
                Ok(body) => respond(&service, request.method(), request.url(), &body),
                Err(reply) => reply,
            };
            debug!("{} {} -> {}", request.method(), request.url(), reply.status);
            let mut response =
                Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
            for header in headers.0 {
                response.add_header(header);
            }
            if let Err(e) = request.respond(response) {
                error!("failed to send response: {}", e);
            }
        });
    }
    Ok(())
}
