use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use server::Server;
use server::service::Service;
use std::sync::Arc;
use templates::Parameters;
use templates::timing::LogTimings;
use tokio::net::TcpListener;

/// Biometric authentication server. Every client of a deployment must use
/// the same template parameters.
#[derive(Parser)]
struct Cli {
    bind: String,
    #[clap(long)]
    template_length: usize,
    #[clap(long, default_value_t = 255)]
    max_value_template: i64,
    /// Byte length of client identifiers
    #[clap(long, default_value_t = 16)]
    security_parameter: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let parameters = Parameters::new(
        args.template_length,
        args.max_value_template,
        args.security_parameter,
    )?;
    debug!("Using {:?}", parameters);

    let server = Server::with_observer(parameters, Arc::new(LogTimings))?;

    let listener = TcpListener::bind(&args.bind).await?;
    info!("Successfully started server on {}", &args.bind);

    let mut service = Service::new(listener, Arc::new(server));
    service.run().await?;
    Ok(())
}
