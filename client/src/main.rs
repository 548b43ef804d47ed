use anyhow::{Result, anyhow};
use clap::Parser;
use client::Client;
use client::connection::Connection;
use log::{debug, info};
use messages::{Request, Response};
use rand::rngs::OsRng;
use std::sync::Arc;
use templates::Parameters;
use templates::timing::LogTimings;

/// Enrol a reference template with the server, then authenticate a probe
/// and print the squared distance the server recovered.
#[derive(Parser)]
struct Cli {
    server_addr: String,
    /// Reference template, comma separated
    #[clap(long, value_delimiter = ',', required = true)]
    reference: Vec<i64>,
    /// Probe template, comma separated
    #[clap(long, value_delimiter = ',', required = true)]
    probe: Vec<i64>,
    /// Defaults to the length of the reference template
    #[clap(long)]
    template_length: Option<usize>,
    #[clap(long, default_value_t = 255)]
    max_value_template: i64,
    /// Byte length of the client identifier
    #[clap(long, default_value_t = 16)]
    security_parameter: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let parameters = Parameters::new(
        args.template_length.unwrap_or(args.reference.len()),
        args.max_value_template,
        args.security_parameter,
    )?;
    debug!("Using {:?}", parameters);

    let (client, enrolment) =
        Client::enrol_observed(parameters, &args.reference, &mut OsRng, Arc::new(LogTimings))?;

    let mut connection = Connection::connect(&args.server_addr).await?;
    info!("Connected to {}", &args.server_addr);

    match connection.request(&Request::Enrol(enrolment)).await? {
        Response::Enrolled => info!("Enrolled as {}", client.rid()),
        other => return Err(anyhow!("Enrolment refused: {:?}", other)),
    }

    let (message, signature) = client.authenticate(&args.probe, &mut OsRng)?;
    match connection
        .request(&Request::Authenticate { message, signature })
        .await?
    {
        Response::Distance(distance) => println!("Squared distance is {}", distance),
        Response::Rejected(reason) => return Err(anyhow!("Authentication rejected: {:?}", reason)),
        Response::Enrolled => return Err(anyhow!("Unexpected response from server")),
    }

    Ok(())
}
