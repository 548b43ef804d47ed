//! Client side of the biometric authentication protocol.
//!
//! ```no_run
//! use client::Client;
//! use messages::{Request, Response};
//! use rand::rngs::OsRng;
//! use templates::Parameters;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let parameters = Parameters::new(3, 10, 16)?;
//! let mut connection = client::connection::Connection::connect("127.0.0.1:4000").await?;
//!
//! let (client, enrolment) = Client::enrol(parameters, &[1, 2, 3], &mut OsRng)?;
//! assert_eq!(connection.request(&Request::Enrol(enrolment)).await?, Response::Enrolled);
//!
//! let (message, signature) = client.authenticate(&[1, 2, 4], &mut OsRng)?;
//! let response = connection
//!     .request(&Request::Authenticate { message, signature })
//!     .await?;
//! assert_eq!(response, Response::Distance(1));
//! # Ok(())
//! # }
//! ```
mod client;
pub mod connection;
pub mod identity;

pub use client::{Client, ClientError};
