// Outbound HTTP adapters. Each owns a reqwest client with its own timeout.

pub mod backend;
pub mod viacep;
pub mod weatherapi;

pub use backend::BackendClient;
pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

use reqwest::Client;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}
