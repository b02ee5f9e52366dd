mod scan;
mod update;

use std::sync::Arc;
use std::time::Duration;

use bandtrack_core::{
    BandParams, BatchConfig, HttpClient, NoopHttpClient, ReqwestHttpClient, RetryConfig,
    YahooAdapter,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Scan(args) => scan::run(cli, args).await,
        Command::Update(args) => update::run(cli, args).await,
    }
}

pub(crate) fn http_client(cli: &Cli) -> Arc<dyn HttpClient> {
    if cli.mock {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    }
}

pub(crate) fn build_source(cli: &Cli) -> YahooAdapter {
    YahooAdapter::with_http_client(http_client(cli))
}

pub(crate) fn batch_config(cli: &Cli) -> Result<BatchConfig, CliError> {
    if cli.period == 0 {
        return Err(CliError::Command(String::from(
            "--period must be at least 1",
        )));
    }
    if !cli.num_std.is_finite() || cli.num_std <= 0.0 {
        return Err(CliError::Command(String::from(
            "--num-std must be a positive number",
        )));
    }

    Ok(BatchConfig {
        batch_size: cli.batch_size,
        request_delay: Duration::from_millis(cli.delay_ms),
        retry: RetryConfig::fixed(Duration::from_millis(cli.retry_delay_ms), cli.max_retries),
        band_params: BandParams {
            period: cli.period,
            num_std: cli.num_std,
        },
    })
}
