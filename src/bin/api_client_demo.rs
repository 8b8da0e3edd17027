//! api-client-demo — call the example API through a client whose base URLs
//! can be switched remotely.
//!
//! Usage:
//!   api-client-demo something [--base-url <url>]
//!   api-client-demo another-thing <param1> <param2> [--base-url <url>]
//!
//! `--base-url` applies to that one call only (per-call override).

use anyhow::{bail, Context};
use dynamic_api_client::api::ExampleApi;
use dynamic_api_client::interceptors::TracingInterceptor;
use dynamic_api_client::remote_config::{
    self, ConfigSource, FlagrSource, RemoteConfigStore, StaticSource,
};
use dynamic_api_client::{ApiClient, CallContext, ClientConfig, HttpClient};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let config = ClientConfig::from_env();
    let api = build_api(&config)?;
    let context = match flag_value(&args[2..], "--base-url") {
        Some(url) => CallContext::overrides(json!({ "baseURL": url })),
        None => CallContext::None,
    };

    let response = match args[1].as_str() {
        "something" => api.get_something(&context).await,
        "another-thing" => {
            let positional = positional_args(&args[2..], &["--base-url"]);
            if positional.len() < 2 {
                bail!("another-thing needs <param1> <param2>");
            }
            api.get_another_thing(&context, positional[0], positional[1]).await
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
    .context("request failed")?;

    println!("{}", serde_json::to_string_pretty(&response.data)?);
    Ok(())
}

fn build_api(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    let source: Arc<dyn ConfigSource> = if config.flagr_url.is_some() {
        Arc::new(FlagrSource::from_config(config)?)
    } else {
        tracing::info!("FLAGR_URL not set; remote base URLs disabled");
        Arc::new(StaticSource::default())
    };
    let store = Arc::new(RemoteConfigStore::new(source, config.min_fetch_interval));

    let builder = HttpClient::builder()
        .config(config.clone())
        .request_interceptor(Arc::new(TracingInterceptor))
        .response_interceptor(Arc::new(TracingInterceptor));
    let client = remote_config::install(builder, store).build()?;
    Ok(ApiClient::new(Arc::new(client)))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Arguments left after removing each flag in `value_flags` and its value.
fn positional_args<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if value_flags.contains(&arg.as_str()) {
            iter.next();
        } else {
            positional.push(arg.as_str());
        }
    }
    positional
}

fn print_usage() {
    println!(
        r#"api-client-demo — example API calls with remotely configured base URLs

USAGE:
    api-client-demo <COMMAND> [OPTIONS]

COMMANDS:
    something                         GET /something
    another-thing <param1> <param2>   GET /another-thing
    help                              Show this help message

OPTIONS:
    --base-url <url>                  Override the base URL for this call

ENVIRONMENT:
    API_BASE_URL                      Default base URL
    API_HTTP_TIMEOUT_SECS             Transport timeout (default 30)
    FLAGR_URL                         Flagr API for remote base URLs
    FLAGR_FLAG_ID                     Flag holding the config (default 12)
    RUST_LOG                          Log filter (default info)"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_args_skip_flag_values() {
        let before = args(&["--base-url", "https://eu", "a", "b"]);
        assert_eq!(positional_args(&before, &["--base-url"]), vec!["a", "b"]);

        let after = args(&["a", "b", "--base-url", "https://eu"]);
        assert_eq!(positional_args(&after, &["--base-url"]), vec!["a", "b"]);

        let between = args(&["a", "--base-url", "https://eu", "b"]);
        assert_eq!(positional_args(&between, &["--base-url"]), vec!["a", "b"]);
    }

    #[test]
    fn test_flag_value_lookup() {
        let list = args(&["a", "--base-url", "https://eu", "b"]);
        assert_eq!(flag_value(&list, "--base-url"), Some("https://eu"));
        assert_eq!(flag_value(&args(&["a", "b"]), "--base-url"), None);
    }
}
