//! Handlers for `serve` and `call`.

use std::path::Path;

use reqwest::Method;
use tracing::info;

use super::{CallArgs, ServeArgs};
use crate::auth::AuthService;
use crate::client::envelope::safe_json;
use crate::client::{ApiClient, RequestOptions};
use crate::config;
use crate::error::{Result, TownError};

/// Handle `townsquare serve`.
pub async fn handle_serve(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let (_, mut proxy) = config::load(config_path)?;
    if let Some(host) = args.host {
        proxy.host = host;
    }
    if let Some(port) = args.port {
        proxy.port = port;
    }
    if let Some(url) = args.backend_url {
        proxy.backend_url = url.trim_end_matches('/').to_string();
    }
    crate::proxy::serve(&proxy).await
}

/// Handle `townsquare call`.
pub async fn handle_call(config_path: Option<&Path>, args: CallArgs) -> Result<()> {
    let (client_config, _) = config::load(config_path)?;
    let api = ApiClient::new(client_config)?;
    let watcher = api.session().watch_session_expired();

    if let Some(email) = &args.email {
        let password = args.password.as_deref().ok_or_else(|| {
            TownError::InvalidArgument("--password is required with --email".to_string())
        })?;
        let user = AuthService::new(api.clone()).login(email, password).await?;
        info!(user_id = user.id, nickname = %user.nickname, "logged in");
    }

    let options = build_options(&args.method, args.data.as_deref())?;
    let resp = api.fetch_raw(&args.path, options).await?;
    let status = resp.status();
    let body: Option<serde_json::Value> = safe_json(resp).await;

    println!("{status}");
    if let Some(body) = body {
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    watcher.abort();
    Ok(())
}

fn build_options(method: &str, data: Option<&str>) -> Result<RequestOptions> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| TownError::InvalidArgument(format!("Invalid HTTP method: {method}")))?;
    let options = RequestOptions::new(method);
    match data {
        Some(data) => {
            let value: serde_json::Value = serde_json::from_str(data)
                .map_err(|e| TownError::InvalidArgument(format!("--data is not JSON: {e}")))?;
            options.json(&value)
        }
        None => Ok(options),
    }
}
