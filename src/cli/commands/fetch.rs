//! Fetch command - route one request through the worker

use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{PaviError, PaviResult};
use crate::net::Request;
use crate::routing::FetchHandler;
use crate::strategy::FetchOutcome;
use crate::ui::{self, UiContext};
use crate::worker::OfflineWorker;
use tracing::debug;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> PaviResult<()> {
    let ctx = UiContext::detect();
    let worker = OfflineWorker::from_config(config)?;
    let request = build_request(&args)?;

    let outcome = worker.handle(&request).await;
    // Let a background revalidation finish before the process exits
    worker.drain().await;
    let outcome = outcome?;

    ui::key_value(&ctx, "class", &worker.router().classify(&request).to_string());
    ui::key_value(&ctx, "source", &outcome.to_string());

    let Some(response) = outcome.response() else {
        ui::step_warn_hint(
            &ctx,
            "Offline and not cached",
            "Connect once so the resource can be stored",
        );
        return Ok(());
    };
    ui::key_value(&ctx, "size", &format!("{} bytes", response.body.len()));
    if let Some(content_type) = response.header("content-type") {
        ui::key_value(&ctx, "content-type", content_type);
    }

    if let Some(ref path) = args.output {
        tokio::fs::write(path, &response.body)
            .await
            .map_err(|e| PaviError::io(format!("writing {}", path.display()), e))?;
        debug!("Wrote body to {}", path.display());
    }

    if matches!(outcome, FetchOutcome::Network(ref r) if !r.is_ok()) {
        ui::step_warn(&ctx, &format!("Server answered {}", response.status));
    }
    Ok(())
}

fn build_request(args: &FetchArgs) -> PaviResult<Request> {
    let mut request = Request::parse(&args.url)?;
    if args.navigate {
        request = Request::navigate(request.url);
    }
    request = request.with_method(&args.method);
    if let Some(ref accept) = args.accept {
        request = request.with_accept(accept.as_str());
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::RequestMode;

    fn args(url: &str) -> FetchArgs {
        FetchArgs {
            url: url.to_string(),
            navigate: false,
            accept: None,
            method: "GET".to_string(),
            output: None,
        }
    }

    #[test]
    fn navigate_flag_sets_mode() {
        let mut a = args("https://app.test/");
        a.navigate = true;
        let request = build_request(&a).unwrap();
        assert_eq!(request.mode, RequestMode::Navigate);
        assert!(request.is_get());
    }

    #[test]
    fn method_and_accept_apply() {
        let mut a = args("https://app.test/api");
        a.method = "post".to_string();
        a.accept = Some("text/css".to_string());
        let request = build_request(&a).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.accept.as_deref(), Some("text/css"));
    }

    #[test]
    fn relative_url_rejected() {
        assert!(matches!(
            build_request(&args("/index.html")),
            Err(PaviError::RequestUrl { .. })
        ));
    }
}
