//! Pushgateway destination URL.
use std::fmt::Write;

use hyper::Uri;
use pgw_model::PublishConfig;

use crate::error::PublishError;

/// Build the push URL `{scheme}://{host}:{port}/metrics/job/{job}[/instance/{instance}]`.
///
/// # Errors
/// [`PublishError::InvalidConfiguration`] if the pieces do not compose into a valid URL,
/// for example an empty host or a job containing characters not allowed in a URL path.
pub fn build_push_url(config: &PublishConfig) -> Result<Uri, PublishError> {
    if config.host.trim().is_empty() {
        return Err(PublishError::InvalidConfiguration(
            "pushgateway host must not be empty".to_string(),
        ));
    }
    if config.job.is_empty() {
        return Err(PublishError::InvalidConfiguration(
            "job must not be empty".to_string(),
        ));
    }

    let mut raw = format!(
        "{}://{}:{}/metrics/job/{}",
        config.scheme(),
        config.host,
        config.port,
        config.job
    );
    if !config.instance.is_empty() {
        let _ = write!(raw, "/instance/{}", config.instance);
    }

    let uri: Uri = raw.parse().map_err(|e| {
        PublishError::InvalidConfiguration(format!("cannot build push url from '{raw}': {e}"))
    })?;

    // A host carrying path or userinfo characters still parses, but into a different authority.
    if uri.host() != Some(config.host.as_str()) {
        return Err(PublishError::InvalidConfiguration(format!(
            "host '{}' does not form a valid url authority",
            config.host
        )));
    }
    Ok(uri)
}
