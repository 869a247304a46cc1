//! Service URL selection and templating.

use url::Url;

use crate::error::{OwsError, OwsResult};

/// Reduce a URL to `host[:port]/path` with no trailing slash, for base
/// comparison.
pub fn parse_for_base_url(url: &str) -> OwsResult<String> {
    let parsed =
        Url::parse(url).map_err(|e| OwsError::Config(format!("Invalid URL '{url}': {e}")))?;

    let mut base = String::new();
    if let Some(host) = parsed.host_str() {
        base.push_str(host);
    }
    if let Some(port) = parsed.port() {
        base.push(':');
        base.push_str(&port.to_string());
    }
    base.push_str(parsed.path());
    Ok(base.trim_end_matches('/').to_string())
}

/// Choose the advertised base URL for a request.
///
/// Returns the allowed URL whose base matches the request's, falling back to
/// the first allowed URL. The trailing slash is stripped; URL templates
/// append their own.
pub fn get_service_base_url(allowed_urls: &[String], request_url: &str) -> OwsResult<String> {
    match allowed_urls {
        [] => Err(OwsError::Config(
            "allowed service URL list is empty".to_string(),
        )),
        [only] => Ok(only.trim_end_matches('/').to_string()),
        urls => {
            let request_base = parse_for_base_url(request_url)?;
            let matched = urls.iter().find(|url| {
                parse_for_base_url(url)
                    .map(|base| base == request_base)
                    .unwrap_or(false)
            });
            Ok(matched
                .unwrap_or(&urls[0])
                .trim_end_matches('/')
                .to_string())
        }
    }
}

/// Fill a user-authored URL template's `{data}` placeholder, e.g. for
/// feature-info custom inclusions.
pub fn feature_info_url_template(data: &str, template: &str) -> String {
    template.replace("{data}", data)
}
