//! Start-up from a shared result link: `...index.html?UUID=<identifier>`.

use crate::controller::Controller;
use crate::gateway::Gateway;
use crate::session::RequestToken;
use tracing::info;
use url::{Url, form_urlencoded};

pub const IDENTIFIER_PARAM: &str = "UUID";

/// Pull the job identifier out of a launch location. Accepts a full URL,
/// a bare query (`?UUID=...`) or `UUID=...`.
pub fn identifier_from_location(location: &str) -> Option<String> {
    let location = location.trim();
    let found = match Url::parse(location) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == IDENTIFIER_PARAM)
            .map(|(_, value)| value.into_owned()),
        Err(_) => {
            let query = location.split_once('?').map_or(location, |(_, q)| q);
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == IDENTIFIER_PARAM)
                .map(|(_, value)| value.into_owned())
        }
    };
    found
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Retrieve the linked result set, if the location names one. Otherwise the
/// session stays idle and nothing is sent.
pub fn bootstrap<G: Gateway + 'static>(
    controller: &mut Controller<G>,
    location: Option<&str>,
) -> Option<RequestToken> {
    let identifier = location.and_then(identifier_from_location)?;
    info!(%identifier, "Opening linked result");
    Some(controller.retrieve(&identifier))
}
