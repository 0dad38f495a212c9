use std::fmt::{self, Display, Formatter};

use url::Url;

use crate::error::PayRelayError;

/// Relative API path, kept as raw segments until it is joined onto the base url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

// `.` and `..` would be dropped or collapsed when pushed onto a url
fn is_valid_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

impl ApiPath {
    /// Parses a template such as `/invoice/create`. Leading, trailing and repeated
    /// slashes are ignored.
    pub fn parse(template: &str) -> Result<Self, PayRelayError> {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();

        if segments.is_empty() || !segments.iter().all(|s| is_valid_segment(s)) {
            return Err(PayRelayError::InvalidPath(template.to_owned()));
        }

        Ok(Self { segments })
    }

    /// Builds a path from segments that are used as-is, so an id containing `/`
    /// stays one segment.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PayRelayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments.into_iter().map(Into::into).collect::<Vec<String>>();

        if segments.is_empty() || !segments.iter().all(|s| is_valid_segment(s)) {
            return Err(PayRelayError::InvalidPath(segments.join("/")));
        }

        Ok(Self { segments })
    }

    pub fn join_onto(&self, base: &Url) -> Result<Url, PayRelayError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| PayRelayError::InvalidBaseUrl(base.to_string()))?
            .pop_if_empty()
            .extend(&self.segments);
        Ok(url)
    }
}

impl Display for ApiPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
