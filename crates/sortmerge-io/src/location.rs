//! Locator resolution: bare paths or `file://` URLs.

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

pub fn resolve_path(location: &str) -> Result<PathBuf> {
    if !location.contains("://") {
        return Ok(PathBuf::from(location));
    }
    let url = Url::parse(location).map_err(|e| Error::Location(format!("{location}: {e}")))?;
    if url.scheme() != "file" {
        return Err(Error::Location(format!(
            "unsupported scheme '{}' in {location}",
            url.scheme()
        )));
    }
    url.to_file_path()
        .map_err(|_| Error::Location(format!("{location} is not a local file path")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_paths_pass_through() {
        assert_eq!(resolve_path("data/right.csv").unwrap(), PathBuf::from("data/right.csv"));
    }

    #[test]
    fn file_urls_resolve() {
        assert_eq!(
            resolve_path("file:///tmp/right.csv").unwrap(),
            PathBuf::from("/tmp/right.csv")
        );
    }

    #[test]
    fn remote_schemes_are_rejected() {
        assert!(matches!(resolve_path("s3://bucket/right.csv"), Err(Error::Location(_))));
    }
}
