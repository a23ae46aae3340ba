use serde::Deserialize;
use std::{fmt, fs, path::PathBuf};

use crate::error::LoadError;

/// Where a GeoJSON layer is loaded from. Strings starting with `http://` or `https://` are URLs,
/// anything else is a local file path.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "String")]
pub enum FeatureSource {
    File(PathBuf),
    Url(String),
}

impl From<String> for FeatureSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            FeatureSource::Url(value)
        } else {
            FeatureSource::File(PathBuf::from(value))
        }
    }
}

impl From<&str> for FeatureSource {
    fn from(value: &str) -> Self {
        FeatureSource::from(value.to_string())
    }
}

impl fmt::Display for FeatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSource::File(path) => write!(f, "{}", path.display()),
            FeatureSource::Url(url) => write!(f, "{}", url),
        }
    }
}

impl FeatureSource {
    /// Fetch the raw contents of the source. Any IO or HTTP failure means the source is unreachable.
    pub fn fetch(&self) -> Result<String, LoadError> {
        let source_name = self.to_string();
        match self {
            FeatureSource::File(path) => {
                log::debug!("Reading feature source {:?}", path);
                fs::read_to_string(path).map_err(|err| LoadError::unreachable(&source_name, err))
            }
            FeatureSource::Url(url) => {
                log::info!("Downloading feature source {}", url);
                download_text(url).map_err(|err| LoadError::unreachable(&source_name, err))
            }
        }
    }
}

fn download_text(url: &str) -> reqwest::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("traffic-map")
        .build()?;
    client.get(url).send()?.error_for_status()?.text()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use rstest::rstest;
    use testdir::testdir;

    use super::FeatureSource;
    use crate::error::LoadError;

    #[rstest]
    #[case("data/macet.json", FeatureSource::File(PathBuf::from("data/macet.json")))]
    #[case("/tmp/x.geojson", FeatureSource::File(PathBuf::from("/tmp/x.geojson")))]
    #[case("https://example.org/macet.json", FeatureSource::Url("https://example.org/macet.json".to_string()))]
    #[case("http://localhost:8000/a.json", FeatureSource::Url("http://localhost:8000/a.json".to_string()))]
    fn test_feature_source_from_string(#[case] value: &str, #[case] expected: FeatureSource) {
        assert_eq!(FeatureSource::from(value), expected);
    }

    #[test]
    fn test_fetch_reads_local_file() {
        let test_dir = testdir!();
        let filepath = test_dir.join("layer.json");
        fs::write(&filepath, "{}").unwrap();
        let contents = FeatureSource::File(filepath).fetch().unwrap();
        assert_eq!(contents, "{}");
    }

    #[test]
    fn test_fetch_missing_file_is_unreachable() {
        let test_dir = testdir!();
        let result = FeatureSource::File(test_dir.join("missing.json")).fetch();
        assert!(matches!(result, Err(LoadError::Unreachable { .. })));
    }
}
