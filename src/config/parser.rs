use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a TOML file and returns the validated configuration
///
/// Missing sections and keys fall back to their defaults, so an empty file
/// is a valid configuration.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Like [`load_config`], also returning the fingerprint of the file text
///
/// The file is read once; the fingerprint always matches the parsed text.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, compute_config_hash(&text)))
}

/// Deserializes configuration text and runs validation on it
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config = toml::from_str::<Config>(text)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of configuration text, logged so runs can be told apart
pub fn compute_config_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_START_URL;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", text).unwrap();
        file
    }

    #[test]
    fn test_every_section_read() {
        let file = write_toml(
            r#"
[crawler]
start-url = "https://example.com/listado/0"
parallelism = 4
random-delay-ms = 500
request-timeout-secs = 10
revisit-listing-pages = true

[user-agent]
name = "TestCrawler"
version = "1.0"

[output]
csv-path = "./out.csv"
"#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.start_url, "https://example.com/listado/0");
        assert_eq!(config.crawler.parallelism, 4);
        assert_eq!(config.crawler.random_delay_ms, 500);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert!(config.crawler.revisit_listing_pages);
        assert_eq!(config.crawler.max_retries, 0);
        assert_eq!(config.user_agent.name, "TestCrawler");
        assert_eq!(config.output.csv_path, "./out.csv");
    }

    #[test]
    fn test_empty_text_gives_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.start_url, DEFAULT_START_URL);
        assert_eq!(config.crawler.parallelism, 6);
        assert_eq!(config.crawler.random_delay_ms, 2000);
        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.output.csv_path, "propiedades.csv");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/casa-ripple.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_broken_toml_is_parse_error() {
        let result = parse_config("[crawler\nparallelism = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let file = write_toml("[crawler]\nparallelism = 0\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_hash_follows_file_text() {
        let file = write_toml("[output]\ncsv-path = \"a.csv\"\n");
        let (_, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, compute_config_hash("[output]\ncsv-path = \"a.csv\"\n"));
        assert_ne!(hash, compute_config_hash("[output]\ncsv-path = \"b.csv\"\n"));
    }
}
