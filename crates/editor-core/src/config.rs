/// Per-buffer settings, passed in explicitly by whoever opens the buffer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BufferConfig {
    /// Rows of sixteen bytes projected into the view window.
    pub row_count: usize,
    /// Encoding for the text pane and for typed characters.
    pub encoding: renderer::TextEncoding,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            row_count: 30,
            encoding: renderer::TextEncoding::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("row-count must be at least 1")]
    ZeroRows,
}

impl BufferConfig {
    /// Loads a JSON config file. A missing file yields the defaults, so a
    /// fresh install needs no config at all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, is not
    /// valid JSON for this shape, or fails [`BufferConfig::validate`].
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;

        Ok(config)
    }

    /// # Errors
    ///
    /// [`ConfigError::ZeroRows`] when no row would ever be shown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_count == 0 {
            return Err(ConfigError::ZeroRows);
        }

        Ok(())
    }

    /// Bytes the view window collects before it stops reading.
    #[inline]
    #[must_use]
    pub fn window_capacity(&self) -> usize {
        self.row_count.saturating_mul(renderer::BYTES_PER_ROW)
    }
}
