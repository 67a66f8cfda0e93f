use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hexpane")]
#[command(about = "Hex and text view of a binary file, with staged edits and undo", long_about = None)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Action,

    /// JSON config file (row-count, encoding)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Rows of sixteen bytes in the window, overrides the config
    #[arg(long, value_name = "N", global = true)]
    pub rows: Option<usize>,

    /// Text pane encoding: utf-8, ascii or latin-1
    #[arg(long, value_name = "ENCODING", global = true)]
    pub encoding: Option<renderer::TextEncoding>,

    /// Log at debug level to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print one window of the file as offsets, hex and text
    View {
        file: std::path::PathBuf,

        /// First row of the window
        #[arg(long, default_value_t = 0)]
        scroll: u64,
    },

    /// Print size and layout facts about the file
    Info { file: std::path::PathBuf },

    /// Replay an edit script against the file and write the result
    Edit {
        file: std::path::PathBuf,

        /// Destination; may be the input file itself
        #[arg(short, long, value_name = "PATH")]
        output: std::path::PathBuf,

        /// Script ops, e.g. `hex:0:f` `text:3:A` `bs-hex:6` `undo`
        #[arg(value_name = "OPS", required = true)]
        ops: Vec<String>,
    },
}

impl Args {
    /// Config file values with command-line overrides applied.
    ///
    /// # Errors
    ///
    /// Fails if the config file is unreadable or the result is invalid.
    pub fn buffer_config(&self) -> anyhow::Result<editor_core::BufferConfig> {
        use anyhow::Context;

        let mut config = match &self.config {
            Some(path) => editor_core::BufferConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => editor_core::BufferConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.row_count = rows;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_defaults() {
        let args = Args::parse_from(["hexpane", "--rows", "4", "--encoding", "latin-1", "info", "f.bin"]);
        let config = args.buffer_config().unwrap();

        assert_eq!(config.row_count, 4);
        assert_eq!(config.encoding, renderer::TextEncoding::Latin1);
    }

    #[test]
    fn test_zero_rows_rejected() {
        let args = Args::parse_from(["hexpane", "info", "f.bin", "--rows", "0"]);

        assert!(args.buffer_config().is_err());
    }

    #[test]
    fn test_edit_requires_ops() {
        assert!(Args::try_parse_from(["hexpane", "edit", "f.bin", "-o", "out.bin"]).is_err());

        let args = Args::parse_from(["hexpane", "edit", "f.bin", "-o", "out.bin", "undo", "redo"]);
        match args.command {
            Action::Edit { ops, .. } => assert_eq!(ops, vec!["undo", "redo"]),
            other => panic!("unexpected {other:?}"),
        }
    }
}
