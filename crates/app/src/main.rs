mod cli;
mod script;

use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;

fn main() -> AnyhowResult<()> {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    let config = args.buffer_config()?;
    tracing::debug!(?config, "config resolved");

    match args.command {
        cli::Action::View { file, scroll } => view(config, &file, scroll),
        cli::Action::Info { file } => info(config, &file),
        cli::Action::Edit { file, output, ops } => edit(config, &file, &output, &ops),
    }
}

/// Logs go to stderr so stdout stays clean for the dump. `RUST_LOG` wins
/// unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_editor(config: editor_core::BufferConfig, file: &std::path::Path) -> AnyhowResult<editor_state::Editor> {
    let mut editor = editor_state::Editor::new(config);
    editor
        .open(file)
        .with_context(|| format!("opening {}", file.display()))?;

    Ok(editor)
}

fn view(config: editor_core::BufferConfig, file: &std::path::Path, scroll: u64) -> AnyhowResult<()> {
    let mut editor = open_editor(config, file)?;
    if scroll > 0 {
        editor.dispatch(editor_state::Command::Scroll(scroll));
    }
    let frame = editor.frame().context("document closed unexpectedly")?;

    print!("{}", render_frame(&frame));
    Ok(())
}

fn info(config: editor_core::BufferConfig, file: &std::path::Path) -> AnyhowResult<()> {
    let editor = open_editor(config, file)?;
    let buffer = editor.buffer().context("document closed unexpectedly")?;

    println!("path:      {}", buffer.path().display());
    println!("size:      {} bytes", buffer.get_size());
    println!("rows:      {}", buffer.max_scroll_row() + u64::from(buffer.get_size() > 0));
    println!("window:    {} rows", buffer.config().row_count);
    println!("encoding:  {:?}", buffer.config().encoding);
    println!("read-only: {}", buffer.is_read_only());
    Ok(())
}

fn edit(
    config: editor_core::BufferConfig,
    file: &std::path::Path,
    output: &std::path::Path,
    ops: &[String],
) -> AnyhowResult<()> {
    let commands = ops
        .iter()
        .map(|op| script::parse_op(op).with_context(|| format!("parsing op `{op}`")))
        .collect::<AnyhowResult<Vec<_>>>()?;

    let mut editor = open_editor(config, file)?;
    let mut applied = 0usize;

    for (op, command) in ops.iter().zip(commands) {
        match editor.dispatch(command) {
            editor_state::Outcome::Changed(_) => applied += 1,
            editor_state::Outcome::Unchanged(reason) => {
                tracing::warn!(op = %op, %reason, "op had no effect");
            }
        }
    }

    let size = editor.buffer().map_or(0, editor_core::HexBuffer::get_size);
    editor
        .save_as(output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("{applied}/{} ops applied, {size} bytes written to {}", ops.len(), output.display());
    Ok(())
}

/// Offsets, hex and text side by side, one line per row.
fn render_frame(frame: &editor_state::Frame) -> String {
    const HEX_WIDTH: usize = renderer::BYTES_PER_ROW * renderer::HEX_CELL_WIDTH - 1;

    let mut out = format!("{:8}  {}\n", "", frame.columns);
    let hex = frame.hex.trim_end();
    if hex.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }

    let rows = frame.offsets.lines().zip(hex.lines());
    let mut text = frame.text.lines();
    for (offset, hex_row) in rows {
        let text_row = text.next().unwrap_or_default();
        out.push_str(&format!("{offset}  {hex_row:HEX_WIDTH$}  {text_row}\n"));
    }

    out
}
