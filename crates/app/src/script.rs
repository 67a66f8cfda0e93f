//! Edit scripts for `hexpane edit`: one op per argument, fields split on `:`.
//!
//! | op | command |
//! |---|---|
//! | `hex:POS:CH` / `text:POS:CH` | type `CH` at `POS` of that pane |
//! | `bs-hex:POS` / `bs-text:POS` | backspace at `POS` |
//! | `cursor:POS` / `reset` | open a cursor / drop all cursors |
//! | `undo` / `redo` | history |
//! | `scroll:ROW` | move the window |
//! | `mode:insert` / `mode:overwrite` | typing mode |
//! | `find:HEX` / `find:` | search pattern / stop searching |
use editor_state::{Command, Pane};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown op `{0}`")]
    UnknownOp(String),

    #[error("`{op}` is missing its {field}")]
    MissingField { op: String, field: &'static str },

    #[error("`{value}` is not a number in `{op}`")]
    BadNumber { op: String, value: String },

    #[error("expected exactly one character in `{0}`")]
    BadChar(String),

    #[error("{0}")]
    BadMode(String),

    #[error(transparent)]
    Pattern(#[from] editor_state::search::PatternError),
}

/// Parses one script op.
///
/// # Errors
///
/// [`ScriptError`] naming the op that could not be understood.
pub fn parse_op(op: &str) -> Result<Command, ScriptError> {
    let mut fields = op.splitn(3, ':');
    let name = fields.next().unwrap_or_default();

    let command = match name {
        "hex" | "text" => {
            let position = number(op, fields.next(), "position")?;
            let ch = single_char(op, fields.next())?;
            let pane = if name == "hex" { Pane::Hex } else { Pane::Text };
            Command::Type { pane, position, ch }
        }
        "bs-hex" => Command::Backspace {
            pane: Pane::Hex,
            position: number(op, fields.next(), "position")?,
        },
        "bs-text" => Command::Backspace {
            pane: Pane::Text,
            position: number(op, fields.next(), "position")?,
        },
        "cursor" => Command::OpenCursor(number(op, fields.next(), "position")?),
        "scroll" => Command::Scroll(number(op, fields.next(), "row")? as u64),
        "reset" => Command::ResetCursors,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "mode" => {
            let mode = fields.next().unwrap_or_default();
            Command::SetMode(mode.parse().map_err(ScriptError::BadMode)?)
        }
        "find" => match fields.next().unwrap_or_default() {
            "" => Command::Find(None),
            pattern => Command::Find(Some(editor_state::search::parse_hex_pattern(pattern)?)),
        },
        _ => return Err(ScriptError::UnknownOp(op.to_string())),
    };

    Ok(command)
}

fn number(op: &str, field: Option<&str>, name: &'static str) -> Result<usize, ScriptError> {
    let value = field.ok_or_else(|| ScriptError::MissingField {
        op: op.to_string(),
        field: name,
    })?;

    value.parse().map_err(|_| ScriptError::BadNumber {
        op: op.to_string(),
        value: value.to_string(),
    })
}

fn single_char(op: &str, field: Option<&str>) -> Result<char, ScriptError> {
    let mut chars = field.unwrap_or_default().chars();

    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ScriptError::BadChar(op.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::InputMode;

    #[test]
    fn test_typing_ops() {
        assert_eq!(
            parse_op("hex:12:f"),
            Ok(Command::Type {
                pane: Pane::Hex,
                position: 12,
                ch: 'f'
            })
        );
        assert_eq!(
            parse_op("text:0:Z"),
            Ok(Command::Type {
                pane: Pane::Text,
                position: 0,
                ch: 'Z'
            })
        );
    }

    #[test]
    fn test_bare_and_numeric_ops() {
        assert_eq!(parse_op("undo"), Ok(Command::Undo));
        assert_eq!(parse_op("redo"), Ok(Command::Redo));
        assert_eq!(parse_op("reset"), Ok(Command::ResetCursors));
        assert_eq!(parse_op("cursor:6"), Ok(Command::OpenCursor(6)));
        assert_eq!(parse_op("scroll:2"), Ok(Command::Scroll(2)));
        assert_eq!(
            parse_op("bs-text:17"),
            Ok(Command::Backspace {
                pane: Pane::Text,
                position: 17
            })
        );
    }

    #[test]
    fn test_mode_and_find() {
        assert_eq!(parse_op("mode:insert"), Ok(Command::SetMode(InputMode::Insert)));
        assert_eq!(parse_op("mode:ovr"), Ok(Command::SetMode(InputMode::Overwrite)));
        assert_eq!(parse_op("find:de ad"), Ok(Command::Find(Some(vec![0xde, 0xad]))));
        assert_eq!(parse_op("find:"), Ok(Command::Find(None)));
    }

    #[test]
    fn test_rejects_malformed_ops() {
        assert_eq!(parse_op("jump"), Err(ScriptError::UnknownOp("jump".into())));
        assert!(matches!(parse_op("hex"), Err(ScriptError::MissingField { .. })));
        assert!(matches!(parse_op("hex:x:f"), Err(ScriptError::BadNumber { .. })));
        assert_eq!(parse_op("hex:3:ff"), Err(ScriptError::BadChar("hex:3:ff".into())));
        assert_eq!(parse_op("hex:3"), Err(ScriptError::BadChar("hex:3".into())));
        assert!(matches!(parse_op("mode:turbo"), Err(ScriptError::BadMode(_))));
        assert!(matches!(parse_op("find:abc"), Err(ScriptError::Pattern(_))));
    }
}
