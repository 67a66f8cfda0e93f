/// How single bytes map to characters in the text pane, and back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// A byte decodes only when it is a complete UTF-8 sequence on its own,
    /// i.e. ASCII.
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Decodes one byte, `None` when the byte is not a character on its own.
    #[must_use]
    pub fn decode(self, byte: u8) -> Option<char> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(std::slice::from_ref(&byte))
                .ok()
                .and_then(|s| s.chars().next()),
            TextEncoding::Ascii => byte.is_ascii().then_some(char::from(byte)),
            TextEncoding::Latin1 => Some(char::from(byte)),
        }
    }

    /// Encodes `ch` as exactly one byte, `None` when it needs more or none.
    #[must_use]
    pub fn encode(self, ch: char) -> Option<u8> {
        match self {
            TextEncoding::Utf8 | TextEncoding::Ascii => ch.is_ascii().then_some(ch as u8),
            TextEncoding::Latin1 => u8::try_from(u32::from(ch)).ok(),
        }
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("unknown encoding `{other}`")),
        }
    }
}
