//! Predictive state extraction from partially streamed tool arguments.
//!
//! Providers stream tool-call arguments as an incrementally growing JSON
//! string. `partial_string_arg` parses that incomplete buffer just far enough
//! to recover the current value of one string-typed argument, so a node can
//! emit it as `StreamEvent::StateDelta` before the call finishes.

/// Maps one streamed tool argument onto one state key.
///
/// While a call to `tool` is streaming, the partial value of `tool_argument`
/// is emitted as a `StateDelta` for `state_key`.
#[derive(Clone, Debug)]
pub struct PredictStateConfig {
    /// State key the prediction is emitted under.
    pub state_key: String,
    /// Tool whose streamed call feeds the prediction.
    pub tool: String,
    /// Name of the string argument to surface.
    pub tool_argument: String,
}

impl Default for PredictStateConfig {
    fn default() -> Self {
        Self {
            state_key: "document".to_string(),
            tool: "write_document".to_string(),
            tool_argument: "document".to_string(),
        }
    }
}

/// Extracts the partial value of string field `key` from an incomplete JSON
/// object buffer.
///
/// Returns `None` until the opening quote of the value has arrived. Decodes
/// the escapes seen so far; a trailing incomplete escape (e.g. a buffer ending
/// in `\` or mid `\uXXXX`) is dropped rather than decoded, so successive calls
/// on a growing buffer always return a valid prefix of the final value.
pub fn partial_string_arg(buffer: &str, key: &str) -> Option<String> {
    let needle = format!("\"{}\"", key);
    let key_pos = buffer.find(&needle)?;
    let after_key = &buffer[key_pos + needle.len()..];
    let colon = after_key.find(':')?;
    let after_colon = after_key[colon + 1..].trim_start();
    let rest = after_colon.strip_prefix('"')?;

    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => {
                let Some(esc) = chars.next() else {
                    // Buffer ends mid-escape; drop it.
                    break;
                };
                match esc {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{0008}'),
                    'f' => out.push('\u{000C}'),
                    'u' => {
                        let hex: String = chars.by_ref().take(4).collect();
                        if hex.len() < 4 {
                            break;
                        }
                        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                            Some(ch) => out.push(ch),
                            None => break,
                        }
                    }
                    other => {
                        // Not a valid JSON escape; keep it verbatim.
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: default config maps write_document's document argument
    /// onto the document state key.
    #[test]
    fn default_config_targets_write_document() {
        let cfg = PredictStateConfig::default();
        assert_eq!(cfg.state_key, "document");
        assert_eq!(cfg.tool, "write_document");
        assert_eq!(cfg.tool_argument, "document");
    }

    /// **Scenario**: no prediction before the value's opening quote has streamed.
    #[test]
    fn returns_none_before_value_starts() {
        assert!(partial_string_arg("", "document").is_none());
        assert!(partial_string_arg("{\"docu", "document").is_none());
        assert!(partial_string_arg("{\"document\"", "document").is_none());
        assert!(partial_string_arg("{\"document\": ", "document").is_none());
    }

    /// **Scenario**: a growing buffer yields growing prefixes of the value.
    #[test]
    fn grows_with_the_buffer() {
        assert_eq!(
            partial_string_arg("{\"document\": \"", "document").as_deref(),
            Some("")
        );
        assert_eq!(
            partial_string_arg("{\"document\": \"# Hel", "document").as_deref(),
            Some("# Hel")
        );
        assert_eq!(
            partial_string_arg("{\"document\": \"# Hello\"}", "document").as_deref(),
            Some("# Hello")
        );
    }

    /// **Scenario**: escapes decode as they stream; a trailing half escape is
    /// dropped so the prediction stays a valid prefix.
    #[test]
    fn decodes_escapes_and_drops_trailing_half_escape() {
        assert_eq!(
            partial_string_arg("{\"document\": \"line1\\nline2", "document").as_deref(),
            Some("line1\nline2")
        );
        assert_eq!(
            partial_string_arg("{\"document\": \"say \\\"hi\\\"\"}", "document").as_deref(),
            Some("say \"hi\"")
        );
        // Buffer ends on a lone backslash.
        assert_eq!(
            partial_string_arg("{\"document\": \"abc\\", "document").as_deref(),
            Some("abc")
        );
        // Buffer ends mid \uXXXX.
        assert_eq!(
            partial_string_arg("{\"document\": \"abc\\u00", "document").as_deref(),
            Some("abc")
        );
        assert_eq!(
            partial_string_arg("{\"document\": \"caf\\u00e9\"}", "document").as_deref(),
            Some("café")
        );
    }

    /// **Scenario**: only the named argument is extracted.
    #[test]
    fn ignores_other_fields() {
        let buf = "{\"title\": \"T\", \"document\": \"body";
        assert_eq!(partial_string_arg(buf, "document").as_deref(), Some("body"));
        assert_eq!(partial_string_arg(buf, "title").as_deref(), Some("T"));
    }
}
