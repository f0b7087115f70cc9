//! Math-markup pre-check backing the mathtext construction path.
//!
//! The real typesetting toolchain lives behind the engine; this check
//! rejects markup the toolchain could not compile so the builder can
//! fall back to a plain text primitive instead of failing the object.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesetError {
    #[error("unbalanced group braces (depth {0} at end of markup)")]
    UnbalancedGroup(i32),
    #[error("dangling command at end of markup")]
    DanglingCommand,
    #[error("empty command name")]
    EmptyCommand,
}

/// Validate math markup: group braces must balance and every `\` must
/// introduce a command name or an escaped symbol.
pub fn check(markup: &str) -> Result<(), TypesetError> {
    let mut depth: i32 = 0;
    let mut chars = markup.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(TypesetError::UnbalancedGroup(depth));
                }
            }
            '\\' => match chars.peek() {
                None => return Err(TypesetError::DanglingCommand),
                Some(next) if next.is_alphabetic() => {
                    while matches!(chars.peek(), Some(c) if c.is_alphabetic()) {
                        chars.next();
                    }
                }
                Some(next) if next.is_ascii_punctuation() || *next == ' ' => {
                    chars.next();
                }
                Some(_) => return Err(TypesetError::EmptyCommand),
            },
            _ => {}
        }
    }

    if depth != 0 {
        return Err(TypesetError::UnbalancedGroup(depth));
    }
    Ok(())
}
