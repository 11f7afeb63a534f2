//! Markup sanitizer. Makes arbitrary résumé text safe to embed in a TeX template.
//!
//! # Rules
//! - Every character in [`ESCAPES`] is replaced by its literal-producing
//!   sequence in a single scan. Output is never re-scanned, so a replacement
//!   that itself contains escape-set characters (`~`, `{`, `}`) is emitted as-is.
//! - Braces and backslashes are escaped. Résumé data is plain text, so no
//!   control sequence or group in it reaches the typesetter.
//! - The shell-escape directive (`\write18`) is rejected. The check runs on the
//!   raw input and again on the escaped output, both normalised so that case,
//!   whitespace and brace groups cannot split the directive.

use thiserror::Error;

/// The TeX primitive that runs a shell command during compilation when
/// shell-escape is enabled.
pub const SHELL_ESCAPE_DIRECTIVE: &str = "\\write18";

/// Character → replacement. Order is irrelevant: matches are single characters.
pub const ESCAPES: &[(char, &str)] = &[
    ('\\', "\\textbackslash{}"),
    ('&', "\\&"),
    ('%', "\\%"),
    ('$', "\\$"),
    ('#', "\\#"),
    ('<', "\\textless{}"),
    ('>', "\\textgreater{}"),
    ('^', "\\textasciicircum{}"),
    ('~', "\\textasciitilde{}"),
    ('\u{a0}', "~"),
    ('-', "\\textendash{}"),
    ('{', "\\{"),
    ('}', "\\}"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("security risk: {directive} found in input")]
    SecurityRisk { directive: String },
}

/// Escapes `input` for TeX and rejects shell-escape directives.
pub fn sanitize(input: &str) -> Result<String, SanitizeError> {
    if contains_directive(input) {
        return Err(security_risk());
    }

    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for ch in input.chars() {
        match escape_for(ch) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(ch),
        }
    }

    if contains_directive(&out) {
        return Err(security_risk());
    }
    Ok(out)
}

/// Returns the replacement for `ch`, if it is in the escape set.
pub fn escape_for(ch: char) -> Option<&'static str> {
    ESCAPES
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, replacement)| *replacement)
}

/// Case-insensitive search for the shell-escape directive, ignoring
/// whitespace and brace characters (TeX accepts `\write 18` and `\write{}18`
/// alike, and `\WRITE18` is still worth refusing).
pub fn contains_directive(text: &str) -> bool {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .flat_map(char::to_lowercase)
        .collect();
    normalized.contains(SHELL_ESCAPE_DIRECTIVE)
}

fn security_risk() -> SanitizeError {
    SanitizeError::SecurityRisk {
        directive: SHELL_ESCAPE_DIRECTIVE.to_string(),
    }
}
