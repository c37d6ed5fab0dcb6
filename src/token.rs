//! Classification of invocation tokens.

/// The syntactic form of a single invocation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `-` or `--`: everything after is positional
    Terminator,
    /// `key=value`, split at the first `=`
    Equals { key: &'a str, value: &'a str },
    /// `--name`
    Long(&'a str),
    /// `-c`
    Short(char),
    /// `-abc`, several short letters in one token (rejected)
    Bundled(&'a str),
    /// Anything else
    Positional(&'a str),
}

/// Classify a token. Earlier forms win: a terminator is never an
/// equals-form, and `--out=x` is an equals-form rather than a long option.
pub fn classify(arg: &str) -> Token<'_> {
    if is_terminator(arg) {
        return Token::Terminator;
    }

    if let Some((key, value)) = arg.split_once('=') {
        return Token::Equals { key, value };
    }

    if let Some(name) = arg.strip_prefix("--") {
        // "--" itself was handled above
        return Token::Long(name);
    }

    if let Some(rest) = arg.strip_prefix('-') {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => return Token::Short(c),
            (Some(_), Some(_)) => return Token::Bundled(rest),
            // "-" itself was handled above
            (None, _) => {}
        }
    }

    Token::Positional(arg)
}

pub fn is_terminator(arg: &str) -> bool {
    arg == "-" || arg == "--"
}

/// Check whether a token looks like a long or short option, regardless of
/// an embedded `=`. Such a token is never taken as the value of the option
/// before it.
pub fn is_option_shaped(arg: &str) -> bool {
    arg.len() >= 2 && arg.starts_with('-') && !is_terminator(arg)
}
