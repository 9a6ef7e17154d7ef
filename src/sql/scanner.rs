use tracing::{debug, trace};

use super::{
    keywords::{KEYWORDS, SYMBOLS},
    token::{Cursor, Token, TokenKind},
};
use crate::error::LexError;

/// What a sub-lexer reports when it accepts input at the cursor: the token it
/// produced (none for whitespace) and where scanning continues.
type Lexed = Option<(Option<Token>, Cursor)>;

type SubLexer = fn(&str, Cursor) -> Lexed;

// Tried in order at every position; the first that accepts wins.
const LEXERS: [SubLexer; 5] = [
    lex_keyword,
    lex_symbol,
    lex_string,
    lex_numeric,
    lex_identifier,
];

pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut cursor = Cursor::default();

    'scan: while cursor.position < source.len() {
        for lexer in LEXERS {
            if let Some((token, next)) = lexer(source, cursor) {
                cursor = next;
                if let Some(token) = token {
                    trace!(value = %token.value, kind = ?token.kind, location = %token.location, "lexed token");
                    tokens.push(token);
                }
                continue 'scan;
            }
        }

        let error = LexError {
            location: cursor.location,
            hint: tokens.last().map(|token| token.value.clone()),
        };
        debug!(%error, "lexing failed");
        return Err(error);
    }

    Ok(tokens)
}

fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

fn is_identifier_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

/// Finds the longest entry of `options` that matches the source at the
/// cursor, ignoring ASCII case. Options are dropped from consideration as
/// soon as the scanned text outgrows them or stops being a prefix.
fn longest_match(source: &str, cursor: Cursor, options: &[&'static str]) -> Option<&'static str> {
    let bytes = source.as_bytes();
    let mut value: Vec<u8> = Vec::new();
    let mut eliminated = vec![false; options.len()];
    let mut best: Option<&'static str> = None;

    for &c in &bytes[cursor.position..] {
        value.push(c.to_ascii_lowercase());

        for (i, &option) in options.iter().enumerate() {
            if eliminated[i] {
                continue;
            }
            let candidate = option.as_bytes();
            if candidate == value.as_slice() {
                eliminated[i] = true;
                if best.map_or(true, |b| option.len() > b.len()) {
                    best = Some(option);
                }
                continue;
            }
            if value.len() > candidate.len() || !candidate.starts_with(&value) {
                eliminated[i] = true;
            }
        }

        if eliminated.iter().all(|&e| e) {
            break;
        }
    }

    best
}

fn lex_keyword(source: &str, cursor: Cursor) -> Lexed {
    let keyword = longest_match(source, cursor, &KEYWORDS)?;
    let next = cursor.advance(keyword.len());

    // `internal` is an identifier, not `int` followed by `ernal`.
    if source
        .as_bytes()
        .get(next.position)
        .is_some_and(|&c| is_identifier_continue(c))
    {
        return None;
    }

    let token = Token::new(keyword, TokenKind::Keyword, cursor.location);
    Some((Some(token), next))
}

fn lex_symbol(source: &str, cursor: Cursor) -> Lexed {
    match source.as_bytes()[cursor.position] {
        b'\n' => return Some((None, cursor.newline())),
        b'\t' | b' ' => return Some((None, cursor.advance(1))),
        _ => {}
    }

    let symbol = longest_match(source, cursor, &SYMBOLS)?;
    let token = Token::new(symbol, TokenKind::Symbol, cursor.location);
    Some((Some(token), cursor.advance(symbol.len())))
}

/// Scans a literal wrapped in `delimiter`. A doubled delimiter inside the
/// literal stands for one delimiter character.
fn lex_character_delimited(source: &str, cursor: Cursor, delimiter: u8) -> Lexed {
    let bytes = source.as_bytes();
    if bytes.get(cursor.position) != Some(&delimiter) {
        return None;
    }

    let mut value: Vec<u8> = Vec::new();
    let mut position = cursor.position + 1;
    while position < bytes.len() {
        let c = bytes[position];
        if c == delimiter {
            if bytes.get(position + 1) == Some(&delimiter) {
                value.push(delimiter);
                position += 2;
                continue;
            }
            let next = cursor.advance(position + 1 - cursor.position);
            let value = String::from_utf8_lossy(&value).into_owned();
            let token = Token::new(value, TokenKind::String, cursor.location);
            return Some((Some(token), next));
        }
        value.push(c);
        position += 1;
    }

    // unterminated
    None
}

fn lex_string(source: &str, cursor: Cursor) -> Lexed {
    lex_character_delimited(source, cursor, b'\'')
}

fn lex_numeric(source: &str, cursor: Cursor) -> Lexed {
    let bytes = source.as_bytes();
    let start = cursor.position;

    let first = bytes[start];
    if !first.is_ascii_digit() && first != b'.' {
        return None;
    }
    let mut period_found = first == b'.';
    let mut exponent_found = false;
    let mut digit_found = first.is_ascii_digit();

    let mut position = start + 1;
    while position < bytes.len() {
        let c = bytes[position];
        match c {
            b'.' => {
                if period_found {
                    return None;
                }
                period_found = true;
            }
            b'e' | b'E' => {
                if exponent_found {
                    return None;
                }
                // no fraction is allowed after the exponent
                period_found = true;
                exponent_found = true;

                if position == bytes.len() - 1 {
                    return None;
                }
                if matches!(bytes[position + 1], b'-' | b'+') {
                    position += 1;
                }
            }
            c if c.is_ascii_digit() => digit_found = true,
            _ => break,
        }
        position += 1;
    }

    // A lone `.` is not a number.
    if !digit_found {
        return None;
    }

    let token = Token::new(&source[start..position], TokenKind::Numeric, cursor.location);
    Some((Some(token), cursor.advance(position - start)))
}

fn lex_identifier(source: &str, cursor: Cursor) -> Lexed {
    if let Some((Some(mut token), next)) = lex_character_delimited(source, cursor, b'"') {
        token.kind = TokenKind::Identifier;
        return Some((Some(token), next));
    }

    let bytes = source.as_bytes();
    if !is_identifier_start(bytes[cursor.position]) {
        return None;
    }

    let end = bytes[cursor.position..]
        .iter()
        .position(|&c| !is_identifier_continue(c))
        .map_or(bytes.len(), |offset| cursor.position + offset);

    let value = source[cursor.position..end].to_ascii_lowercase();
    let token = Token::new(value, TokenKind::Identifier, cursor.location);
    Some((Some(token), cursor.advance(end - cursor.position)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::token::Location;

    fn at(position: usize) -> Cursor {
        Cursor {
            position,
            location: Location::new(0, position),
        }
    }

    #[test]
    fn longest_match_prefers_longer_keyword() {
        assert_eq!(longest_match("into x", at(0), &KEYWORDS), Some("into"));
        assert_eq!(longest_match("int x", at(0), &KEYWORDS), Some("int"));
        assert_eq!(longest_match("INSERT", at(0), &KEYWORDS), Some("insert"));
        assert_eq!(longest_match("users", at(0), &KEYWORDS), None);
    }

    #[test]
    fn longest_match_can_stop_short_of_buffer() {
        // `a` then `as` match; `ass` eliminates everything.
        assert_eq!(longest_match("assert", at(0), &KEYWORDS), Some("as"));
    }

    #[test]
    fn keyword_needs_word_boundary() {
        assert!(lex_keyword("internal", at(0)).is_none());
        assert!(lex_keyword("int)", at(0)).is_some());
    }

    #[test]
    fn whitespace_yields_no_token() {
        let (token, next) = lex_symbol(" x", at(0)).unwrap();
        assert!(token.is_none());
        assert_eq!(next, at(1));

        let (token, next) = lex_symbol("\nx", at(0)).unwrap();
        assert!(token.is_none());
        assert_eq!(next.location, Location::new(1, 0));
    }

    #[test]
    fn string_with_doubled_quote() {
        let (token, next) = lex_string("'it''s' rest", at(0)).unwrap();
        let token = token.unwrap();
        assert_eq!(token.value, "it's");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(next.position, 7);
        assert_eq!(next.location.column, 7);
    }

    #[test]
    fn unterminated_string_is_rejected() {
        assert!(lex_string("'abc", at(0)).is_none());
        assert!(lex_string("'abc''", at(0)).is_none());
    }

    #[test]
    fn numeric_grammar() {
        let value = |src: &str| lex_numeric(src, at(0)).and_then(|(t, _)| t).map(|t| t.value);
        assert_eq!(value("123"), Some("123".to_string()));
        assert_eq!(value("1.5,"), Some("1.5".to_string()));
        assert_eq!(value(".5"), Some(".5".to_string()));
        assert_eq!(value("1e10"), Some("1e10".to_string()));
        assert_eq!(value("1.5E-3)"), Some("1.5E-3".to_string()));
        assert_eq!(value("2e+7"), Some("2e+7".to_string()));
        assert_eq!(value("1.2.3"), None);
        assert_eq!(value("1e2e3"), None);
        assert_eq!(value("1e2.3"), None);
        assert_eq!(value("1e"), None);
        assert_eq!(value("."), None);
        assert_eq!(value("x1"), None);
    }

    #[test]
    fn numeric_cursor_stops_before_terminator() {
        let (_, next) = lex_numeric("42;", at(0)).unwrap();
        assert_eq!(next, at(2));
    }

    #[test]
    fn identifiers_fold_case_unless_quoted() {
        let (token, _) = lex_identifier("UserName_1$ ", at(0)).unwrap();
        assert_eq!(token.unwrap().value, "username_1$");

        let (token, next) = lex_identifier("\"My \"\"Table\"\"\"", at(0)).unwrap();
        let token = token.unwrap();
        assert_eq!(token.value, "My \"Table\"");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(next.position, 14);

        assert!(lex_identifier("_x", at(0)).is_none());
    }
}
