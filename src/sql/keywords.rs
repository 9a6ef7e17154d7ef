use std::{collections::HashMap, sync::LazyLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Where,
    As,
    Join,
    Table,
    Text,
    Int,
    Values,
    Into,
    Insert,
    Create,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "select",
            Keyword::From => "from",
            Keyword::Where => "where",
            Keyword::As => "as",
            Keyword::Join => "join",
            Keyword::Table => "table",
            Keyword::Text => "text",
            Keyword::Int => "int",
            Keyword::Values => "values",
            Keyword::Into => "into",
            Keyword::Insert => "insert",
            Keyword::Create => "create",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Semicolon,
    Asterisk,
    Comma,
    LeftParen,
    RightParen,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Semicolon => ";",
            Symbol::Asterisk => "*",
            Symbol::Comma => ",",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
        }
    }
}

/// Lexer vocabulary, in lowercase.
pub static KEYWORDS: [&str; 12] = [
    "select", "from", "where", "as", "join", "table", "text", "int", "values", "into", "insert",
    "create",
];

pub static SYMBOLS: [&str; 5] = [";", "*", ",", "(", ")"];

static KEYWORD_MAP: LazyLock<HashMap<&'static str, Keyword>> = LazyLock::new(|| {
    HashMap::from([
        ("select", Keyword::Select),
        ("from", Keyword::From),
        ("where", Keyword::Where),
        ("as", Keyword::As),
        ("join", Keyword::Join),
        ("table", Keyword::Table),
        ("text", Keyword::Text),
        ("int", Keyword::Int),
        ("values", Keyword::Values),
        ("into", Keyword::Into),
        ("insert", Keyword::Insert),
        ("create", Keyword::Create),
    ])
});

pub fn get(text: &str) -> Option<Keyword> {
    let keyword = text.to_lowercase();
    KEYWORD_MAP.get(keyword.as_str()).copied()
}
