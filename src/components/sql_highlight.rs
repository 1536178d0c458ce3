use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// SQL keywords that should be highlighted
const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "FULL", "CROSS", "ON",
    "AS", "AND", "OR", "NOT", "IN", "EXISTS", "BETWEEN", "LIKE", "ILIKE", "IS", "NULL", "TRUE",
    "FALSE", "GROUP", "BY", "HAVING", "ORDER", "ASC", "DESC", "LIMIT", "OFFSET", "INSERT", "INTO",
    "VALUES", "UPDATE", "SET", "DELETE", "CREATE", "TABLE", "ALTER", "DROP", "TRUNCATE", "INDEX",
    "VIEW", "WITH", "CASE", "WHEN", "THEN", "ELSE", "END", "DISTINCT", "UNION", "ALL",
    "INTERSECT", "EXCEPT", "CAST", "SAMPLE", "LATEST", "PARTITION", "TIMESTAMP", "FILL", "ALIGN",
    "CALENDAR", "SPLICE", "ASOF", "LT", "SHOW", "COLUMNS", "TABLES",
];

/// Token types for SQL syntax
#[derive(Debug, PartialEq, Clone, Copy)]
enum TokenKind {
    Keyword,
    String,
    Number,
    Comment,
    Identifier,
    Whitespace,
    Punctuation,
}

/// A token borrowing its text from the source
#[derive(Debug, PartialEq, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
}

/// Byte offset just past the first char matching `stop` at or after `from`,
/// or the end of input
fn scan_past(sql: &str, from: usize, stop: impl Fn(char) -> bool) -> usize {
    sql[from..]
        .char_indices()
        .find(|&(_, c)| stop(c))
        .map(|(i, c)| from + i + c.len_utf8())
        .unwrap_or(sql.len())
}

/// Byte offset of the first char at or after `from` that fails `keep`
fn scan_while(sql: &str, from: usize, keep: impl Fn(char) -> bool) -> usize {
    sql[from..]
        .char_indices()
        .find(|&(_, c)| !keep(c))
        .map(|(i, _)| from + i)
        .unwrap_or(sql.len())
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | ',' | ';' | '.' | '*' | '=' | '<' | '>' | '+' | '-' | '/' | '%' | '!' | ':'
            | '[' | ']'
    )
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !is_punctuation(c) && c != '\'' && c != '"'
}

/// Simple SQL tokenizer
///
/// Unterminated strings and block comments run to the end of input.
fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(ch) = sql[pos..].chars().next() {
        let rest = &sql[pos..];
        let (kind, end) = if ch == '\'' || ch == '"' {
            (TokenKind::String, scan_past(sql, pos + 1, |c| c == ch))
        } else if rest.starts_with("--") {
            // Newline stays with the following whitespace token
            (TokenKind::Comment, scan_while(sql, pos, |c| c != '\n'))
        } else if rest.starts_with("/*") {
            let end = rest[2..]
                .find("*/")
                .map(|i| pos + 2 + i + 2)
                .unwrap_or(sql.len());
            (TokenKind::Comment, end)
        } else if ch.is_whitespace() {
            (TokenKind::Whitespace, scan_while(sql, pos, char::is_whitespace))
        } else if is_punctuation(ch) {
            (TokenKind::Punctuation, pos + ch.len_utf8())
        } else {
            let end = scan_while(sql, pos, is_word_char);
            (classify_word(&sql[pos..end]), end)
        };

        tokens.push(Token {
            kind,
            text: &sql[pos..end],
        });
        pos = end;
    }

    tokens
}

/// Classify a word as keyword, number, or identifier
fn classify_word(word: &str) -> TokenKind {
    if SQL_KEYWORDS.contains(&word.to_uppercase().as_str()) {
        TokenKind::Keyword
    } else if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
        TokenKind::Number
    } else {
        TokenKind::Identifier
    }
}

fn style_for(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Keyword => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        TokenKind::String => Style::default().fg(Color::Green),
        TokenKind::Number => Style::default().fg(Color::Magenta),
        TokenKind::Comment => Style::default().fg(Color::DarkGray),
        TokenKind::Identifier => Style::default().fg(Color::White),
        TokenKind::Whitespace => Style::default(),
        TokenKind::Punctuation => Style::default().fg(Color::Gray),
    }
}

/// Convert SQL string into highlighted ratatui Lines
///
/// Always yields one Line per source line, so the editor cursor row maps
/// directly onto the output.
pub fn highlight_sql(sql: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for token in tokenize(sql) {
        let style = style_for(token.kind);
        for (i, part) in token.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines.push(Line::from(current));

    lines
}
