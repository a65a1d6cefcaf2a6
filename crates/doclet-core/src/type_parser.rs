//! Recursive-descent parser for JSDoc / Closure Compiler type expressions.
//!
//! The parser keeps one explicit stack of open delimiter frames. The stack
//! decides where an unbalanced delimiter error points. A `:` inside a name
//! is part of a namepath (`module:foo/bar`) except where a record key or a
//! parameter label is expected. Every call builds its own parser state.

use crate::error::{DocError, Result};
use crate::flags::{Flag, FlagSet};
use crate::types::{FieldType, Type, format_number};

/// Maximum nesting depth: open delimiters plus enclosing function results.
pub const MAX_DEPTH: usize = 64;

/// Parse a type expression such as `Array.<string>|null`.
pub fn parse_type(text: &str) -> Result<Type> {
    TypeParser::new(text).parse(false)
}

/// Parse a type expression in parameter position, where a bare `?=` is also
/// accepted.
pub fn parse_param_type(text: &str) -> Result<Type> {
    TypeParser::new(text).parse(true)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Punct(char),
    Ellipsis,
    /// `.<` opening a type application.
    DotLt,
    Name(String),
    Number(f64),
    Str(String),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Punct(c) => format!("`{c}`"),
            Self::Ellipsis => "`...`".to_string(),
            Self::DotLt => "`.<`".to_string(),
            Self::Name(name) => format!("`{name}`"),
            Self::Number(value) => format!("number `{}`", format_number(*value)),
            Self::Str(_) => "string literal".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }

    /// Tokens that may follow a complete type expression.
    fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Eof | Self::Punct(')' | ']' | '}' | '>' | ',' | '|' | '=' | ':')
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Lexed {
    token: Token,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Record,
    Array,
    Group,
    Params,
    Application,
}

impl FrameKind {
    fn open(self) -> char {
        match self {
            Self::Record => '{',
            Self::Array => '[',
            Self::Group | Self::Params => '(',
            Self::Application => '<',
        }
    }

    fn close(self) -> char {
        match self {
            Self::Record => '}',
            Self::Array => ']',
            Self::Group | Self::Params => ')',
            Self::Application => '>',
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    offset: usize,
}

struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
    frames: Vec<Frame>,
    /// Function result types currently being parsed.
    results: usize,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '$' | '#' | '~' | '@')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#' | '~' | '@' | '.' | '/' | '-')
}

fn is_opener(c: char) -> bool {
    matches!(c, '{' | '[' | '(' | '<')
}

fn closer_of(c: char) -> Option<char> {
    match c {
        '{' => Some('}'),
        '[' => Some(']'),
        '(' => Some(')'),
        '<' => Some('>'),
        _ => None,
    }
}

impl<'a> TypeParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            frames: Vec::new(),
            results: 0,
        }
    }

    fn parse(mut self, param_mode: bool) -> Result<Type> {
        let first = self.peek()?;
        if first.token == Token::Eof {
            return Err(DocError::syntax("empty type expression", first.start));
        }

        let ty = self.parse_union()?;
        let next = self.peek()?;
        if next.token != Token::Eof {
            return Err(self.unexpected(&next));
        }

        if !param_mode
            && matches!(&ty, Type::OptionalType { expression } if **expression == Type::NullableLiteral)
        {
            return Err(DocError::syntax(
                "`?=` is only allowed in parameter position",
                0,
            ));
        }
        Ok(ty)
    }

    // ---- lexing ----------------------------------------------------------

    fn peek(&self) -> Result<Lexed> {
        self.lex_at(self.pos, true)
    }

    /// Like [`Self::peek`], but a name stops before any `:`.
    fn peek_label(&self) -> Result<Lexed> {
        self.lex_at(self.pos, false)
    }

    fn bump(&mut self) -> Result<Lexed> {
        let lexed = self.peek()?;
        self.pos = lexed.end;
        Ok(lexed)
    }

    fn peek_punct(&self, c: char) -> Result<bool> {
        Ok(self.peek()?.token == Token::Punct(c))
    }

    fn eat_punct(&mut self, c: char) -> Result<bool> {
        let lexed = self.peek()?;
        if lexed.token == Token::Punct(c) {
            self.pos = lexed.end;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn lex_at(&self, pos: usize, allow_colon: bool) -> Result<Lexed> {
        let tail = &self.src[pos..];
        let start = pos + (tail.len() - tail.trim_start().len());
        let rest = &self.src[start..];
        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            return Ok(Lexed {
                token: Token::Eof,
                start,
                end: start,
            });
        };
        let second = chars.next();

        let punct = |token: Token, len: usize| -> Result<Lexed> {
            Ok(Lexed {
                token,
                start,
                end: start + len,
            })
        };

        match c {
            '.' if rest.starts_with("...") => punct(Token::Ellipsis, 3),
            '.' if rest.starts_with(".<") => punct(Token::DotLt, 2),
            '.' if second.is_some_and(|d| d.is_ascii_digit()) => self.lex_number(start),
            '-' | '+'
                if second.is_some_and(|d| d.is_ascii_digit())
                    || (second == Some('.')
                        && rest[2..].starts_with(|d: char| d.is_ascii_digit())) =>
            {
                self.lex_number(start)
            }
            c if c.is_ascii_digit() => self.lex_number(start),
            '"' | '\'' => self.lex_string(start, c),
            '{' | '}' | '[' | ']' | '(' | ')' | '<' | '>' | ',' | '|' | ':' | '=' | '?'
            | '!' | '*' => punct(Token::Punct(c), 1),
            c if is_name_start(c) => Ok(self.lex_name(start, allow_colon)),
            c => Err(DocError::syntax(format!("unexpected character `{c}`"), start)),
        }
    }

    fn lex_name(&self, start: usize, allow_colon: bool) -> Lexed {
        let rest = &self.src[start..];
        let mut end = start;
        for (idx, c) in rest.char_indices() {
            if c == '.' && rest[idx..].starts_with(".<") {
                break;
            }
            if is_name_char(c) || (allow_colon && idx > 0 && c == ':') {
                end = start + idx + c.len_utf8();
            } else {
                break;
            }
        }
        Lexed {
            token: Token::Name(self.src[start..end].to_string()),
            start,
            end,
        }
    }

    fn lex_number(&self, start: usize) -> Result<Lexed> {
        let bytes = self.src.as_bytes();
        let len = bytes.len();
        let mut idx = start;
        let mut negative = false;
        if matches!(bytes[idx], b'-' | b'+') {
            negative = bytes[idx] == b'-';
            idx += 1;
        }

        let digits_start = idx;
        let value = if bytes[idx] == b'0' && matches!(bytes.get(idx + 1), Some(b'x' | b'X')) {
            idx += 2;
            let hex_start = idx;
            while idx < len && bytes[idx].is_ascii_hexdigit() {
                idx += 1;
            }
            if idx == hex_start {
                return Err(DocError::syntax(
                    "hexadecimal literal has no digits",
                    start,
                ));
            }
            radix_value(&self.src[hex_start..idx], 16)
        } else if let Some(octal_end) = octal_run(bytes, idx) {
            idx = octal_end;
            radix_value(&self.src[digits_start + 1..idx], 8)
        } else {
            while idx < len && bytes[idx].is_ascii_digit() {
                idx += 1;
            }
            if idx < len && bytes[idx] == b'.' && !self.src[idx..].starts_with(".<") {
                idx += 1;
                while idx < len && bytes[idx].is_ascii_digit() {
                    idx += 1;
                }
            }
            if idx < len && matches!(bytes[idx], b'e' | b'E') {
                idx += 1;
                if idx < len && matches!(bytes[idx], b'-' | b'+') {
                    idx += 1;
                }
                let exp_start = idx;
                while idx < len && bytes[idx].is_ascii_digit() {
                    idx += 1;
                }
                if idx == exp_start {
                    return Err(DocError::syntax("exponent has no digits", start));
                }
            }
            self.src[digits_start..idx]
                .parse::<f64>()
                .map_err(|_| DocError::syntax("malformed numeric literal", start))?
        };

        if self.src[idx..].starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$') {
            return Err(DocError::syntax(
                format!("malformed numeric literal `{}`", self.token_text(start)),
                start,
            ));
        }

        Ok(Lexed {
            token: Token::Number(if negative { -value } else { value }),
            start,
            end: idx,
        })
    }

    fn lex_string(&self, start: usize, quote: char) -> Result<Lexed> {
        let body = &self.src[start + 1..];
        let mut chars = body.char_indices().peekable();
        let mut value = String::new();

        loop {
            let Some((idx, c)) = chars.next() else {
                return Err(DocError::unbalanced(quote, start));
            };
            match c {
                c if c == quote => {
                    return Ok(Lexed {
                        token: Token::Str(value),
                        start,
                        end: start + 1 + idx + 1,
                    });
                }
                '\n' | '\r' => return Err(DocError::unbalanced(quote, start)),
                '\\' => {
                    let Some((escape_at, escaped)) = chars.next() else {
                        return Err(DocError::unbalanced(quote, start));
                    };
                    let offset = start + 1 + escape_at;
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        'v' => value.push('\u{b}'),
                        '\n' => {}
                        '\r' => {
                            chars.next_if(|&(_, c)| c == '\n');
                        }
                        '0'..='7' => {
                            let mut code = escaped.to_digit(8).unwrap_or(0);
                            let max_digits = if escaped <= '3' { 3 } else { 2 };
                            for _ in 1..max_digits {
                                match chars.peek().and_then(|&(_, c)| c.to_digit(8)) {
                                    Some(digit) => {
                                        code = code * 8 + digit;
                                        chars.next();
                                    }
                                    None => break,
                                }
                            }
                            value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        'x' => {
                            let code = take_hex(&mut chars, 2)
                                .ok_or_else(|| DocError::syntax("invalid `\\x` escape", offset))?;
                            value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        'u' => {
                            let code = if chars.next_if(|&(_, c)| c == '{').is_some() {
                                let mut code = 0u32;
                                let mut digits = 0;
                                loop {
                                    match chars.next() {
                                        Some((_, '}')) if digits > 0 => break,
                                        Some((_, c)) if c.is_ascii_hexdigit() && digits < 6 => {
                                            code = code * 16 + c.to_digit(16).unwrap_or(0);
                                            digits += 1;
                                        }
                                        _ => {
                                            return Err(DocError::syntax(
                                                "invalid `\\u{}` escape",
                                                offset,
                                            ));
                                        }
                                    }
                                }
                                code
                            } else {
                                take_hex(&mut chars, 4).ok_or_else(|| {
                                    DocError::syntax("invalid `\\u` escape", offset)
                                })?
                            };
                            value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        other => value.push(other),
                    }
                }
                c => value.push(c),
            }
        }
    }

    fn token_text(&self, start: usize) -> &str {
        let rest = &self.src[start..];
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_' | '$')))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    // ---- frames ----------------------------------------------------------

    fn open(&mut self, kind: FrameKind, offset: usize) -> Result<()> {
        self.check_depth()?;
        self.frames.push(Frame { kind, offset });
        Ok(())
    }

    fn check_depth(&self) -> Result<()> {
        if self.frames.len() + self.results >= MAX_DEPTH {
            return Err(DocError::TooDeeplyNested { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn close(&mut self, kind: FrameKind) -> Result<()> {
        let next = self.peek()?;
        if next.token == Token::Punct(kind.close()) {
            self.pos = next.end;
            self.frames.pop();
            Ok(())
        } else {
            Err(self.unexpected(&next))
        }
    }

    /// Best error for a token the grammar cannot accept here.
    fn unexpected(&self, lexed: &Lexed) -> DocError {
        match &lexed.token {
            Token::Eof => match self.frames.last() {
                Some(frame) => DocError::unbalanced(frame.kind.open(), frame.offset),
                None => DocError::syntax("unexpected end of type expression", lexed.start),
            },
            Token::Punct(c) if is_opener(*c) && !self.has_closer(*c, lexed.start) => {
                DocError::unbalanced(*c, lexed.start)
            }
            Token::Punct(c @ ('}' | ']' | ')' | '>'))
                if !self.frames.iter().any(|f| f.kind.close() == *c) =>
            {
                DocError::unbalanced(*c, lexed.start)
            }
            Token::Punct('|') => DocError::syntax("empty union member", lexed.start),
            token => DocError::syntax(format!("unexpected {}", token.describe()), lexed.start),
        }
    }

    /// Whether the opener at `offset` is matched later in the input.
    fn has_closer(&self, open: char, offset: usize) -> bool {
        let Some(close) = closer_of(open) else {
            return false;
        };
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for c in self.src[offset..].chars() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                c if c == open => depth += 1,
                c if c == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    // ---- grammar ---------------------------------------------------------

    /// `TypeExpr ('|' TypeExpr)*`, collapsing a single element.
    fn parse_union(&mut self) -> Result<Type> {
        let elements = self.parse_union_elements()?;
        Ok(match <[Type; 1]>::try_from(elements) {
            Ok([only]) => only,
            Err(elements) => Type::union(elements),
        })
    }

    fn parse_union_elements(&mut self) -> Result<Vec<Type>> {
        let mut elements = vec![self.parse_type_expr()?];
        while self.eat_punct('|')? {
            let next = self.peek()?;
            if next.token == Token::Eof && !self.frames.is_empty() {
                return Err(self.unexpected(&next));
            }
            if next.token.is_terminator() {
                return Err(DocError::syntax("empty union member", next.start));
            }
            elements.push(self.parse_type_expr()?);
        }
        Ok(elements)
    }

    /// `'...'? ('?' | '!')* Basic ('[' ']')* ('?' | '!' | '=')*`
    fn parse_type_expr(&mut self) -> Result<Type> {
        let mut flags = FlagSet::default();

        if self.peek()?.token == Token::Ellipsis {
            self.bump()?;
            flags.rest = true;
            if self.peek()?.token.is_terminator() {
                return Ok(Type::rest(None));
            }
        }

        while let Token::Punct(c @ ('?' | '!')) = self.peek()?.token {
            self.bump()?;
            flags.prefix.extend(Flag::from_char(c));
        }

        let literal = if self.peek()?.token.is_terminator() {
            flags.prefix.pop().and_then(Flag::literal)
        } else {
            None
        };
        let mut core = match literal {
            Some(literal) => literal,
            None => self.parse_basic()?,
        };

        loop {
            let save = self.pos;
            if !self.eat_punct('[')? {
                break;
            }
            if self.eat_punct(']')? {
                core = Type::array_of(core);
            } else {
                self.pos = save;
                break;
            }
        }

        while let Token::Punct(c) = self.peek()?.token {
            let Some(flag) = Flag::from_char(c) else {
                break;
            };
            self.bump()?;
            flags.suffix.push(flag);
        }

        Ok(flags.apply(core))
    }

    fn parse_basic(&mut self) -> Result<Type> {
        let next = self.peek()?;
        match &next.token {
            Token::Punct('*') => {
                self.pos = next.end;
                Ok(Type::AllLiteral)
            }
            Token::Punct('(') => self.parse_group(),
            Token::Punct('{') => self.parse_record(),
            Token::Punct('[') => self.parse_array(),
            Token::Str(value) => {
                self.pos = next.end;
                Ok(Type::StringLiteralType {
                    value: value.clone(),
                })
            }
            Token::Number(value) => {
                self.pos = next.end;
                Ok(Type::NumericLiteralType { value: *value })
            }
            Token::Name(name) => {
                self.pos = next.end;
                if name == "true" || name == "false" {
                    return Ok(Type::BooleanLiteralType {
                        value: name == "true",
                    });
                }
                if name == "function" && self.peek_punct('(')? {
                    return self.parse_function();
                }
                self.parse_application(Type::name(name.as_str()))
            }
            _ => Err(self.unexpected(&next)),
        }
    }

    /// `(A|B)`; always a union, `()` being the empty one.
    fn parse_group(&mut self) -> Result<Type> {
        let open = self.bump()?;
        self.open(FrameKind::Group, open.start)?;
        let elements = if self.peek_punct(')')? {
            Vec::new()
        } else {
            self.parse_union_elements()?
        };
        self.close(FrameKind::Group)?;
        Ok(Type::union(elements))
    }

    fn parse_record(&mut self) -> Result<Type> {
        let open = self.bump()?;
        self.open(FrameKind::Record, open.start)?;
        let mut fields = Vec::new();

        loop {
            let next = self.peek()?;
            match next.token {
                Token::Punct('}') => break,
                Token::Punct(',') => {
                    self.pos = next.end;
                    continue;
                }
                _ => {}
            }

            let key = self.parse_field_key()?;
            let value = if self.eat_punct(':')? {
                self.parse_union()?
            } else {
                Type::AllLiteral
            };
            fields.push(FieldType::new(key, value));

            let next = self.peek()?;
            match next.token {
                Token::Punct(',') => self.pos = next.end,
                Token::Punct('}') => {}
                _ => return Err(self.unexpected(&next)),
            }
        }

        self.close(FrameKind::Record)?;
        Ok(Type::RecordType { fields })
    }

    fn parse_field_key(&mut self) -> Result<String> {
        let next = self.peek_label()?;
        match &next.token {
            Token::Name(key) | Token::Str(key) => {
                self.pos = next.end;
                Ok(key.clone())
            }
            Token::Number(value) => {
                self.pos = next.end;
                Ok(format_number(*value))
            }
            _ => Err(self.unexpected(&next)),
        }
    }

    /// Bracket literal `[A, B, ...C]`.
    fn parse_array(&mut self) -> Result<Type> {
        let open = self.bump()?;
        self.open(FrameKind::Array, open.start)?;
        let mut elements = Vec::new();

        while !self.peek_punct(']')? {
            let element = self.parse_union()?;
            let is_rest = matches!(element, Type::RestType { .. });
            elements.push(element);
            self.element_separator(']', is_rest)?;
        }

        self.close(FrameKind::Array)?;
        Ok(Type::ArrayType { elements })
    }

    /// Consume the `,` after a list element, or stop at `close`. A rest
    /// element may only be followed by the closer.
    fn element_separator(&mut self, close: char, is_rest: bool) -> Result<()> {
        let next = self.peek()?;
        match next.token {
            Token::Punct(',') => {
                self.pos = next.end;
                if is_rest && !self.peek_punct(close)? {
                    return Err(DocError::syntax(
                        "rest element must be last",
                        next.start,
                    ));
                }
                Ok(())
            }
            Token::Punct(c) if c == close => Ok(()),
            _ => Err(self.unexpected(&next)),
        }
    }

    /// `function(this:T, new:U, a:b, c=, ...d): R`, positioned at `(`.
    fn parse_function(&mut self) -> Result<Type> {
        let open = self.bump()?;
        self.open(FrameKind::Params, open.start)?;
        let mut params = Vec::new();
        let mut this = None;
        let mut new = None;

        while !self.peek_punct(')')? {
            let mut is_rest = false;
            match self.param_label()? {
                Some(label) if label == "this" => this = Some(Box::new(self.parse_union()?)),
                Some(label) if label == "new" => new = Some(Box::new(self.parse_union()?)),
                Some(label) => {
                    let expression = self.parse_union()?;
                    params.push(named_param(label, expression));
                }
                None => {
                    let param = self.parse_union()?;
                    is_rest = matches!(param, Type::RestType { .. });
                    params.push(param);
                }
            }
            self.element_separator(')', is_rest)?;
        }
        self.close(FrameKind::Params)?;

        let result = if self.eat_punct(':')? {
            self.check_depth()?;
            self.results += 1;
            let result = self.parse_type_expr();
            self.results -= 1;
            Some(Box::new(result?))
        } else {
            None
        };

        Ok(Type::FunctionType {
            params,
            result,
            this,
            new,
        })
    }

    /// A `name:` prefix inside a parameter list.
    fn param_label(&mut self) -> Result<Option<String>> {
        let save = self.pos;
        let next = self.peek_label()?;
        if let Token::Name(name) = next.token {
            self.pos = next.end;
            if self.eat_punct(':')? {
                return Ok(Some(name));
            }
        }
        self.pos = save;
        Ok(None)
    }

    /// `Name<A, B>` or `Name.<A, B>`; returns `base` when no application follows.
    fn parse_application(&mut self, base: Type) -> Result<Type> {
        let next = self.peek()?;
        if !matches!(next.token, Token::Punct('<') | Token::DotLt) {
            return Ok(base);
        }
        self.pos = next.end;
        self.open(FrameKind::Application, next.start)?;

        let mut applications = Vec::new();
        loop {
            applications.push(self.parse_union()?);
            let next = self.peek()?;
            match next.token {
                Token::Punct(',') => self.pos = next.end,
                Token::Punct('>') => break,
                _ => return Err(self.unexpected(&next)),
            }
        }

        self.close(FrameKind::Application)?;
        Ok(Type::application(base, applications))
    }
}

/// `a:b=` is an optional parameter named `a`, not a parameter of optional type.
fn named_param(name: String, expression: Type) -> Type {
    match expression {
        Type::OptionalType { expression } => Type::optional(Type::ParameterType { name, expression }),
        other => Type::ParameterType {
            name,
            expression: Box::new(other),
        },
    }
}

fn octal_run(bytes: &[u8], idx: usize) -> Option<usize> {
    if bytes.get(idx) != Some(&b'0') {
        return None;
    }
    let mut end = idx + 1;
    while end < bytes.len() && (b'0'..=b'7').contains(&bytes[end]) {
        end += 1;
    }
    let followed_by_decimal = matches!(bytes.get(end), Some(b'8' | b'9' | b'.' | b'e' | b'E'));
    (end > idx + 1 && !followed_by_decimal).then_some(end)
}

fn radix_value(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
}

fn take_hex<I>(chars: &mut std::iter::Peekable<I>, count: usize) -> Option<u32>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut code = 0u32;
    for _ in 0..count {
        let (_, c) = chars.next_if(|&(_, c)| c.is_ascii_hexdigit())?;
        code = code * 16 + c.to_digit(16)?;
    }
    Some(code)
}
