use nom::{
    branch::alt,
    character::complete::{alpha1, alphanumeric1, char},
    combinator::{all_consuming, recognize},
    multi::many0,
    number::complete::double,
    sequence::pair,
    IResult,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    // Punctuation.
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Minus,
    Plus,
    Slash,
    Star,
    Quote,

    // Comparisons and boolean operators.
    Eq,
    Ne,
    Gt,
    Lt,
    And,
    Or,
    False,
    True,
    AddAssign,

    // Turtle commands.
    PenUp,
    PenDown,
    Forward,
    Back,
    Left,
    Right,
    SetPenColor,
    Turn,
    SetHeading,
    SetX,
    SetY,

    // Queries.
    XCor,
    YCor,
    Heading,
    Color,

    /// A bare name, like the `square` in `to square`.
    Ident,
    /// A quoted word, like `"len` or `"10`.
    Word,
    /// A variable reference, like `:len`.
    Var,
    To,
    End,
    Number,

    Make,
    If,
    While,

    Comment,
    Invalid,
}

/// A single word of a line, together with its classification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lexeme<'a> {
    pub word: &'a str,
    pub token: Token,
}

impl<'a> Lexeme<'a> {
    /// The text of a quoted word, without the leading `"`.
    pub fn quoted(&self) -> Option<&'a str> {
        match self.token {
            Token::Word => self.word.strip_prefix('"'),
            _ => None,
        }
    }

    /// The name of a variable reference, without the leading `:`.
    pub fn var_name(&self) -> Option<&'a str> {
        match self.token {
            Token::Var => self.word.strip_prefix(':'),
            _ => None,
        }
    }
}

/// Split `text` wherever `is_sep` matches, dropping empty pieces.
pub fn split(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    text.split(|c: char| is_sep(c))
        .filter(|w| !w.is_empty())
        .collect()
}

fn keyword(word: &str) -> Option<Token> {
    Some(match word {
        "(" => Token::LParen,
        ")" => Token::RParen,
        "{" => Token::LBrace,
        "}" => Token::RBrace,
        "," => Token::Comma,
        "-" => Token::Minus,
        "+" => Token::Plus,
        "/" => Token::Slash,
        "*" => Token::Star,
        "\"" => Token::Quote,

        "==" => Token::Eq,
        "!=" => Token::Ne,
        ">" => Token::Gt,
        "<" => Token::Lt,
        "and" => Token::And,
        "or" => Token::Or,
        "false" => Token::False,
        "true" => Token::True,
        "addassign" => Token::AddAssign,

        "penup" => Token::PenUp,
        "pendown" => Token::PenDown,
        "forward" => Token::Forward,
        "back" => Token::Back,
        "left" => Token::Left,
        "right" => Token::Right,
        "setpencolor" => Token::SetPenColor,
        "turn" => Token::Turn,
        "setheading" => Token::SetHeading,
        "setx" => Token::SetX,
        "sety" => Token::SetY,

        "xcor" => Token::XCor,
        "ycor" => Token::YCor,
        "heading" => Token::Heading,
        "color" => Token::Color,

        "to" => Token::To,
        "end" => Token::End,
        "make" => Token::Make,
        "if" => Token::If,
        "while" => Token::While,

        "//" => Token::Comment,
        _ => return None,
    })
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alpha1,
        many0(alt((alphanumeric1, recognize(char('_'))))),
    ))(input)
}

fn is_ident(word: &str) -> bool {
    all_consuming(ident)(word).is_ok()
}

/// Parse a numeric literal, rejecting words like `inf` or `nan` that only look like names.
pub fn number(word: &str) -> Option<f64> {
    let first = word.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '.' | '-' | '+')) {
        return None;
    }
    all_consuming(double::<&str, nom::error::Error<&str>>)(word)
        .ok()
        .map(|(_, x)| x)
}

/// Classify a single word.
///
/// Keywords are matched case-insensitively. Words starting with `:` are variable references and
/// never go through the keyword table, so `:forward` is a variable and not a command.
pub fn token_for(word: &str) -> Token {
    if word.starts_with(':') {
        return if is_ident(&word[1..]) {
            Token::Var
        } else {
            Token::Invalid
        };
    }
    if let Some(tok) = keyword(&word.to_lowercase()) {
        return tok;
    }
    if word.len() > 1 && word.starts_with('"') {
        Token::Word
    } else if number(word).is_some() {
        Token::Number
    } else if is_ident(word) {
        Token::Ident
    } else {
        Token::Invalid
    }
}

pub fn tokenize(line: &str) -> Vec<Lexeme<'_>> {
    split(line, char::is_whitespace)
        .into_iter()
        .map(|word| Lexeme {
            word,
            token: token_for(word),
        })
        .collect()
}
