use crate::{lexer::Token, turtle::MoveCmd};

/// What a line does, decided by its first token.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatementKind {
    FunctionDeclaration,
    VariableDeclaration,
    PenMovement(MoveCmd),
    PenColor,
    AddAssign,
    If,
    While,
    Comment,
    Erroneous,
}

// There is deliberately no catch-all arm: adding a token forces a decision here.
pub fn classify(first: Token) -> StatementKind {
    use StatementKind::*;

    match first {
        Token::PenUp => PenMovement(MoveCmd::PenUp),
        Token::PenDown => PenMovement(MoveCmd::PenDown),
        Token::Forward => PenMovement(MoveCmd::Forward),
        Token::Back => PenMovement(MoveCmd::Back),
        Token::Left => PenMovement(MoveCmd::Left),
        Token::Right => PenMovement(MoveCmd::Right),
        Token::Turn => PenMovement(MoveCmd::Turn),
        Token::SetHeading => PenMovement(MoveCmd::SetHeading),
        Token::SetX => PenMovement(MoveCmd::SetX),
        Token::SetY => PenMovement(MoveCmd::SetY),
        Token::SetPenColor => PenColor,
        Token::AddAssign => AddAssign,
        Token::To => FunctionDeclaration,
        Token::Make => VariableDeclaration,
        Token::If => If,
        Token::While => While,
        Token::Comment => Comment,

        Token::LParen
        | Token::RParen
        | Token::LBrace
        | Token::RBrace
        | Token::Comma
        | Token::Minus
        | Token::Plus
        | Token::Slash
        | Token::Star
        | Token::Quote
        | Token::Eq
        | Token::Ne
        | Token::Gt
        | Token::Lt
        | Token::And
        | Token::Or
        | Token::False
        | Token::True
        | Token::XCor
        | Token::YCor
        | Token::Heading
        | Token::Color
        | Token::Ident
        | Token::Word
        | Token::Var
        | Token::End
        | Token::Number
        | Token::Invalid => Erroneous,
    }
}
