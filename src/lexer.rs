// ABOUTME: Tokenizes a single source line into an ordered token list

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_while1};
use nom::character::complete::{char, one_of};
use nom::combinator::recognize;
use nom::{IResult, Parser};

const TWO_CHAR_OPS: [&str; 8] = ["<<", ">>", "<=", ">=", "==", "!=", "=<", "=>"];
const PUNCTUATION: &str = "=+*/()%<>{}:!@#$^&-";

/// Matches a quoted string but keeps the surrounding quote characters in the
/// token itself — stripping is `get_val`'s job (spec §4.2), not the lexer's.
fn quoted(quote: char) -> impl Fn(&str) -> IResult<&str, String> {
    move |input: &str| {
        let (rest, matched) =
            recognize((char(quote), take_till(|c| c == quote), char(quote))).parse(input)?;
        Ok((rest, matched.to_string()))
    }
}

/// `-?digit+(.digit*)?`. Hand-rolled rather than composed from nom's numeric
/// combinators: nom 8's `recognize` over a tuple containing a nested
/// `opt(preceded(char('.'), digit0))` silently mis-tracks the consumed length
/// for the all-ASCII fast path, truncating the fractional part.
fn number(input: &str) -> IResult<&str, String> {
    let bytes = input.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    Ok((&input[end..], input[..end].to_string()))
}

fn two_char_op(input: &str) -> IResult<&str, String> {
    for op in TWO_CHAR_OPS {
        if let Ok((rest, matched)) = tag::<_, _, nom::error::Error<&str>>(op).parse(input) {
            return Ok((rest, matched.to_string()));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, matched) =
        take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)?;
    Ok((rest, matched.to_string()))
}

fn punctuation(input: &str) -> IResult<&str, String> {
    let (rest, c) = one_of(PUNCTUATION).parse(input)?;
    Ok((rest, c.to_string()))
}

fn token(input: &str) -> IResult<&str, String> {
    alt((
        quoted('"'),
        quoted('\''),
        number,
        two_char_op,
        identifier,
        punctuation,
    ))
    .parse(input)
}

/// Splits a single logical line into tokens, skipping any characters that
/// match none of the alternatives. Pure: the same line always yields the
/// same token list.
pub fn lex(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        match token(rest) {
            Ok((remaining, tok)) => {
                tokens.push(tok);
                rest = remaining.trim_start();
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str().trim_start();
            }
        }
    }
    tokens
}
