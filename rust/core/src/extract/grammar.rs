// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! nom primitives shared by the phrase patterns
//!
//! Keywords match case-insensitively and are separated by one or more
//! whitespace characters. Parenthesized groups are captured raw and only
//! converted to numbers when an entity is built, so a group with a bad
//! number still consumes its phrase.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till1, take_while1},
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, peek, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;

/// Numeric components of a parenthesized group
pub type Components = SmallVec<[f64; 4]>;

/// One or more whitespace characters
pub fn ws1(input: &str) -> IResult<&str, ()> {
    map(take_while1(char::is_whitespace), |_| ())(input)
}

/// Case-insensitive keyword
pub fn kw<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    tag_no_case(word)
}

/// Keywords separated by whitespace: `phrase(&["wall", "from"])`
pub fn phrase<'a>(words: &'static [&'static str]) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
    move |mut input: &'a str| {
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                let (rest, _) = ws1(input)?;
                input = rest;
            }
            let (rest, _) = kw(*word)(input)?;
            input = rest;
        }
        Ok((input, ()))
    }
}

/// Identifier made of word characters (`living_room`, `sofa`, `2b`)
pub fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Decimal literal without exponent: `3`, `-2`, `2.75`
pub fn decimal_str(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

pub fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(decimal_str, |s: &str| lexical_core::parse::<f64>(s.as_bytes()))(input)
}

/// Unsigned decimal literal: `2`, `0.75`
pub fn unsigned_decimal(input: &str) -> IResult<&str, f64> {
    map_res(recognize(pair(digit1, opt(pair(char('.'), digit1)))), |s: &str| {
        lexical_core::parse::<f64>(s.as_bytes())
    })(input)
}

/// Non-negative integer index (`wall 3`)
pub fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// Signed integer (`floor -1`)
pub fn integer(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i32>()
    })(input)
}

/// Raw contents of `( ... )`, at least one character
pub fn group(input: &str) -> IResult<&str, &str> {
    delimited(char('('), take_till1(|c: char| c == ')'), char(')'))(input)
}

/// `\s+ <words> \s+ <number>`, the number required
pub fn clause<'a>(words: &'static [&'static str]) -> impl FnMut(&'a str) -> IResult<&'a str, f64> {
    preceded(pair(ws1, phrase(words)), preceded(ws1, unsigned_decimal))
}

/// `\s+ <words> [\s+ <number>]`, the number optional
pub fn loose_clause<'a>(
    words: &'static [&'static str],
) -> impl FnMut(&'a str) -> IResult<&'a str, Option<f64>> {
    preceded(pair(ws1, phrase(words)), opt(preceded(ws1, unsigned_decimal)))
}

/// `\s+ <words> \s+ ( ... )`
pub fn group_clause<'a>(
    words: &'static [&'static str],
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(pair(ws1, phrase(words)), preceded(ws1, group))
}

/// `\s+ <words> \s+ <identifier>`
pub fn word_clause<'a>(
    words: &'static [&'static str],
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(pair(ws1, phrase(words)), preceded(ws1, word))
}

/// A direction token: a word such as `north`, or a decimal radian value
///
/// A word is only taken when whitespace follows it, so `1.57` is read as a
/// number rather than the word `1`.
pub fn direction(input: &str) -> IResult<&str, &str> {
    alt((terminated(word, peek(ws1)), decimal_str))(input)
}

/// Split a raw group on commas and parse each component
///
/// `None` if any component is not a number.
pub fn components(raw: &str) -> Option<Components> {
    raw.split(',')
        .map(|part| lexical_core::parse::<f64>(part.trim().as_bytes()).ok())
        .collect()
}

/// Run `parser` at every position of `text`, collecting non-overlapping
/// matches left to right
///
/// After a match the scan resumes where the match ended; otherwise it
/// advances one character.
pub fn scan_all<'a, O, P>(text: &'a str, mut parser: P) -> Vec<O>
where
    P: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match parser(rest) {
            Ok((remaining, output)) if remaining.len() < rest.len() => {
                matches.push(output);
                pos = text.len() - remaining.len();
            }
            _ => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_is_case_insensitive() {
        assert_eq!(phrase(&["wall", "from"])("Wall   FROM ("), Ok((" (", ())));
        assert!(phrase(&["wall", "from"])("wallfrom").is_err());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("2.8 and"), Ok((" and", 2.8)));
        assert_eq!(decimal("-3"), Ok(("", -3.0)));
        // Trailing dot is left for the caller
        assert_eq!(decimal("2."), Ok((".", 2.0)));
        assert!(unsigned_decimal("-3").is_err());
    }

    #[test]
    fn test_clauses() {
        assert_eq!(
            clause(&["with", "height"])(" with  height 3.5 and"),
            Ok((" and", 3.5))
        );
        assert!(clause(&["with", "height"])(" with height tall").is_err());
        assert_eq!(
            loose_clause(&["and", "thickness"])(" and thickness"),
            Ok(("", None))
        );
        assert_eq!(word_clause(&["and", "style"])(" and style doric."), Ok((".", "doric")));
    }

    #[test]
    fn test_group_and_components() {
        let (rest, raw) = group("(0, 1.5,2) to").unwrap();
        assert_eq!(rest, " to");
        assert_eq!(components(raw).unwrap().as_slice(), &[0.0, 1.5, 2.0]);
        assert!(group("()").is_err());
        assert!(components("1,x").is_none());
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction("north with"), Ok((" with", "north")));
        assert_eq!(direction("1.57 with"), Ok((" with", "1.57")));
    }

    #[test]
    fn test_scan_all_non_overlapping() {
        let found = scan_all("ab ab aab", |i| kw("ab")(i));
        assert_eq!(found.len(), 3);

        let found = scan_all("ééab", |i| kw("ab")(i));
        assert_eq!(found, vec!["ab"]);
    }
}
