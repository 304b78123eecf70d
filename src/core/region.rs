//! Tokenizer and parser for region expressions.
//!
//! Grammar:
//!
//! ```text
//! region := locus '-' locus
//! locus  := chrom ':' number
//! chrom  := "chr" ( "1".."22" | "X" | "Y" | "MT" )
//! number := digit+
//! ```
//!
//! The whole input must match; there is no trimming and no partial recovery.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::validation::MAX_REGION_INPUT_LENGTH;

const CHROM_PREFIX: &str = "chr";

/// Non-numeric chromosome suffixes accepted after `chr`
const NAMED_CHROMOSOMES: [&str; 3] = ["MT", "X", "Y"];

/// Highest autosome number accepted after `chr`
const MAX_AUTOSOME: u32 = 22;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("Invalid region '{input}': expected {expected} at offset {offset}")]
    InvalidFormat {
        input: String,
        offset: usize,
        expected: &'static str,
    },
}

impl RegionError {
    fn invalid(input: &str, offset: usize, expected: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            offset,
            expected,
        }
    }
}

/// A pair of loci delimiting a genomic range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start_chrom: String,
    pub start_pos: u64,
    pub end_chrom: String,
    pub end_pos: u64,
}

impl Region {
    pub fn new(
        start_chrom: impl Into<String>,
        start_pos: u64,
        end_chrom: impl Into<String>,
        end_pos: u64,
    ) -> Self {
        Self {
            start_chrom: start_chrom.into(),
            start_pos,
            end_chrom: end_chrom.into(),
            end_pos,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_chrom, self.start_pos, self.end_chrom, self.end_pos
        )
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_region(s)
    }
}

/// Lexical unit of a region expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Full chromosome name including the `chr` prefix
    Chrom(&'a str),
    Colon,
    Dash,
    Number(u64),
}

/// Every chromosome name the grammar accepts, in karyotype order.
#[must_use]
pub fn supported_chromosomes() -> Vec<String> {
    (1..=MAX_AUTOSOME)
        .map(|n| format!("{CHROM_PREFIX}{n}"))
        .chain(["X", "Y", "MT"].iter().map(|s| format!("{CHROM_PREFIX}{s}")))
        .collect()
}

/// Split a region expression into tokens, each paired with its byte offset.
///
/// # Errors
///
/// Returns `RegionError::InvalidFormat` at the first byte that cannot start a
/// token, for an unsupported chromosome suffix, or for a number that does not
/// fit in `u64`.
pub fn tokenize(input: &str) -> Result<Vec<(usize, Token<'_>)>, RegionError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b':' => {
                tokens.push((start, Token::Colon));
                i += 1;
            }
            b'-' => {
                tokens.push((start, Token::Dash));
                i += 1;
            }
            b'0'..=b'9' => {
                let end = digit_run_end(bytes, i);
                let value = input[i..end].parse::<u64>().map_err(|_| {
                    RegionError::invalid(input, start, "a position within the u64 range")
                })?;
                tokens.push((start, Token::Number(value)));
                i = end;
            }
            _ if input[i..].starts_with(CHROM_PREFIX) => {
                let end = chrom_suffix_end(input, start + CHROM_PREFIX.len())?;
                tokens.push((start, Token::Chrom(&input[start..end])));
                i = end;
            }
            _ => {
                return Err(RegionError::invalid(
                    input,
                    start,
                    "a chromosome, ':', '-' or a position",
                ));
            }
        }
    }

    Ok(tokens)
}

fn digit_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| from + n)
}

/// Find the end of the chromosome suffix starting at `from` (just past `chr`)
fn chrom_suffix_end(input: &str, from: usize) -> Result<usize, RegionError> {
    const EXPECTED: &str = "a chromosome number 1-22, X, Y or MT after 'chr'";
    let rest = &input[from..];

    if let Some(named) = NAMED_CHROMOSOMES.iter().find(|n| rest.starts_with(**n)) {
        return Ok(from + named.len());
    }

    let end = digit_run_end(input.as_bytes(), from);
    let digits = &input[from..end];
    // No leading zeros: chr01 is not a valid name
    if digits.is_empty() || digits.starts_with('0') {
        return Err(RegionError::invalid(input, from, EXPECTED));
    }
    match digits.parse::<u32>() {
        Ok(n) if (1..=MAX_AUTOSOME).contains(&n) => Ok(end),
        _ => Err(RegionError::invalid(input, from, EXPECTED)),
    }
}

/// Cursor over the token stream used by the grammar rules
struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.input.len(), |(offset, _)| *offset)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).map(|(_, t)| *t);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, want: Token<'static>, expected: &'static str) -> Result<(), RegionError> {
        let offset = self.offset();
        match self.next() {
            Some(t) if t == want => Ok(()),
            _ => Err(RegionError::invalid(self.input, offset, expected)),
        }
    }

    fn chrom(&mut self) -> Result<&'a str, RegionError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Chrom(name)) => Ok(name),
            _ => Err(RegionError::invalid(self.input, offset, "a chromosome")),
        }
    }

    fn number(&mut self) -> Result<u64, RegionError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            _ => Err(RegionError::invalid(self.input, offset, "a position")),
        }
    }

    fn locus(&mut self) -> Result<(&'a str, u64), RegionError> {
        let chrom = self.chrom()?;
        self.expect(Token::Colon, "':'")?;
        let pos = self.number()?;
        Ok((chrom, pos))
    }

    fn region(&mut self) -> Result<Region, RegionError> {
        let (start_chrom, start_pos) = self.locus()?;
        self.expect(Token::Dash, "'-'")?;
        let (end_chrom, end_pos) = self.locus()?;

        if self.pos != self.tokens.len() {
            return Err(RegionError::invalid(
                self.input,
                self.offset(),
                "end of input",
            ));
        }

        Ok(Region::new(start_chrom, start_pos, end_chrom, end_pos))
    }
}

/// Parse a region expression such as `chr2:1000-chr2:2000`.
///
/// # Errors
///
/// Returns `RegionError::InvalidFormat` for any input that does not match the
/// grammar in full, including empty or over-long input.
pub fn parse_region(input: &str) -> Result<Region, RegionError> {
    if input.len() > MAX_REGION_INPUT_LENGTH {
        return Err(RegionError::invalid(
            input,
            MAX_REGION_INPUT_LENGTH,
            "a shorter region expression",
        ));
    }

    let tokens = tokenize(input)?;
    Parser {
        input,
        tokens,
        pos: 0,
    }
    .region()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_same_chromosome() {
        let region = parse_region("chr2:1000-chr2:2000").unwrap();
        assert_eq!(region, Region::new("chr2", 1000, "chr2", 2000));
    }

    #[test]
    fn test_parse_across_chromosomes() {
        let region = parse_region("chrX:5-chrMT:16000").unwrap();
        assert_eq!(region.start_chrom, "chrX");
        assert_eq!(region.start_pos, 5);
        assert_eq!(region.end_chrom, "chrMT");
        assert_eq!(region.end_pos, 16000);
    }

    #[test]
    fn test_every_supported_chromosome_parses() {
        let names = supported_chromosomes();
        assert_eq!(names.len(), 25);

        for name in &names {
            let input = format!("{name}:0-{name}:1");
            let region = parse_region(&input).unwrap();
            assert_eq!(&region.start_chrom, name);
            assert_eq!(&region.end_chrom, name);
        }
    }

    #[test]
    fn test_rejects_malformed_input() {
        let rejected = [
            "",
            "chrZ:1-chr1:5",
            "chr1:1000-chr1:abc",
            "chr1:1000",
            "chr1:1000-",
            "chr1:1000_chr1:2000",
            "chr1-1000-chr1:2000",
            "chr1:1000-chr1:2000 ",
            " chr1:1000-chr1:2000",
            "xchr1:1000-chr1:2000",
            "chr1:1000-chr1:2000-",
            "chr1:1000-chr1:2000chr1",
            "Chr2:1000-chr2:2000",
            "chrx:1-chr1:5",
            "chrM:1-chr1:5",
            "chr0:1-chr1:5",
            "chr23:1-chr1:5",
            "chr01:1-chr1:5",
            "chr:1-chr1:5",
            "chr1:-5-chr1:10",
            "chr1:1.5-chr1:10",
            "chr1:1000--chr1:2000",
            "chr1::1000-chr1:2000",
        ];

        for input in rejected {
            assert!(
                matches!(parse_region(input), Err(RegionError::InvalidFormat { .. })),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_region("chr1:1000-chr1:abc").unwrap_err();
        let RegionError::InvalidFormat { offset, .. } = err;
        assert_eq!(offset, 15);
    }

    #[test]
    fn test_position_leading_zeros_accepted() {
        let region = parse_region("chr1:007-chr1:0100").unwrap();
        assert_eq!(region.start_pos, 7);
        assert_eq!(region.end_pos, 100);
    }

    #[test]
    fn test_position_overflow_rejected() {
        let input = "chr1:99999999999999999999999-chr1:1";
        assert!(parse_region(input).is_err());

        let max = format!("chr1:{}-chr1:{}", u64::MAX, u64::MAX);
        assert_eq!(parse_region(&max).unwrap().end_pos, u64::MAX);
    }

    #[test]
    fn test_rejects_over_long_input() {
        let input = format!("chr1:{}-chr1:1", "1".repeat(MAX_REGION_INPUT_LENGTH));
        assert!(parse_region(&input).is_err());
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<Token<'_>> = tokenize("chr7:10-chrY:2")
            .unwrap()
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::Chrom("chr7"),
                Token::Colon,
                Token::Number(10),
                Token::Dash,
                Token::Chrom("chrY"),
                Token::Colon,
                Token::Number(2),
            ]
        );
    }

    #[test]
    fn test_display_from_str() {
        let region: Region = "chr3:1-chr4:2".parse().unwrap();
        assert_eq!(region.to_string(), "chr3:1-chr4:2");
    }
}
