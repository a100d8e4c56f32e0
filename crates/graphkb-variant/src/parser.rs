//! `nom`-based grammar for structural variant expressions.
//!
//! Supports a simplified HGVS-like notation: `<reference>:<prefix>.<position><change>`,
//! e.g. `KRAS:p.G12D`, `NM_004333:c.1799T>A`, `EGFR:p.E746_A750del`, plus a
//! two-reference rearrangement form `<ref1>,<ref2>:<prefix>.<pos>_<prefix>.<pos>`.
//! This is not a full HGVS parser — it covers the shapes the keyword-search
//! fallback (§4.3.5) needs to recognize before handing off to the similarity-aware
//! compiler, nothing more.

use crate::error::ParsingError;
use crate::types::{CoordinateType, ParsedVariant, Position, PositionRange, VariantType};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, char, digit1, one_of},
    combinator::{map, map_res, opt},
    sequence::{pair, preceded, separated_pair, tuple},
    IResult,
};

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn reference(input: &str) -> IResult<&str, &str> {
    take_while1(is_reference_char)(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>())(input)
}

fn signed_offset(input: &str) -> IResult<&str, i64> {
    map_res(
        opt(pair(one_of("+-"), digit1)),
        |sign_and_digits: Option<(char, &str)>| -> Result<i64, std::num::ParseIntError> {
            match sign_and_digits {
                Some(('-', digits)) => Ok(-digits.parse::<i64>()?),
                Some((_, digits)) => digits.parse::<i64>(),
                None => Ok(0),
            }
        },
    )(input)
}

fn coordinate_prefix(input: &str) -> IResult<&str, CoordinateType> {
    map(
        pair(one_of("gcpeyn"), char('.')),
        |(c, _)| match c {
            'g' => CoordinateType::Genomic,
            'c' => CoordinateType::Coding,
            'p' => CoordinateType::Protein,
            'e' => CoordinateType::Exonic,
            'y' => CoordinateType::Cytoband,
            _ => CoordinateType::NonCoding,
        },
    )(input)
}

fn position(coord: CoordinateType, input: &str) -> IResult<&str, Position> {
    match coord {
        CoordinateType::Genomic => map(integer, Position::Genomic)(input),
        CoordinateType::Exonic => map(integer, Position::Exonic)(input),
        CoordinateType::Coding => {
            map(pair(integer, signed_offset), |(pos, offset)| Position::Coding { pos, offset })(input)
        }
        CoordinateType::NonCoding => {
            map(pair(integer, signed_offset), |(pos, offset)| Position::NonCoding { pos, offset })(
                input,
            )
        }
        CoordinateType::Protein => map(
            pair(opt(alpha1), integer),
            |(ref_aa, pos): (Option<&str>, i64)| Position::Protein {
                pos,
                ref_aa: ref_aa.and_then(|s| s.chars().next()),
            },
        )(input),
        CoordinateType::Cytoband => map(
            tuple((one_of("pq"), integer, opt(preceded(char('.'), integer)))),
            |(arm, major, minor)| Position::Cytoband { arm, major, minor },
        )(input),
    }
}

fn position_range(coord: CoordinateType, input: &str) -> IResult<&str, PositionRange> {
    let (rest, start) = position(coord, input)?;
    let (rest, end) = opt(preceded(char('_'), |i| position(coord, i)))(rest)?;
    Ok((rest, PositionRange { start, end }))
}

/// A change suffix: refSeq/altSeq letters, or a digit count for `ins`/`dup` sizes.
fn seq_or_size(input: &str) -> IResult<&str, (Option<&str>, Option<i64>)> {
    alt((
        map(alpha1, |s| (Some(s), None)),
        map_res(digit1, |s: &str| s.parse::<i64>().map(|n| (None, Some(n)))),
    ))(input)
}

fn change_nucleotide(input: &str) -> IResult<&str, (VariantType, Option<&str>, Option<&str>, Option<i64>)> {
    let (rest, ref_seq) = opt(alpha1)(input)?;

    alt((
        map(preceded(char('>'), alpha1), move |alt_seq| {
            (VariantType::Substitution, ref_seq, Some(alt_seq), None)
        }),
        map(preceded(tag("delins"), seq_or_size), move |(seq, size)| {
            (VariantType::DeletionInsertion, ref_seq, seq, size)
        }),
        map(preceded(tag("del"), opt(seq_or_size)), move |suffix| {
            let (seq, size) = suffix.unwrap_or((None, None));
            (VariantType::Deletion, ref_seq, seq, size)
        }),
        map(preceded(tag("dup"), opt(seq_or_size)), move |suffix| {
            let (seq, size) = suffix.unwrap_or((None, None));
            (VariantType::Duplication, ref_seq, seq, size)
        }),
        map(preceded(tag("ins"), seq_or_size), move |(seq, size)| {
            (VariantType::Insertion, ref_seq, seq, size)
        }),
    ))(rest)
}

fn change_protein(input: &str) -> IResult<&str, (VariantType, Option<&str>, Option<&str>, Option<i64>)> {
    alt((
        map(tag("delins"), |_| (VariantType::DeletionInsertion, None, None, None)),
        map(tag("del"), |_| (VariantType::Deletion, None, None, None)),
        map(tag("dup"), |_| (VariantType::Duplication, None, None, None)),
        map(alpha1, |alt_seq| (VariantType::Substitution, None, Some(alt_seq), None)),
    ))(input)
}

fn single_reference_variant(input: &str) -> IResult<&str, ParsedVariant> {
    let (rest, reference1) = reference(input)?;
    let (rest, _) = char(':')(rest)?;
    let (rest, coord) = coordinate_prefix(rest)?;
    let (rest, break1) = position_range(coord, rest)?;

    let is_range = break1.is_range();
    let change_parser = if coord == CoordinateType::Protein {
        change_protein
    } else {
        change_nucleotide
    };

    let (rest, change) = if is_range || matches!(coord, CoordinateType::Exonic | CoordinateType::Cytoband) {
        (rest, None)
    } else {
        opt(change_parser)(rest)?
    };

    let (variant_type, ref_seq, alt_seq, alt_size) =
        change.unwrap_or((VariantType::Substitution, None, None, None));

    Ok((
        rest,
        ParsedVariant {
            reference1: reference1.to_string(),
            reference2: None,
            coordinate_type: coord,
            variant_type,
            break1,
            break2: None,
            ref_seq: ref_seq.map(str::to_string),
            untemplated_seq: alt_seq.map(str::to_string),
            untemplated_seq_size: alt_size,
        },
    ))
}

fn two_reference_variant(input: &str) -> IResult<&str, ParsedVariant> {
    let (rest, (reference1, reference2)) = separated_pair(reference, char(','), reference)(input)?;
    let (rest, _) = char(':')(rest)?;

    let (rest, coord1) = coordinate_prefix(rest)?;
    let (rest, break1) = map(|i| position(coord1, i), PositionRange::single)(rest)?;
    let (rest, _) = char('_')(rest)?;
    let (rest, coord2) = coordinate_prefix(rest)?;
    let (rest, break2) = map(|i| position(coord2, i), PositionRange::single)(rest)?;

    Ok((
        rest,
        ParsedVariant {
            reference1: reference1.to_string(),
            reference2: Some(reference2.to_string()),
            coordinate_type: coord1,
            variant_type: VariantType::DeletionInsertion,
            break1,
            break2: Some(break2),
            ref_seq: None,
            untemplated_seq: None,
            untemplated_seq_size: None,
        },
    ))
}

/// Parse a structural variant expression, e.g. `KRAS:p.G12D`.
///
/// Returns a `ParsingError` (never panics) on anything that doesn't fit the
/// grammar; the caller treats that as "fall back to plain keyword search."
pub fn parse_variant(input: &str) -> Result<ParsedVariant, ParsingError> {
    let trimmed = input.trim();
    let result = alt((two_reference_variant, single_reference_variant))(trimmed);

    match result {
        Ok((rest, parsed)) if rest.is_empty() => Ok(parsed),
        Ok((rest, _)) => Err(ParsingError::new(format!(
            "unparsed trailing input: {rest:?}"
        ))),
        Err(e) => Err(ParsingError::new(format!("grammar mismatch: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_protein_substitution() {
        let parsed = parse_variant("KRAS:p.G12D").unwrap();
        assert_eq!(parsed.reference1, "KRAS");
        assert_eq!(parsed.coordinate_type, CoordinateType::Protein);
        assert_eq!(parsed.variant_type, VariantType::Substitution);
        assert_eq!(parsed.untemplated_seq.as_deref(), Some("D"));
        assert!(matches!(
            parsed.break1.start,
            Position::Protein { pos: 12, ref_aa: Some('G') }
        ));
    }

    #[test]
    fn parses_coding_substitution() {
        let parsed = parse_variant("NM_004333:c.1799T>A").unwrap();
        assert_eq!(parsed.reference1, "NM_004333");
        assert_eq!(parsed.variant_type, VariantType::Substitution);
        assert_eq!(parsed.ref_seq.as_deref(), Some("T"));
        assert_eq!(parsed.untemplated_seq.as_deref(), Some("A"));
    }

    #[test]
    fn parses_genomic_substitution() {
        let parsed = parse_variant("chr7:g.140453136A>T").unwrap();
        assert_eq!(parsed.coordinate_type, CoordinateType::Genomic);
        assert!(matches!(parsed.break1.start, Position::Genomic(140453136)));
    }

    #[test]
    fn parses_protein_range_deletion() {
        let parsed = parse_variant("EGFR:p.E746_A750del").unwrap();
        assert_eq!(parsed.variant_type, VariantType::Deletion);
        assert!(parsed.break1.is_range());
    }

    #[test]
    fn parses_two_reference_rearrangement() {
        let parsed = parse_variant("BCR,ABL1:e.1_e.2").unwrap();
        assert_eq!(parsed.reference1, "BCR");
        assert_eq!(parsed.reference2.as_deref(), Some("ABL1"));
        assert!(parsed.break2.is_some());
    }

    #[test]
    fn rejects_plain_keyword() {
        assert!(parse_variant("braf").is_err());
        assert!(parse_variant("some disease name").is_err());
    }

    // A position too large for i64 must fail to parse, not panic (§6.3, §9).
    #[test]
    fn overflowing_position_falls_back_to_a_parsing_error_instead_of_panicking() {
        let result = parse_variant("KRAS:g.999999999999999999999999999999A>T");
        assert!(result.is_err());
    }
}
