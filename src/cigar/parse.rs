use super::{CigarDialect, CigarError, CigarOp, CigarOpKind, CigarSequence};

/// A run before its operation code has been checked
type RawOp<'a> = (&'a str, u32);

///////////////////////////////
/// Parse a cigar string of the given dialect. The whole string is tokenized
/// first; operation codes are only checked once the grammar is known to be fine
pub fn parse(cigar: &str, dialect: CigarDialect) -> Result<CigarSequence, CigarError> {
    let raw = match dialect {
        CigarDialect::Ensembl => tokenize_ensembl(cigar)?,
        CigarDialect::Exonerate => tokenize_exonerate(cigar)?,
    };
    validate_ops(cigar, raw)
}

/// Parse "10M2D5M"
pub fn parse_ensembl(cigar: &str) -> Result<CigarSequence, CigarError> {
    parse(cigar, CigarDialect::Ensembl)
}

/// Parse "M 10 D 2 M 5"
pub fn parse_exonerate(cigar: &str) -> Result<CigarSequence, CigarError> {
    parse(cigar, CigarDialect::Exonerate)
}

fn tokenize_ensembl(cigar: &str) -> Result<Vec<RawOp<'_>>, CigarError> {
    if cigar.is_empty() {
        return Err(CigarError::malformed(cigar, Some("empty string")));
    }

    let mut raw = Vec::new();
    let mut digits_from: Option<usize> = None;
    for (i, c) in cigar.char_indices() {
        if c.is_ascii_digit() {
            if digits_from.is_none() {
                digits_from = Some(i);
            }
            continue;
        }

        //A token ends on a letter; which letter is checked later
        if !c.is_alphabetic() {
            return Err(CigarError::malformed(
                cigar,
                Some(format!("'{}' at position {} is neither a digit nor an operation letter", c, i)),
            ));
        }
        let len = match digits_from.take() {
            Some(from) => parse_run_length(cigar, &cigar[from..i])?,
            None => 1,
        };
        raw.push((&cigar[i..i + c.len_utf8()], len));
    }

    if digits_from.is_some() {
        return Err(CigarError::malformed(
            cigar,
            Some("run length at the end is not followed by an operation"),
        ));
    }
    Ok(raw)
}

fn tokenize_exonerate(cigar: &str) -> Result<Vec<RawOp<'_>>, CigarError> {
    let fields: Vec<&str> = cigar.split_whitespace().collect();
    if fields.is_empty() {
        return Err(CigarError::malformed(cigar, Some("empty string")));
    }
    if fields.len() % 2 != 0 {
        return Err(CigarError::malformed(
            cigar,
            Some(format!("expected operation/length pairs, got {} tokens", fields.len())),
        ));
    }

    fields
        .chunks(2)
        .map(|pair| Ok((pair[0], parse_run_length(cigar, pair[1])?)))
        .collect()
}

fn parse_run_length(cigar: &str, text: &str) -> Result<u32, CigarError> {
    let len: u32 = text.parse().map_err(|_| {
        CigarError::malformed(cigar, Some(format!("'{}' is not a valid run length", text)))
    })?;
    if len == 0 {
        return Err(CigarError::malformed(cigar, Some("zero-length run")));
    }
    Ok(len)
}

fn validate_ops(cigar: &str, raw: Vec<RawOp<'_>>) -> Result<CigarSequence, CigarError> {
    let mut ops = Vec::with_capacity(raw.len());
    for (code, len) in raw {
        let mut chars = code.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => CigarOpKind::from_code(c),
            _ => None,
        };
        match kind {
            Some(kind) => ops.push(CigarOp::new(kind, len)),
            None => return Err(CigarError::invalid_operation(code, cigar)),
        }
    }
    Ok(CigarSequence::new(ops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use CigarOpKind::*;

    fn ops(list: &[(CigarOpKind, u32)]) -> CigarSequence {
        CigarSequence::new(list.iter().map(|(k, l)| CigarOp::new(*k, *l)).collect())
    }

    #[test]
    fn ensembl_basic() {
        let cigar = parse_ensembl("10M2D5M").unwrap();
        assert_eq!(cigar, ops(&[(Match, 10), (Deletion, 2), (Match, 5)]));
    }

    #[test]
    fn ensembl_implicit_length() {
        let cigar = parse_ensembl("M3IMD").unwrap();
        assert_eq!(
            cigar,
            ops(&[(Match, 1), (Insertion, 3), (Match, 1), (Deletion, 1)])
        );
    }

    #[test]
    fn ensembl_multi_digit() {
        let cigar = parse_ensembl("1234M56I7D").unwrap();
        assert_eq!(cigar, ops(&[(Match, 1234), (Insertion, 56), (Deletion, 7)]));
    }

    #[test]
    fn ensembl_empty() {
        assert!(matches!(
            parse_ensembl(""),
            Err(CigarError::MalformedCigar { .. })
        ));
    }

    #[test]
    fn ensembl_trailing_digits() {
        assert!(matches!(
            parse_ensembl("10M25"),
            Err(CigarError::MalformedCigar { .. })
        ));
        //Grammar errors win over bad codes
        assert!(matches!(
            parse_ensembl("5X3"),
            Err(CigarError::MalformedCigar { .. })
        ));
    }

    #[test]
    fn ensembl_zero_and_overflow() {
        assert!(matches!(
            parse_ensembl("0M"),
            Err(CigarError::MalformedCigar { .. })
        ));
        assert!(matches!(
            parse_ensembl("99999999999M"),
            Err(CigarError::MalformedCigar { .. })
        ));
    }

    #[test]
    fn ensembl_non_letter_code() {
        for bad in ["5M 3D", "10M*", "5M-3D", "3=4M"] {
            assert!(
                matches!(parse_ensembl(bad), Err(CigarError::MalformedCigar { .. })),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn ensembl_invalid_code() {
        let err = parse_ensembl("5M3X2M").unwrap_err();
        assert_eq!(
            err,
            CigarError::InvalidOperationCode {
                code: "X".to_string(),
                cigar: "5M3X2M".to_string()
            }
        );
        //Soft clips, skips and lower case are letters outside M/I/D
        for bad in ["5S10M", "3M100N3M", "5m"] {
            assert!(matches!(
                parse_ensembl(bad),
                Err(CigarError::InvalidOperationCode { .. })
            ));
        }
    }

    #[test]
    fn exonerate_basic() {
        let cigar = parse_exonerate("M 10 D 2 M 5").unwrap();
        assert_eq!(cigar, ops(&[(Match, 10), (Deletion, 2), (Match, 5)]));

        //Any whitespace separates tokens
        let cigar = parse_exonerate("  M 10\tI 3   M 1\n").unwrap();
        assert_eq!(cigar, ops(&[(Match, 10), (Insertion, 3), (Match, 1)]));
    }

    #[test]
    fn exonerate_odd_tokens() {
        assert!(matches!(
            parse_exonerate("M 10 D"),
            Err(CigarError::MalformedCigar { .. })
        ));
        assert!(matches!(
            parse_exonerate("   "),
            Err(CigarError::MalformedCigar { .. })
        ));
    }

    #[test]
    fn exonerate_bad_length() {
        assert!(matches!(
            parse_exonerate("M ten"),
            Err(CigarError::MalformedCigar { .. })
        ));
        assert!(matches!(
            parse_exonerate("M -3"),
            Err(CigarError::MalformedCigar { .. })
        ));
    }

    #[test]
    fn exonerate_invalid_code() {
        assert!(matches!(
            parse_exonerate("M 5 X 3"),
            Err(CigarError::InvalidOperationCode { .. })
        ));
        assert!(matches!(
            parse_exonerate("MD 5"),
            Err(CigarError::InvalidOperationCode { .. })
        ));
    }

    #[test]
    fn dialects_agree() {
        assert_eq!(
            parse_ensembl("10M2D5M").unwrap(),
            parse_exonerate("M 10 D 2 M 5").unwrap()
        );
    }
}
