use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("Malformed cigar string '{}'{}", cigar, CigarError::format_msg_as_detail(msg))]
    MalformedCigar { cigar: String, msg: Option<String> },

    #[error("Invalid cigar operation '{}' in '{}'. Valid operations are M, I and D", code, cigar)]
    InvalidOperationCode { code: String, cigar: String },

    #[error("Invalid cigar dialect '{}'. Valid dialects are ensembl and exonerate", dialect)]
    InvalidDialect { dialect: String },

    #[error("Invalid strand '{}'. Valid strands are +, -, 1 and -1", strand)]
    InvalidStrand { strand: String },

    #[error("Invalid intron operation '{}'. Valid intron operations are I and D", intron)]
    InvalidIntronPolicy { intron: String },

    #[error(
        "Calculated max coordinate {} != expected max coordinate {}. Check that the correct intron operation was used",
        CigarError::format_found(found),
        expected
    )]
    CoordinateMismatch { expected: u64, found: Option<u64> },
}

impl CigarError {
    #[cold]
    pub fn malformed<C: Into<String>, M: Into<String>>(cigar: C, msg: Option<M>) -> Self {
        CigarError::MalformedCigar {
            cigar: cigar.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn invalid_operation<O: Into<String>, C: Into<String>>(code: O, cigar: C) -> Self {
        CigarError::InvalidOperationCode {
            code: code.into(),
            cigar: cigar.into(),
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }

    fn format_found(found: &Option<u64>) -> String {
        match found {
            Some(f) => f.to_string(),
            None => "<no blocks>".to_string(),
        }
    }
}
