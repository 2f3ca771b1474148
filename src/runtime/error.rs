use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File at {:?} not found.", path)]
    FileNotFound { path: std::path::PathBuf },

    #[error("Failed parsing {}{}", context, Error::format_msg_as_detail(msg))]
    ParseError {
        context: String,
        msg: Option<String>,
    },

    #[error("Invalid option {}: {}", option, msg)]
    InvalidOption { option: String, msg: String },
}

impl Error {
    #[cold]
    pub fn file_not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn parse_error<C: Into<String>, M: Into<String>>(context: C, msg: Option<M>) -> Self {
        Error::ParseError {
            context: context.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn invalid_option<O: Into<String>, M: Into<String>>(option: O, msg: M) -> Self {
        Error::InvalidOption {
            option: option.into(),
            msg: msg.into(),
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}

///////////////////////////////
/// What to do with a record the cigar core rejects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorMode {
    /// Log a warning and continue with the next record
    Skip,
    /// Stop the command
    Abort,
}

impl std::str::FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_lowercase().as_str() {
            "skip" | "lenient" => ErrorMode::Skip,
            "abort" | "strict" => ErrorMode::Abort,
            _ => return Err(format!("Invalid error mode: {}", s)),
        };
        Ok(mode)
    }
}
