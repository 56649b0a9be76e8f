use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error in {path} line {line}: {detail}")]
    StoreParse {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("profile '{profile}': {key} {detail}")]
    ProfileField {
        profile: String,
        key: String,
        detail: String,
    },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("No config existing, add profiles first")]
    NoStore,

    #[error("Profile must be provided")]
    MissingProfileName,

    #[error("failed to load {path}: {source}")]
    LibraryLoad {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("symbol {symbol} missing from ryzenadj library: {source}")]
    Symbol {
        symbol: String,
        source: libloading::Error,
    },

    #[error("RyzenAdj could not get initialized")]
    Init,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Usage messages that are printed as-is rather than as an error report.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::NoStore | Error::MissingProfileName)
    }
}
