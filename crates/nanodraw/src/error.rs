use std::fmt;

/// Setup-time failure.
///
/// Every variant is produced by a creation call (context, program, buffer,
/// texture, font). Nothing in the per-frame path returns this type: capacity
/// exhaustion is absorbed by implicit flushes and unknown glyphs are skipped.
#[derive(Debug)]
pub enum DrawError {
    /// A shader program failed to parse, validate, or link.
    ProgramBuild { label: String, message: String },
    /// The backend could not allocate a buffer, texture, or device.
    Resource(String),
    /// A font could not be parsed or did not fit into its atlas.
    FontBake(String),
    /// A configuration value is outside its supported range.
    InvalidConfig(String),
    /// Reading a font file failed.
    Io(std::io::Error),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::ProgramBuild { label, message } => {
                write!(f, "failed to build program '{label}': {message}")
            }
            DrawError::Resource(msg) => write!(f, "resource creation failed: {msg}"),
            DrawError::FontBake(msg) => write!(f, "font bake failed: {msg}"),
            DrawError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            DrawError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DrawError {
    fn from(err: std::io::Error) -> Self {
        DrawError::Io(err)
    }
}
