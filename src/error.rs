use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeotagError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error{}: {}", code_suffix(.code), .message)]
    Api { code: Option<i64>, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeotagError {
    pub fn api(message: impl Into<String>) -> Self {
        GeotagError::Api {
            code: None,
            message: message.into(),
        }
    }
}

// CSV failures are file failures from the caller's point of view
impl From<csv::Error> for GeotagError {
    fn from(e: csv::Error) -> Self {
        GeotagError::Io(e.into())
    }
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" {}", c)).unwrap_or_default()
}

pub type GeotagResult<T> = Result<T, GeotagError>;
