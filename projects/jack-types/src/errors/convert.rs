use super::*;

impl From<std::io::Error> for JackError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}
