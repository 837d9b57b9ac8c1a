use serde::de::DeserializeOwned;

/// Path and message of a failed deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: String,
    pub message: String,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, T>(&mut de).map_err(|err| PathError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })?;
    // reject trailing garbage such as `{} {}`
    de.end().map_err(|err| PathError { path: ".".to_string(), message: err.to_string() })?;
    Ok(value)
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::InvalidConfig { path: err.path, message: err.message }
    }
}
