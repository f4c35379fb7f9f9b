use crate::error::{ClawsError, Result};

/// Wrap a failure with a message describing what was being attempted
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ClawsError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ClawsError::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_gets_message_prefix() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .with_context(|| "Failed to read .claws/config.local.toml".to_string())
            .unwrap_err();

        assert!(matches!(err, ClawsError::Context { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to read .claws/config.local.toml: IO error: gone"
        );
    }

    #[test]
    fn test_session_error_kept_as_source() {
        let result: Result<()> = Err(ClawsError::AlreadyConnected);
        let err = result
            .with_context(|| format!("Failed to connect to {}", "ws://localhost:9000"))
            .unwrap_err();

        match err {
            ClawsError::Context { message, source } => {
                assert_eq!(message, "Failed to connect to ws://localhost:9000");
                assert!(matches!(*source, ClawsError::AlreadyConnected));
            }
            other => panic!("Expected Context error, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_passes_through_without_building_message() {
        let result: Result<u8> = Ok(7);
        let value = result
            .with_context(|| panic!("message built for a success"))
            .unwrap();
        assert_eq!(value, 7);
    }
}
