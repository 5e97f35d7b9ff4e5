//! Messaging configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Messaging gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Path the WebSocket endpoint is mounted on
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Inbound text frames larger than this are dropped
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Longest accepted message text, in characters
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Frames queued per connection before deliveries to it are refused
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

impl MessagingConfig {
    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.ws_path.starts_with('/') {
            return Err(ValidationError::InvalidWsPath(self.ws_path.clone()));
        }
        if self.max_frame_bytes == 0 {
            return Err(ValidationError::InvalidFrameSize);
        }
        if self.max_text_chars == 0 {
            return Err(ValidationError::InvalidTextLimit);
        }
        if self.outbound_queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            ws_path: default_ws_path(),
            max_frame_bytes: default_max_frame_bytes(),
            max_text_chars: default_max_text_chars(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
        }
    }
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_max_frame_bytes() -> usize {
    16 * 1024
}

fn default_max_text_chars() -> usize {
    4000
}

fn default_outbound_queue_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messaging_config_defaults() {
        let config = MessagingConfig::default();
        assert_eq!(config.ws_path, "/ws");
        assert_eq!(config.max_frame_bytes, 16384);
        assert_eq!(config.max_text_chars, 4000);
        assert_eq!(config.outbound_queue_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_relative_ws_path() {
        for path in ["", "ws"] {
            let config = MessagingConfig {
                ws_path: path.to_string(),
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidWsPath(_))
            ));
        }
    }

    #[test]
    fn test_validation_zero_limits() {
        let config = MessagingConfig {
            max_frame_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MessagingConfig {
            max_text_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MessagingConfig {
            outbound_queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidQueueCapacity)
        ));
    }
}
