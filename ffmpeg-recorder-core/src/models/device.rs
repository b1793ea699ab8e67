use serde::{Deserialize, Serialize};

/// A camera the encoder can capture from in default-device mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoDevice {
    pub name: String,
    pub is_available: bool,
}

/// A microphone the encoder can capture from in default-device mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioDevice {
    pub name: String,
    pub is_default_input: bool,
}

impl VideoDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_available: true,
        }
    }

    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }
}

impl AudioDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_default_input: true,
        }
    }
}
