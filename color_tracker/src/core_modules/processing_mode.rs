// THEORY:
// The processing mode is the single selector deciding what the engine does with
// a frame. It is a closed set of variants; every transition is an unconditional
// jump triggered by an explicit operator command.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingMode {
    /// Frames pass through untouched.
    #[default]
    Raw,
    Hue,
    Saturation,
    Value,
    /// Every tracked color is located and annotated.
    Tracker,
    /// The cleaned mask of the latest tracked color.
    Mask,
}

impl ProcessingMode {
    pub const ALL: [ProcessingMode; 6] = [
        ProcessingMode::Raw,
        ProcessingMode::Hue,
        ProcessingMode::Saturation,
        ProcessingMode::Value,
        ProcessingMode::Tracker,
        ProcessingMode::Mask,
    ];

    /// Whether clicks should register reference colors.
    pub fn accepts_clicks(self) -> bool {
        self == ProcessingMode::Tracker
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingMode::Raw => "RAW",
            ProcessingMode::Hue => "HUE",
            ProcessingMode::Saturation => "SATURATION",
            ProcessingMode::Value => "VALUE",
            ProcessingMode::Tracker => "TRACKER",
            ProcessingMode::Mask => "MASK",
        };
        f.write_str(name)
    }
}
