use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Switches for the optional parts of normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Default `status` to `visible`; when false `status` is dropped.
    pub emit_status: bool,
    /// Merge adjacent `Text` + `Input/text` siblings into one input.
    pub merge_label_inputs: bool,
    /// Fold kind/label/status of root and container nodes into `context`.
    pub fold_containers: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeProfile::default().options()
    }
}

/// Named combinations of [`NormalizeOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizeProfile {
    /// Defaults only, no `status` field.
    Minimal,
    /// Defaults with `status`.
    Standard,
    /// Standard plus label/input merging.
    LabelMerge,
    /// Standard plus container folding.
    ContainerFold,
    /// Everything.
    #[default]
    Full,
}

impl NormalizeProfile {
    pub const ALL: [NormalizeProfile; 5] = [
        NormalizeProfile::Minimal,
        NormalizeProfile::Standard,
        NormalizeProfile::LabelMerge,
        NormalizeProfile::ContainerFold,
        NormalizeProfile::Full,
    ];

    pub fn options(self) -> NormalizeOptions {
        match self {
            NormalizeProfile::Minimal => NormalizeOptions {
                emit_status: false,
                merge_label_inputs: false,
                fold_containers: false,
            },
            NormalizeProfile::Standard => NormalizeOptions {
                emit_status: true,
                merge_label_inputs: false,
                fold_containers: false,
            },
            NormalizeProfile::LabelMerge => NormalizeOptions {
                emit_status: true,
                merge_label_inputs: true,
                fold_containers: false,
            },
            NormalizeProfile::ContainerFold => NormalizeOptions {
                emit_status: true,
                merge_label_inputs: false,
                fold_containers: true,
            },
            NormalizeProfile::Full => NormalizeOptions {
                emit_status: true,
                merge_label_inputs: true,
                fold_containers: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NormalizeProfile::Minimal => "minimal",
            NormalizeProfile::Standard => "standard",
            NormalizeProfile::LabelMerge => "label-merge",
            NormalizeProfile::ContainerFold => "container-fold",
            NormalizeProfile::Full => "full",
        }
    }
}

impl fmt::Display for NormalizeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProfile(pub String);

impl fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = NormalizeProfile::ALL.iter().map(|p| p.as_str()).collect();
        write!(
            f,
            "unknown profile '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownProfile {}

impl FromStr for NormalizeProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        NormalizeProfile::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| UnknownProfile(s.to_string()))
    }
}
