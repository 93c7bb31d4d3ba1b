//! The fixed field vocabulary of the artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How records under a field are shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldFlavor {
    /// Records are `[type, value]` pairs.
    Variable,
    /// Records are opaque text blobs (definitions, function bodies).
    Item,
}

/// A recognized field name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    ConstantVars,
    PresetVars,
    ConfigVars,
    CustomTypes,
    Dataclasses,
    SszObjects,
    Functions,
}

impl FieldKind {
    /// Every field, in display order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::ConstantVars,
        FieldKind::PresetVars,
        FieldKind::ConfigVars,
        FieldKind::CustomTypes,
        FieldKind::Dataclasses,
        FieldKind::SszObjects,
        FieldKind::Functions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConstantVars => "constant_vars",
            Self::PresetVars => "preset_vars",
            Self::ConfigVars => "config_vars",
            Self::CustomTypes => "custom_types",
            Self::Dataclasses => "dataclasses",
            Self::SszObjects => "ssz_objects",
            Self::Functions => "functions",
        }
    }

    pub fn flavor(&self) -> FieldFlavor {
        match self {
            Self::ConstantVars | Self::PresetVars | Self::ConfigVars => FieldFlavor::Variable,
            Self::CustomTypes | Self::Dataclasses | Self::SszObjects | Self::Functions => {
                FieldFlavor::Item
            }
        }
    }

    pub fn is_variable(&self) -> bool {
        self.flavor() == FieldFlavor::Variable
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownField(s.to_string()))
    }
}
