//! Core data types for the bean index.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::model::{BeanDefinition, BeanInjectionPoint};

// ─── Match Reason ────────────────────────────────────────────────────

/// Why a bean was offered as a candidate for an injection point.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MatchReason {
    QualifierMatch,
    NameMatch,
    Primary,
    TypeMatch,
    SubtypeMatch,
}

impl MatchReason {
    /// Fixed ranking score; higher is a stronger match.
    pub fn score(&self) -> u32 {
        match self {
            Self::QualifierMatch => 100,
            Self::NameMatch => 90,
            Self::Primary => 80,
            Self::TypeMatch => 70,
            Self::SubtypeMatch => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QualifierMatch => "qualifierMatch",
            Self::NameMatch => "nameMatch",
            Self::Primary => "primary",
            Self::TypeMatch => "typeMatch",
            Self::SubtypeMatch => "subtypeMatch",
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ranked lookup result.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub bean: &'a BeanDefinition,
    pub reason: MatchReason,
}

impl Candidate<'_> {
    pub fn score(&self) -> u32 {
        self.reason.score()
    }
}

// ─── Bean Index ──────────────────────────────────────────────────────

/// Store of every known bean and injection point.
///
/// Beans and injection points live in slot vectors; evicted entries become
/// tombstones (`None`) so that slot numbers, which double as registration
/// order, stay stable until [`BeanIndex::compact`] runs. All secondary
/// indexes hold slot numbers in ascending order.
#[derive(Debug, Default)]
pub struct BeanIndex {
    pub(crate) beans: Vec<Option<BeanDefinition>>,
    /// bean name -> slot
    pub(crate) name_index: HashMap<String, u32>,
    /// simple name of the normalized bean type -> slots
    pub(crate) type_index: HashMap<String, Vec<u32>>,
    /// qualifier label -> slots
    pub(crate) qualifier_index: HashMap<String, Vec<u32>>,
    /// simple name of each implemented interface -> slots
    pub(crate) interface_index: HashMap<String, Vec<u32>>,
    /// source file -> bean slots
    pub(crate) file_index: HashMap<PathBuf, Vec<u32>>,
    pub(crate) injection_points: Vec<Option<BeanInjectionPoint>>,
    /// source file -> injection point slots
    pub(crate) point_file_index: HashMap<PathBuf, Vec<u32>>,
}

/// Summary counters, used by `info` and diagnostics.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeanIndexStats {
    pub beans: usize,
    pub injection_points: usize,
    pub files: usize,
    pub tombstones: usize,
}
