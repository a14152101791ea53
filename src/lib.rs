//! # beannav: static dependency-injection resolution engine
//!
//! Answers "which bean will the container inject here?" without running the
//! application. Facts extracted from source (beans, interfaces, injection
//! points) are indexed per file; navigation requests are routed to either the
//! interface disambiguation cascade or the concrete-type bean index.
//!
//! ## Library usage
//!
//! ```no_run
//! use beannav::{BeanWorkspace, facts};
//!
//! let mut ws = BeanWorkspace::new();
//! ws.ingest_all(facts::load_dir(std::path::Path::new("target/facts")).unwrap());
//! for diag in ws.diagnose() {
//!     println!("{} {}", diag.point.location, diag.status);
//! }
//! ```

pub mod beans;
pub mod error;
pub mod facts;
pub mod interfaces;
pub mod model;
pub mod resolver;
pub mod storage;
pub mod type_match;
pub mod workspace;

pub use beans::{load_snapshot, save_snapshot, BeanIndex, Candidate, IndexSnapshot, MatchReason, SNAPSHOT_VERSION};
pub use error::BeanError;
pub use facts::FactBatch;
pub use interfaces::InterfaceRegistry;
pub use model::{
    BeanDefinition, BeanInjectionPoint, BeanKind, DetectionMethod, ImplementationRelationship,
    InjectionSiteKind, InterfaceDefinition, SourceLocation,
};
pub use resolver::{resolve, DisambiguationContext, ResolutionResult};
pub use type_match::{extract_raw_type, matches_interface, normalize_fqn};
pub use workspace::{BeanWorkspace, InjectionStatus, Navigation};

// ─── Stable hashing ─────────────────────────────────────────────────

/// Stable FNV-1a hash (deterministic across Rust versions, unlike `DefaultHasher`).
///
/// Accepts multiple byte slices that are fed into the hash sequentially,
/// allowing callers to combine a directory path with a kind tag.
#[must_use]
pub fn stable_hash(parts: &[&[u8]]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
    let mut hash = FNV_OFFSET;
    for part in parts {
        for &byte in *part {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}


// ─── Property-based tests (proptest) ─────────────────────────────────
