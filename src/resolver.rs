//! Interface resolver: the disambiguation cascade for interface-typed
//! injection points.
//!
//! Precedence mirrors the container's runtime selection: qualifier (label, then
//! bean name) beats primary, primary beats a lone candidate, and anything left
//! over is ambiguous. Outcomes are reported only through [`ResolutionResult`].

use serde::Serialize;
use tracing::debug;

use crate::model::{BeanDefinition, SourceLocation};
use crate::type_match::matches_interface;

/// Input to [`resolve`]. Built per request, never stored.
#[derive(Debug, Clone)]
pub struct DisambiguationContext<'a> {
    pub interface_fqn: String,
    pub raw_type: String,
    pub qualifier_hint: Option<String>,
    /// Candidates in registration order.
    pub candidate_beans: Vec<&'a BeanDefinition>,
    /// Only used for diagnostics.
    pub source_location: Option<SourceLocation>,
}

impl<'a> DisambiguationContext<'a> {
    pub fn new(interface_fqn: impl Into<String>, candidate_beans: Vec<&'a BeanDefinition>) -> Self {
        let interface_fqn = interface_fqn.into();
        let raw_type = crate::type_match::extract_raw_type(&interface_fqn).to_string();
        Self {
            interface_fqn,
            raw_type,
            qualifier_hint: None,
            candidate_beans,
            source_location: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, hint: Option<impl Into<String>>) -> Self {
        self.qualifier_hint = hint.map(Into::into);
        self
    }

    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }
}

/// Outcome of [`resolve`]: exactly one of these.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", content = "beans", rename_all = "camelCase")]
pub enum ResolutionResult<'a> {
    /// The only candidate left after interface filtering.
    Single(&'a BeanDefinition),
    /// The one candidate flagged primary.
    Primary(&'a BeanDefinition),
    /// The one candidate selected by the qualifier hint.
    Qualified(&'a BeanDefinition),
    /// Ambiguous; candidates in registration order.
    Multiple(Vec<&'a BeanDefinition>),
    None,
}

impl<'a> ResolutionResult<'a> {
    /// The selected bean, if the result is unambiguous.
    pub fn bean(&self) -> Option<&'a BeanDefinition> {
        match self {
            Self::Single(b) | Self::Primary(b) | Self::Qualified(b) => Some(*b),
            Self::Multiple(_) | Self::None => None,
        }
    }

    /// Every bean the result refers to (one, many, or none).
    pub fn beans(&self) -> Vec<&'a BeanDefinition> {
        match self {
            Self::Single(b) | Self::Primary(b) | Self::Qualified(b) => vec![*b],
            Self::Multiple(all) => all.clone(),
            Self::None => Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.bean().is_some()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::Primary(_) => "primary",
            Self::Qualified(_) => "qualified",
            Self::Multiple(_) => "multiple",
            Self::None => "none",
        }
    }
}

/// Whether `bean` belongs to the candidate set for `ctx`. Beans without any
/// recorded interface fall back to comparing their own type, since extraction
/// may have stopped before interfaces were backfilled.
fn implements_target(bean: &BeanDefinition, ctx: &DisambiguationContext<'_>) -> bool {
    if bean.implemented_interfaces.is_empty() {
        return matches_interface(&bean.ty, &ctx.interface_fqn)
            || matches_interface(&bean.ty, &ctx.raw_type);
    }
    bean.implements(&ctx.interface_fqn)
}

/// Narrow `ctx.candidate_beans` to a single bean, an explicit ambiguity, or nothing.
pub fn resolve<'a>(ctx: &DisambiguationContext<'a>) -> ResolutionResult<'a> {
    let filtered: Vec<&'a BeanDefinition> = ctx
        .candidate_beans
        .iter()
        .copied()
        .filter(|bean| implements_target(bean, ctx))
        .collect();

    if let Some(hint) = ctx.qualifier_hint.as_deref() {
        let mut matches: Vec<&'a BeanDefinition> =
            filtered.iter().copied().filter(|b| b.has_qualifier(hint)).collect();
        if matches.is_empty() {
            matches = filtered.iter().copied().filter(|b| b.name == hint).collect();
        }
        match matches.len() {
            0 => debug!(interface = %ctx.interface_fqn, qualifier = hint, "Qualifier matched nothing"),
            1 => return ResolutionResult::Qualified(matches[0]),
            _ => return ResolutionResult::Multiple(matches),
        }
    }

    let primaries: Vec<&'a BeanDefinition> = filtered.iter().copied().filter(|b| b.is_primary).collect();
    match primaries.len() {
        0 => {}
        1 => return ResolutionResult::Primary(primaries[0]),
        // the container refuses to start here; surface it as plain ambiguity
        _ => debug!(
            interface = %ctx.interface_fqn,
            count = primaries.len(),
            location = ?ctx.source_location,
            "Several primary beans"
        ),
    }

    match filtered.len() {
        0 => ResolutionResult::None,
        1 => ResolutionResult::Single(filtered[0]),
        _ => ResolutionResult::Multiple(filtered),
    }
}
