//! Fact model: the entities extracted from source that the engine operates on.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::type_match::{extract_raw_type, matches_interface, normalize_fqn, simple_name};

// ─── Source Location ─────────────────────────────────────────────────

/// Position of a declaration in a source file. Lines and columns are 1-based;
/// zero means "unknown".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: PathBuf,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self { file: file.into(), line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

// ─── Bean Kind ───────────────────────────────────────────────────────

/// How a bean was declared.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum BeanKind {
    /// Stereotype-annotated class (`@Component`, `@Service`, `@Repository`, ...).
    #[default]
    Component,
    /// `@Bean` method inside a configuration class.
    FactoryMethod,
}

impl BeanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::FactoryMethod => "factoryMethod",
        }
    }
}

impl std::fmt::Display for BeanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BeanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" => Ok(Self::Component),
            "factorymethod" | "bean" => Ok(Self::FactoryMethod),
            other => Err(format!("Unknown bean kind: '{}'", other)),
        }
    }
}

// ─── Bean Definition ─────────────────────────────────────────────────

/// A named, typed unit the container can supply.
///
/// `name` is unique across a [`BeanIndex`](crate::BeanIndex); `ty` is not.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeanDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub kind: BeanKind,
    pub location: SourceLocation,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub qualifiers: BTreeSet<String>,
    /// Backfilled once interface extraction has run.
    #[serde(default)]
    pub implemented_interfaces: Vec<String>,
}

impl BeanDefinition {
    pub fn new(
        name: impl Into<String>,
        ty: impl Into<String>,
        kind: BeanKind,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            kind,
            location,
            is_primary: false,
            qualifiers: BTreeSet::new(),
            implemented_interfaces: Vec::new(),
        }
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    #[must_use]
    pub fn with_qualifier(mut self, label: impl Into<String>) -> Self {
        self.qualifiers.insert(label.into());
        self
    }

    #[must_use]
    pub fn implementing(mut self, interface_fqn: impl Into<String>) -> Self {
        self.implemented_interfaces.push(interface_fqn.into());
        self
    }

    pub fn file(&self) -> &Path {
        &self.location.file
    }

    pub fn has_qualifier(&self, label: &str) -> bool {
        self.qualifiers.contains(label)
    }

    /// Whether any recorded interface matches `interface_fqn` (generics erased,
    /// short-name fallback).
    pub fn implements(&self, interface_fqn: &str) -> bool {
        self.implemented_interfaces
            .iter()
            .any(|iface| matches_interface(iface, interface_fqn))
    }
}

// ─── Interface Definition ────────────────────────────────────────────

/// An interface or abstract class that beans may implement.
/// Abstract classes are handled exactly like interfaces.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDefinition {
    pub fully_qualified_name: String,
    #[serde(default)]
    pub simple_name: String,
    #[serde(default)]
    pub package_name: String,
    pub location: SourceLocation,
    #[serde(default)]
    pub is_abstract_class: bool,
    #[serde(default)]
    pub raw_type: String,
}

impl InterfaceDefinition {
    /// Derive simple name, package and raw type from a (possibly generic) FQN.
    pub fn from_fqn(fqn: &str, location: SourceLocation, is_abstract_class: bool) -> Self {
        let normalized = normalize_fqn(fqn);
        let simple = simple_name(&normalized).to_string();
        let package = match normalized.rfind('.') {
            Some(pos) => normalized[..pos].to_string(),
            None => String::new(),
        };
        Self {
            fully_qualified_name: normalized,
            raw_type: extract_raw_type(&simple).to_string(),
            simple_name: simple,
            package_name: package,
            location,
            is_abstract_class,
        }
    }

    /// Fill `simple_name`, `package_name` and `raw_type` when the extractor only
    /// supplied the FQN.
    pub fn with_derived_names(self) -> Self {
        if !self.simple_name.is_empty() && !self.raw_type.is_empty() {
            return self;
        }
        Self::from_fqn(&self.fully_qualified_name, self.location, self.is_abstract_class)
    }
}

// ─── Implementation Relationship ─────────────────────────────────────

/// How an interface → bean edge was discovered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum DetectionMethod {
    /// `class Foo implements Bar`.
    #[default]
    ImplementsClause,
    /// `@Bean Bar foo() { ... }`.
    FactoryMethodReturnType,
    /// `class Foo extends AbstractBar`.
    AbstractClassExtension,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImplementsClause => "implementsClause",
            Self::FactoryMethodReturnType => "factoryMethodReturnType",
            Self::AbstractClassExtension => "abstractClassExtension",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DetectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "implementsclause" | "implements" => Ok(Self::ImplementsClause),
            "factorymethodreturntype" | "factorymethod" => Ok(Self::FactoryMethodReturnType),
            "abstractclassextension" | "extends" => Ok(Self::AbstractClassExtension),
            other => Err(format!("Unknown detection method: '{}'", other)),
        }
    }
}

/// One recorded interface → bean edge. Beans are referenced by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRelationship {
    pub interface_fqn: String,
    pub bean_name: String,
    pub detection_method: DetectionMethod,
    /// Logical clock value, monotonically increasing per registry.
    pub recorded_at: u64,
}

// ─── Injection Point ─────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum InjectionSiteKind {
    #[default]
    Field,
    ConstructorParameter,
    /// Parameter of a constructor generated by Lombok (`@RequiredArgsConstructor`,
    /// `@AllArgsConstructor`).
    GeneratedConstructorParameter,
}

impl InjectionSiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::ConstructorParameter => "constructorParameter",
            Self::GeneratedConstructorParameter => "generatedConstructorParameter",
        }
    }
}

impl std::fmt::Display for InjectionSiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InjectionSiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "field" => Ok(Self::Field),
            "constructorparameter" | "constructor" => Ok(Self::ConstructorParameter),
            "generatedconstructorparameter" | "lombok" => Ok(Self::GeneratedConstructorParameter),
            other => Err(format!("Unknown injection site kind: '{}'", other)),
        }
    }
}

/// A site in source code that requires a bean.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeanInjectionPoint {
    pub requested_type: String,
    /// `@Qualifier("...")` value.
    #[serde(default)]
    pub qualifier_hint: Option<String>,
    /// `@Resource(name = "...")` or an equivalent explicit bean reference.
    #[serde(default)]
    pub explicit_bean_name: Option<String>,
    pub location: SourceLocation,
    #[serde(default)]
    pub site_kind: InjectionSiteKind,
    /// Declaring class, when the extractor knows it.
    #[serde(default)]
    pub owner: Option<String>,
}

impl BeanInjectionPoint {
    pub fn new(requested_type: impl Into<String>, location: SourceLocation, site_kind: InjectionSiteKind) -> Self {
        Self {
            requested_type: requested_type.into(),
            qualifier_hint: None,
            explicit_bean_name: None,
            location,
            site_kind,
            owner: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, hint: impl Into<String>) -> Self {
        self.qualifier_hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_bean_name(mut self, name: impl Into<String>) -> Self {
        self.explicit_bean_name = Some(name.into());
        self
    }

    pub fn file(&self) -> &Path {
        &self.location.file
    }
}
