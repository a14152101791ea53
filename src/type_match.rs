//! Type-name normalization and comparison.
//!
//! Type names arrive as plain strings from the extraction layer and are often
//! only partially resolved (simple name only, or still carrying generic
//! arguments). Everything here is pure and allocation-light so it can be called
//! from any lookup path.

/// Strip generic parameters: everything from the first `<` onward is dropped.
///
/// Nested generics need no special handling because only the first `<` matters.
///
/// ```
/// use beannav::type_match::extract_raw_type;
///
/// assert_eq!(extract_raw_type("Repository<Map<String, User>>"), "Repository");
/// assert_eq!(extract_raw_type("  UserService "), "UserService");
/// ```
#[must_use]
pub fn extract_raw_type(ty: &str) -> &str {
    match ty.find('<') {
        Some(pos) => ty[..pos].trim(),
        None => ty.trim(),
    }
}

/// Raw type with path-style separators (`/`, `\`) rewritten to `.`.
#[must_use]
pub fn normalize_fqn(ty: &str) -> String {
    extract_raw_type(ty)
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '.' } else { c })
        .collect()
}

/// Final dot-delimited segment of an already normalized name.
#[must_use]
pub fn simple_name(normalized: &str) -> &str {
    normalized.rsplit('.').next().unwrap_or(normalized)
}

/// Whether two type references plausibly name the same type.
///
/// Exact match after normalization wins; otherwise the simple names are
/// compared, which lets `UserRepository` match `com.example.UserRepository`.
/// Empty inputs never match anything.
#[must_use]
pub fn matches_interface(a: &str, b: &str) -> bool {
    let a = normalize_fqn(a);
    let b = normalize_fqn(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    let (sa, sb) = (simple_name(&a), simple_name(&b));
    !sa.is_empty() && !sb.is_empty() && sa == sb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_raw_type_plain() {
        assert_eq!(extract_raw_type("com.example.UserService"), "com.example.UserService");
    }

    #[test]
    fn test_extract_raw_type_generic() {
        assert_eq!(extract_raw_type("Repository<User>"), "Repository");
        assert_eq!(extract_raw_type("java.util.List <String>"), "java.util.List");
    }

    #[test]
    fn test_extract_raw_type_nested_generic() {
        assert_eq!(extract_raw_type("Map<String, List<Order>>"), "Map");
    }

    #[test]
    fn test_extract_raw_type_leading_bracket() {
        assert_eq!(extract_raw_type("<T>"), "");
    }

    #[test]
    fn test_normalize_fqn_separators() {
        assert_eq!(normalize_fqn("com/example/UserService"), "com.example.UserService");
        assert_eq!(normalize_fqn("com\\example\\UserService<T>"), "com.example.UserService");
    }

    #[test]
    fn test_normalize_fqn_trims() {
        assert_eq!(normalize_fqn("   PaymentService\t"), "PaymentService");
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("com.example.UserService"), "UserService");
        assert_eq!(simple_name("UserService"), "UserService");
        assert_eq!(simple_name("com.example."), "");
    }

    #[test]
    fn test_matches_interface_exact() {
        assert!(matches_interface("com.example.UserRepository", "com.example.UserRepository"));
    }

    #[test]
    fn test_matches_interface_short_name_fallback() {
        assert!(matches_interface("UserRepository", "com.example.UserRepository"));
        assert!(matches_interface("com.other.UserRepository", "com.example.UserRepository"));
    }

    #[test]
    fn test_matches_interface_generics_erased() {
        assert!(matches_interface("Repository<Order>", "Repository<User>"));
    }

    #[test]
    fn test_matches_interface_different_names() {
        assert!(!matches_interface("com.example.UserRepository", "com.example.OrderRepository"));
    }

    #[test]
    fn test_matches_interface_empty() {
        assert!(!matches_interface("", ""));
        assert!(!matches_interface("UserService", "   "));
        assert!(!matches_interface("<T>", "UserService"));
    }

    #[test]
    fn test_matches_interface_trailing_dot() {
        // simple name of "com.example." is empty, so only exact equality can match
        assert!(!matches_interface("com.example.", "org.example."));
        assert!(matches_interface("com.example.", "com.example."));
    }
}
