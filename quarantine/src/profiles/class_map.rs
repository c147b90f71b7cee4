//! Workload-class → default profile name mapping (spec §3).

/// `ember` and `flame` are the two classes the spec treats as
/// already-risky by nature; `blaze` and `inferno` get the bare minimum.
/// Anything else fails safe to `quarantine` rather than `default`.
pub fn class_to_profile_name(class: &str) -> &'static str {
    match class {
        "ember" => "quarantine-strict",
        "flame" => "quarantine",
        "blaze" => "default",
        "inferno" => "default",
        _ => "quarantine",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_classes_map_as_specified() {
        assert_eq!(class_to_profile_name("ember"), "quarantine-strict");
        assert_eq!(class_to_profile_name("flame"), "quarantine");
        assert_eq!(class_to_profile_name("blaze"), "default");
        assert_eq!(class_to_profile_name("inferno"), "default");
    }

    #[test]
    fn unknown_class_fails_safe_to_quarantine() {
        assert_eq!(class_to_profile_name("spark"), "quarantine");
        assert_eq!(class_to_profile_name(""), "quarantine");
    }
}
