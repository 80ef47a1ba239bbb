//! Output identifier resolution for type names.

use crate::error::ConvertError;
use crate::types::ConvertOptions;

/// Kinds whose definitions embed the JSON Schema meta-schema; inlining them
/// produces documents no validator accepts, so stand-alone mode rejects
/// them up front.
const STANDALONE_INCOMPATIBLE_KINDS: &[&str] = &[
    "jsonschemaprops",
    "jsonschemapropsorarray",
    "customresourcevalidation",
    "customresourcedefinition",
    "customresourcedefinitionspec",
    "customresourcedefinitionlist",
    "jsonschemapropsorstringarray",
    "jsonschemapropsorbool",
];

/// Derive the output file base name for a type.
///
/// The base name is the last dot-segment of the type name (its kind). In
/// Kubernetes expanded mode the name is namespaced by API group and
/// version, taken from the two segments preceding the kind:
/// `{kind}-{version}` for the `core` and `api` groups,
/// `{kind}-{group}-{version}` otherwise.
///
/// # Errors
///
/// Returns `UnsupportedType` in Kubernetes stand-alone mode for kinds in
/// the known-incompatible denylist.
pub fn resolve_name(type_name: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let segments: Vec<&str> = type_name.split('.').collect();
    let kind = segments.last().copied().unwrap_or(type_name);

    if options.kubernetes
        && options.stand_alone
        && STANDALONE_INCOMPATIBLE_KINDS.contains(&kind.to_lowercase().as_str())
    {
        return Err(ConvertError::UnsupportedType {
            name: type_name.to_string(),
            reason: "embeds the JSON Schema meta-schema".into(),
        });
    }

    if options.kubernetes && options.expanded && segments.len() >= 3 {
        let group = segments[segments.len() - 3];
        let version = segments[segments.len() - 2];
        let resolved = if group == "core" || group == "api" {
            format!("{kind}-{version}")
        } else {
            format!("{kind}-{group}-{version}")
        };
        return Ok(resolved);
    }

    Ok(kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ConvertOptions {
        ConvertOptions::new("out")
    }

    #[test]
    fn plain_name_is_its_own_kind() {
        assert_eq!(resolve_name("Pet", &options()).unwrap(), "Pet");
    }

    #[test]
    fn dotted_name_resolves_to_kind() {
        assert_eq!(
            resolve_name("io.k8s.api.apps.v1.Deployment", &options()).unwrap(),
            "Deployment"
        );
    }

    #[test]
    fn expanded_namespaces_by_group_and_version() {
        let options = options().kubernetes(true).expanded(true);
        assert_eq!(
            resolve_name("io.k8s.api.apps.v1.Deployment", &options).unwrap(),
            "Deployment-apps-v1"
        );
    }

    #[test]
    fn expanded_core_group_omits_group() {
        let options = options().kubernetes(true).expanded(true);
        assert_eq!(
            resolve_name("io.k8s.api.core.v1.Pod", &options).unwrap(),
            "Pod-v1"
        );
    }

    #[test]
    fn expanded_without_kubernetes_keeps_kind() {
        let options = options().expanded(true);
        assert_eq!(
            resolve_name("io.k8s.api.apps.v1.Deployment", &options).unwrap(),
            "Deployment"
        );
    }

    #[test]
    fn expanded_short_name_keeps_kind() {
        let options = options().kubernetes(true).expanded(true);
        assert_eq!(resolve_name("Pet", &options).unwrap(), "Pet");
    }

    #[test]
    fn denylisted_kind_rejected_in_standalone_kubernetes() {
        let options = options().kubernetes(true).stand_alone(true);
        let err = resolve_name(
            "io.k8s.apiextensions-apiserver.pkg.apis.apiextensions.v1.JSONSchemaProps",
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedType { .. }));
    }

    #[test]
    fn denylisted_kind_allowed_without_standalone() {
        let options = options().kubernetes(true);
        assert_eq!(
            resolve_name(
                "io.k8s.apiextensions-apiserver.pkg.apis.apiextensions.v1.JSONSchemaProps",
                &options,
            )
            .unwrap(),
            "JSONSchemaProps"
        );
    }
}
