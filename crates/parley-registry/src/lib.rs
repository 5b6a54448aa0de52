//! parley-registry: manifest model for the component catalog
//!
//! Static data describing the installable UI components this project
//! distributes, in the shape component installers consume (`registry.json`).
//! No runtime coupling to the chat core; the manifest is generated by
//! `cargo xtask build-registry`.

use serde::{Deserialize, Serialize};

/// Kind of a registry entry or file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryKind {
    #[serde(rename = "registry:style")]
    Style,
    #[serde(rename = "registry:component")]
    Component,
    #[serde(rename = "registry:block")]
    Block,
}

/// A source file belonging to a registry item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Path within this repository
    pub path: String,
    #[serde(rename = "type")]
    pub kind: RegistryKind,
    /// Install destination in the consuming project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A named, installable unit of UI code with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RegistryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub files: Vec<RegistryFile>,
    /// npm package dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    /// Other registry items (by name or URL) this item needs
    #[serde(rename = "registryDependencies", skip_serializing_if = "Option::is_none")]
    pub registry_dependencies: Option<Vec<String>>,
    #[serde(rename = "cssVars", skip_serializing_if = "Option::is_none")]
    pub css_vars: Option<serde_json::Value>,
}

/// The full manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub name: String,
    pub homepage: String,
    pub items: Vec<RegistryItem>,
}

impl RegistryFile {
    fn component(path: &str, target: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: RegistryKind::Component,
            target: Some(target.to_string()),
        }
    }
}

/// The curated catalog served from `base_url`
pub fn default_registry(base_url: &str) -> Registry {
    Registry {
        schema: "https://ui.shadcn.com/schema/registry.json".to_string(),
        name: "ui-registry".to_string(),
        homepage: base_url.to_string(),
        items: vec![
            RegistryItem {
                name: "index".to_string(),
                kind: RegistryKind::Style,
                title: None,
                description: None,
                files: vec![],
                dependencies: Some(vec![
                    "tw-animate-css".to_string(),
                    "class-variance-authority".to_string(),
                    "@tabler/icons-react".to_string(),
                ]),
                registry_dependencies: Some(vec!["utils".to_string()]),
                css_vars: Some(serde_json::json!({})),
            },
            RegistryItem {
                name: "copy-button".to_string(),
                kind: RegistryKind::Component,
                title: Some("Copy Button".to_string()),
                description: Some(
                    "A button component with clipboard functionality and visual feedback"
                        .to_string(),
                ),
                files: vec![RegistryFile::component(
                    "registry/copy-button/copy-button.tsx",
                    "components/ui/copy-button.tsx",
                )],
                dependencies: Some(vec!["@tabler/icons-react".to_string()]),
                registry_dependencies: Some(vec!["button".to_string(), "tooltip".to_string()]),
                css_vars: None,
            },
            RegistryItem {
                name: "code".to_string(),
                kind: RegistryKind::Component,
                title: Some("Code".to_string()),
                description: Some(
                    "A component for displaying formatted code with syntax highlighting and language icons"
                        .to_string(),
                ),
                files: vec![RegistryFile::component(
                    "registry/code/code.tsx",
                    "components/ui/code.tsx",
                )],
                dependencies: Some(vec!["@tabler/icons-react".to_string()]),
                registry_dependencies: Some(vec![format!("{base_url}/r/copy-button.json")]),
                css_vars: None,
            },
            RegistryItem {
                name: "code-collapsible".to_string(),
                kind: RegistryKind::Component,
                title: Some("Code Collapsible".to_string()),
                description: Some(
                    "A collapsible component for code blocks with expand/collapse functionality"
                        .to_string(),
                ),
                files: vec![RegistryFile::component(
                    "registry/code-collapsible/code-collapsible.tsx",
                    "components/ui/code-collapsible.tsx",
                )],
                dependencies: None,
                registry_dependencies: Some(vec![
                    "button".to_string(),
                    "collapsible".to_string(),
                    "separator".to_string(),
                ]),
                css_vars: None,
            },
            RegistryItem {
                name: "auto-resize-textarea".to_string(),
                kind: RegistryKind::Component,
                title: Some("Auto Resize TextArea".to_string()),
                description: Some(
                    "A textarea component that automatically adjusts its height based on content"
                        .to_string(),
                ),
                files: vec![RegistryFile::component(
                    "registry/auto-resize-textarea/auto-resize-textarea.tsx",
                    "components/ui/auto-resize-textarea.tsx",
                )],
                dependencies: None,
                registry_dependencies: None,
                css_vars: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_set() {
        let registry = default_registry("http://localhost:3000");
        let names: Vec<&str> = registry.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "index",
                "copy-button",
                "code",
                "code-collapsible",
                "auto-resize-textarea"
            ]
        );
    }

    #[test]
    fn test_manifest_serialization_shape() {
        let registry = default_registry("https://ui.example.com");
        let json = serde_json::to_value(&registry).unwrap();

        assert_eq!(json["$schema"], "https://ui.shadcn.com/schema/registry.json");
        assert_eq!(json["homepage"], "https://ui.example.com");

        // Item kinds serialize with the registry: prefix
        assert_eq!(json["items"][0]["type"], "registry:style");
        assert_eq!(json["items"][1]["type"], "registry:component");

        // camelCase registry fields
        assert_eq!(json["items"][0]["registryDependencies"][0], "utils");
        assert!(json["items"][0].get("cssVars").is_some());

        // Absent optionals are omitted entirely
        let textarea = &json["items"][4];
        assert!(textarea.get("dependencies").is_none());
        assert!(textarea.get("registryDependencies").is_none());
        assert!(textarea.get("cssVars").is_none());

        // The index item keeps its empty files array
        assert_eq!(json["items"][0]["files"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_item_urls_derive_from_base_url() {
        let registry = default_registry("https://ui.example.com");
        let code = registry.items.iter().find(|i| i.name == "code").unwrap();
        assert_eq!(
            code.registry_dependencies.as_ref().unwrap()[0],
            "https://ui.example.com/r/copy-button.json"
        );
    }

    #[test]
    fn test_manifest_round_trips() {
        let registry = default_registry("http://localhost:3000");
        let json = serde_json::to_string(&registry).unwrap();
        let back: Registry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items.len(), registry.items.len());
        assert_eq!(back.items[1].files[0].target.as_deref(), Some("components/ui/copy-button.tsx"));
    }
}
