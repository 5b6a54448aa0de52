use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("build-registry") => build_registry(),
        Some(cmd) => anyhow::bail!("Unknown command: {cmd}"),
        None => {
            eprintln!("Usage: cargo xtask <command>");
            eprintln!("Commands:");
            eprintln!("  build-registry    Generate registry.json from the component catalog");
            Ok(())
        }
    }
}

/// Serialize the default catalog to registry.json at the workspace root.
fn build_registry() -> Result<()> {
    let base_url =
        std::env::var("REGISTRY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let registry = parley_registry::default_registry(&base_url);
    let json = serde_json::to_string_pretty(&registry).context("serializing registry")?;

    let out = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("locating workspace root")?
        .join("registry.json");
    std::fs::write(&out, json + "\n").with_context(|| format!("writing {}", out.display()))?;

    println!("Registry generated with BASE_URL: {base_url}");
    Ok(())
}
