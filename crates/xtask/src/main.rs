use anyhow::Context;
use serde::Deserialize;

/// Crates the domain layer may depend on. Anything else (async runtimes,
/// I/O, logging backends) belongs in the engine.
const DOMAIN_ALLOWED: &[&str] = &["serde", "serde_json", "uuid", "chrono", "thiserror"];
const DOMAIN_PACKAGE: &str = "sagaforge-domain";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let violations = domain_violations(&metadata)?;
    if !violations.is_empty() {
        anyhow::bail!(
            "{DOMAIN_PACKAGE} must stay free of I/O and runtime crates; found: {}",
            violations.join(", ")
        );
    }

    println!("arch-check: ok");
    Ok(())
}

fn domain_violations(metadata: &Metadata) -> anyhow::Result<Vec<String>> {
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_PACKAGE)
        .with_context(|| format!("{DOMAIN_PACKAGE} not in workspace"))?;

    Ok(domain
        .dependencies
        .iter()
        // dev-dependencies only reach tests
        .filter(|d| d.kind.as_deref() != Some("dev"))
        .filter(|d| !DOMAIN_ALLOWED.contains(&d.name.as_str()))
        .map(|d| d.name.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(json: &str) -> Metadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn clean_domain_passes() {
        let m = metadata(
            r#"{"packages":[{"name":"sagaforge-domain","dependencies":[
                {"name":"serde","kind":null},
                {"name":"chrono","kind":null},
                {"name":"mockall","kind":"dev"}
            ]}]}"#,
        );
        assert!(domain_violations(&m).unwrap().is_empty());
    }

    #[test]
    fn runtime_dependency_is_flagged() {
        let m = metadata(
            r#"{"packages":[{"name":"sagaforge-domain","dependencies":[
                {"name":"tokio","kind":null},
                {"name":"uuid","kind":null}
            ]}]}"#,
        );
        assert_eq!(domain_violations(&m).unwrap(), vec!["tokio".to_string()]);
    }

    #[test]
    fn missing_domain_package_is_an_error() {
        let m = metadata(r#"{"packages":[]}"#);
        assert!(domain_violations(&m).is_err());
    }
}
