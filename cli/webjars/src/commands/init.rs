//! `webjars init` — project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{WebjarsManifest, MANIFEST_FILE};

/// Create a new project in the directory `name`, relative to cwd.
pub fn run(name: &str) -> Result<()> {
    create_project(Path::new(name), name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("repository"))
        .context("creating repository/ directory")?;
    fs::create_dir_all(project_dir.join("public"))
        .context("creating public/ directory")?;

    fs::write(project_dir.join(MANIFEST_FILE), WebjarsManifest::template(name))
        .context("writing webjars.toml")?;
    fs::write(project_dir.join(".gitignore"), "target/\n")
        .context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/repository/");
    println!("  {name}/public/");
    println!("  {name}/.gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("site");

        create_project(&project_path, "site").unwrap();

        assert!(project_path.join("webjars.toml").is_file());
        assert!(project_path.join("repository").is_dir());
        assert!(project_path.join("public").is_dir());
        assert!(project_path.join(".gitignore").is_file());

        let content = fs::read_to_string(project_path.join("webjars.toml")).unwrap();
        let manifest = WebjarsManifest::from_str(&content).unwrap();
        assert_eq!(manifest.project.name, "site");
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        fs::create_dir(&project_path).unwrap();

        let err = create_project(&project_path, "existing").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
