//! Component class definitions and the component library.
//!
//! A class definition carries a type tag, a default value, and a pin table.
//! Instantiating a class produces a [`Component`] whose pins exactly mirror
//! the pin table, with pin ids synthesized as `<instance_id>.<pin_name>`.
//! Direction and role strings are accepted as-is; rule enforcement belongs
//! to the validator chain, not the loader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::{CompileError, NetforgeError};
use crate::model::{Component, Pin};

/// Direction assigned to pins whose class entry does not specify one.
pub const DEFAULT_DIRECTION: &str = "passive";

/// One entry of a class pin table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PinSpec {
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A component class definition, typically loaded from a `*-class.yaml`
/// file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentClass {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    /// Pin table, keyed by pin name in document order.
    #[serde(default)]
    pub pins: Option<IndexMap<String, PinSpec>>,
}

impl ComponentClass {
    /// Parse a class definition from YAML source.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Verify the class has a usable (non-empty) pin table. `label` names
    /// the class in the error, usually the file path or the instance id.
    pub fn check(&self, label: &str) -> Result<(), CompileError> {
        self.pin_table(label).map(|_| ())
    }

    fn pin_table(&self, label: &str) -> Result<&IndexMap<String, PinSpec>, CompileError> {
        match &self.pins {
            Some(pins) if !pins.is_empty() => Ok(pins),
            _ => Err(CompileError::MalformedClassDefinition {
                class: label.to_string(),
            }),
        }
    }

    /// Instantiate this class as a component with the given instance id.
    pub fn instantiate(&self, instance_id: &str) -> Result<Component, CompileError> {
        let specs = self.pin_table(instance_id)?;

        let mut pins = BTreeMap::new();
        for (pin_name, spec) in specs {
            let pin = Pin {
                id: format!("{}.{}", instance_id, pin_name),
                name: pin_name.clone(),
                parent: instance_id.to_string(),
                direction: spec
                    .direction
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DIRECTION.to_string()),
                role: spec.role.clone(),
                net: None,
            };
            pins.insert(pin_name.clone(), pin);
        }

        Ok(Component {
            id: instance_id.to_string(),
            kind: self.kind.clone(),
            value: self.value.clone(),
            pins,
        })
    }
}

/// An explicit component library: reference key to class definition.
///
/// Always passed into compilation as an argument, never a process-wide
/// registry, so compilation stays pure and testable.
#[derive(Debug, Clone, Default)]
pub struct Library {
    classes: BTreeMap<String, ComponentClass>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, class: ComponentClass) {
        self.classes.insert(key.into(), class);
    }

    pub fn get(&self, key: &str) -> Option<&ComponentClass> {
        self.classes.get(key)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Build a library from an explicit map of reference key to class file.
    pub fn from_paths(map: &BTreeMap<String, PathBuf>) -> Result<Self, NetforgeError> {
        let mut library = Self::new();
        for (key, path) in map {
            let class = load_class_file(path)?;
            library.insert(key.clone(), class);
        }
        Ok(library)
    }

    /// Build a library by discovering class files under a directory.
    ///
    /// Reference keys are derived from file names: `resistor-class.yaml`
    /// registers as `resistor`.
    pub fn from_dir(dir: &Path) -> Result<Self, NetforgeError> {
        let mut library = Self::new();
        for path in discover_class_files(dir)? {
            let class = load_class_file(&path)?;
            let key = class_key(&path);
            tracing::debug!("loaded component class '{}' from {}", key, path.display());
            library.insert(key, class);
        }
        Ok(library)
    }
}

fn load_class_file(path: &Path) -> Result<ComponentClass, NetforgeError> {
    let source = std::fs::read_to_string(path)?;
    let class = ComponentClass::from_yaml(&source)
        .map_err(|e| NetforgeError::Parse(format!("{}: {}", path.display(), e)))?;
    class.check(&path.display().to_string())?;
    Ok(class)
}

/// Reference key for a class file: file stem with a `-class` suffix
/// stripped.
fn class_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.strip_suffix("-class").unwrap_or(stem).to_string()
}

/// Recursively discover component class files (`.yaml`/`.yml`) under a
/// directory, in sorted order.
pub fn discover_class_files(dir: &Path) -> Result<Vec<PathBuf>, NetforgeError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), NetforgeError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "build"
            {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                match ext {
                    "yaml" | "yml" => files.push(path),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// A problem found while linting a component library directory.
#[derive(Debug, Clone)]
pub struct LintIssue {
    pub path: PathBuf,
    pub message: String,
}

/// Report of a library lint run.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// Number of class files examined.
    pub checked: usize,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Lint every class file under a directory without aborting on the first
/// failure. Empty files, YAML errors, and missing pin tables are all
/// reported per file.
pub fn lint_dir(dir: &Path) -> Result<LintReport, NetforgeError> {
    let mut report = LintReport::default();

    for path in discover_class_files(dir)? {
        report.checked += 1;
        let source = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                report.issues.push(LintIssue {
                    path,
                    message: format!("read failed: {}", e),
                });
                continue;
            }
        };
        if source.trim().is_empty() {
            report.issues.push(LintIssue {
                path,
                message: "empty file".to_string(),
            });
            continue;
        }
        let class = match ComponentClass::from_yaml(&source) {
            Ok(c) => c,
            Err(e) => {
                report.issues.push(LintIssue {
                    path,
                    message: format!("YAML error: {}", e),
                });
                continue;
            }
        };
        if let Err(e) = class.check(&path.display().to_string()) {
            report.issues.push(LintIssue {
                path,
                message: e.to_string(),
            });
        }
    }

    tracing::debug!(
        "library lint: {} files checked, {} issue(s)",
        report.checked,
        report.issues.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESISTOR: &str = r#"
type: resistor
value: 1k
pins:
  "1": {direction: passive}
  "2": {direction: passive}
"#;

    #[test]
    fn test_instantiate_mirrors_pin_table() {
        let class = ComponentClass::from_yaml(RESISTOR).unwrap();
        let component = class.instantiate("R1").unwrap();

        assert_eq!(component.id, "R1");
        assert_eq!(component.kind.as_deref(), Some("resistor"));
        assert_eq!(component.value.as_deref(), Some("1k"));
        assert_eq!(component.pins.len(), 2);

        let pin = component.pin("1").unwrap();
        assert_eq!(pin.id, "R1.1");
        assert_eq!(pin.parent, "R1");
        assert_eq!(pin.direction, "passive");
        assert!(pin.net.is_none());
    }

    #[test]
    fn test_direction_defaults_to_passive() {
        let class = ComponentClass::from_yaml("type: terminal\npins:\n  \"1\": {}\n").unwrap();
        let component = class.instantiate("P1").unwrap();
        assert_eq!(component.pin("1").unwrap().direction, DEFAULT_DIRECTION);
    }

    #[test]
    fn test_role_is_carried_as_opaque_string() {
        let class =
            ComponentClass::from_yaml("type: ground\npins:\n  \"1\": {role: ground}\n").unwrap();
        let component = class.instantiate("G1").unwrap();
        assert_eq!(component.pin("1").unwrap().role.as_deref(), Some("ground"));
    }

    #[test]
    fn test_missing_pin_table_is_malformed() {
        let class = ComponentClass::from_yaml("type: mystery\n").unwrap();
        assert!(matches!(
            class.instantiate("X1"),
            Err(CompileError::MalformedClassDefinition { .. })
        ));

        let empty = ComponentClass::from_yaml("type: mystery\npins: {}\n").unwrap();
        assert!(matches!(
            empty.instantiate("X1"),
            Err(CompileError::MalformedClassDefinition { .. })
        ));
    }

    #[test]
    fn test_class_key_strips_suffix() {
        assert_eq!(class_key(Path::new("components/resistor-class.yaml")), "resistor");
        assert_eq!(class_key(Path::new("opamp.yaml")), "opamp");
    }

    #[test]
    fn test_from_dir_and_lint() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("resistor-class.yaml"), RESISTOR).unwrap();
        std::fs::write(dir.path().join("broken-class.yaml"), "type: broken\n").unwrap();
        std::fs::write(dir.path().join("empty-class.yaml"), "\n").unwrap();

        let report = lint_dir(dir.path()).unwrap();
        assert_eq!(report.checked, 3);
        assert_eq!(report.issues.len(), 2);
        assert!(!report.is_clean());

        // from_dir refuses the broken class outright
        assert!(Library::from_dir(dir.path()).is_err());

        std::fs::remove_file(dir.path().join("broken-class.yaml")).unwrap();
        std::fs::remove_file(dir.path().join("empty-class.yaml")).unwrap();
        let library = Library::from_dir(dir.path()).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.get("resistor").is_some());
    }
}
