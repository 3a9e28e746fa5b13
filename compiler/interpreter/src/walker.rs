//! Directory walker: folds a schema directory tree into one provider signature.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use signature::{ComponentSignature, ProviderSignature, StructSignature};

use crate::document::interpret;
use crate::Result;

/// File extension of component schema files, without the leading dot.
pub const SCHEMA_EXTENSION: &str = "schema";

const LOG_MODULE: &str = "walker";

/// Process a schema directory tree into a provider signature.
///
/// Every `.schema` file under `dir` (including subdirectories) contributes
/// one component and any number of struct types. Components found in
/// subdirectories are namespaced by their path below `dir`, joined with
/// `::`; components in `dir` itself are never prefixed. Any error aborts
/// the whole walk.
pub fn process_dir(name: &str, dir: &Path) -> Result<ProviderSignature> {
    let contents = walk(dir, &[])?;
    Ok(ProviderSignature {
        name: name.to_string(),
        types: contents.types,
        components: contents.components,
    })
}

#[derive(Default)]
struct DirContents {
    types: BTreeMap<String, StructSignature>,
    components: BTreeMap<String, ComponentSignature>,
}

impl DirContents {
    /// Catalog entries are keyed by name; later insertions overwrite earlier
    /// ones, with a warning so silent collisions are at least visible.
    fn add_type(&mut self, signature: StructSignature) {
        let name = signature.name.clone();
        if self.types.insert(name.clone(), signature).is_some() {
            logging::warn(
                LOG_MODULE,
                &format!("duplicate definition of type '{}', keeping the latest", name),
            );
        }
    }

    fn add_component(&mut self, signature: ComponentSignature) {
        let name = signature.name.clone();
        if self.components.insert(name.clone(), signature).is_some() {
            logging::warn(
                LOG_MODULE,
                &format!("duplicate definition of component '{}', keeping the latest", name),
            );
        }
    }

    fn merge(&mut self, other: DirContents) {
        for (_, signature) in other.types {
            self.add_type(signature);
        }
        for (_, signature) in other.components {
            self.add_component(signature);
        }
    }
}

/// Recursive fold over one directory level. `prefix` holds the subdirectory
/// names between the walk root and `dir`; it is empty at the root itself.
fn walk(dir: &Path, prefix: &[String]) -> Result<DirContents> {
    let mut contents = DirContents::default();

    // Process entries in lexicographic filename order so last-write-wins
    // merges are deterministic across platforms.
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    entries.sort();

    for path in entries {
        if path.is_dir() {
            let dir_name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            let mut child_prefix = prefix.to_vec();
            child_prefix.push(dir_name);
            contents.merge(walk(&path, &child_prefix)?);
        } else if is_schema_file(&path) {
            process_file(&path, dir, prefix, &mut contents)?;
        }
    }

    Ok(contents)
}

fn is_schema_file(path: &Path) -> bool {
    path.extension().and_then(|extension| extension.to_str()) == Some(SCHEMA_EXTENSION)
}

fn process_file(
    path: &Path,
    dir: &Path,
    prefix: &[String],
    contents: &mut DirContents,
) -> Result<()> {
    logging::trace(LOG_MODULE, &format!("processing schema {}", path.display()));
    let source = fs::read_to_string(path)?;
    let resolver = DirResolver { dir: dir.to_path_buf() };
    let document = parser::parse(&source, &resolver)?;

    let (mut component, structs) = interpret(&document)?;
    if !prefix.is_empty() {
        component.name = format!("{}::{}", prefix.join("::"), component.name);
    }

    for signature in structs {
        contents.add_type(signature);
    }
    contents.add_component(component);
    Ok(())
}

/// Resolves import paths relative to the importing file's own directory.
struct DirResolver {
    dir: PathBuf,
}

impl parser::ImportResolver for DirResolver {
    fn resolve(&self, location: &str) -> std::io::Result<String> {
        let mut path = self.dir.clone();
        for part in location.split('/').filter(|part| !part.is_empty() && *part != ".") {
            path.push(part);
        }
        fs::read_to_string(path)
    }
}
