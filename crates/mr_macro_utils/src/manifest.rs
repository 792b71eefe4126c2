use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;
use std::{env, fs};

use toml_edit::{Document, Item, Table};

const FACADE_NAME: &str = "mr_core";
const SHORT_FACADE_NAME: &str = "mr";
const CRATE_PREFIX: &str = "mr_";

/// Parsed manifests, keyed by path.
static CACHE: Mutex<BTreeMap<PathBuf, Manifest>> = Mutex::new(BTreeMap::new());

/// Locate an accessible [`syn::Path`] for a `mr_*` crate as seen from the
/// caller's Cargo.toml.
///
/// Generated code must name `mr_record` through whatever the invoking crate
/// actually depends on, which is either `mr_record` itself or the `mr_core`
/// facade.
///
/// # Example
///
/// ```rust
/// # use mr_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("mr_record"));
/// ```
///
/// Reading and parsing the manifest is not free, callers should resolve a
/// path once per macro invocation and pass it around.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `mr_` and the caller depends on
///    the facade `mr_core`, return `::mr_core::short_name`
///    (e.g. `mr_record` -> `::mr_core::record`).
/// 3. If the requested crate name begins with `mr_` and the caller depends on
///    a renamed facade `mr`, return `::mr::short_name`.
/// 4. Repeat step 1-3 in `dev-dependencies`.
/// 5. Otherwise, fall back to the absolute path `::crate_name`.
///
/// ## Note
///
/// A crate that derives on its own types should add
/// `extern crate self as mr_record;` to its root, so that the absolute path
/// also resolves inside the crate.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

impl Manifest {
    fn locate() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("`CARGO_MANIFEST_DIR` is not set, `mr_*` derives must be expanded by cargo");
        };
        PathBuf::from(dir).join("Cargo.toml")
    }

    fn load(path: &Path, modified_time: SystemTime) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text.into_boxed_str(),
            Err(err) => panic!("cannot read `{}`: {err}", path.display()),
        };
        match Document::parse(text) {
            Ok(manifest) => Self {
                manifest,
                modified_time,
            },
            Err(err) => panic!("cannot parse `{}`: {err}", path.display()),
        }
    }

    /// Run `func` with the manifest of the crate being compiled.
    ///
    /// Manifests are parsed once per path and parsed again only when the
    /// file's modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        let path = Self::locate();
        let modified_time = fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        let manifest = match cache.entry(path) {
            Entry::Occupied(entry) if entry.get().modified_time == modified_time => {
                entry.into_mut()
            }
            Entry::Occupied(mut entry) => {
                let fresh = Self::load(entry.key(), modified_time);
                entry.insert(fresh);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let fresh = Self::load(entry.key(), modified_time);
                entry.insert(fresh)
            }
        };
        func(manifest)
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from
    /// this manifest. See the type-level documentation for the rules.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::lookup(deps, name))
            .unwrap_or_else(|| absolute(&[name]))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(absolute(&[name]));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        [FACADE_NAME, SHORT_FACADE_NAME]
            .into_iter()
            .find(|facade| deps.contains_key(facade))
            .map(|facade| absolute(&[facade, module]))
    }
}

/// `::a::b` from `["a", "b"]`.
fn absolute(segments: &[&str]) -> syn::Path {
    let text = format!("::{}", segments.join("::"));
    syn::parse_str(&text).unwrap_or_else(|err| panic!("`{text}` is not a valid path: {err}"))
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::time::SystemTime;
    use toml_edit::Document;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn path_string(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nmr_record = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("mr_record")), "mr_record");
    }

    #[test]
    fn facade_dependency() {
        let m = manifest("[dependencies]\nmr_core = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("mr_record")), "mr_core::record");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nmr = { package = \"mr_core\" }\n");
        assert_eq!(path_string(&m.get_crate_path("mr_record")), "mr::record");

        let empty = manifest("[package]\nname = \"x\"\n");
        assert_eq!(path_string(&empty.get_crate_path("mr_record")), "mr_record");
    }
}
