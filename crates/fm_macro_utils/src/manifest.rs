use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how generated code can name a
/// workspace crate.
///
/// # Example
///
/// ```rust
/// # use fm_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("fm_access"));
/// ```
///
/// Reading and parsing the manifest is not cheap: call [`Manifest::shared`]
/// once per macro invocation and pass the path around.
///
/// # Resolution rules
///
/// 1. The crate is a dependency under its own name: `::fm_access`.
/// 2. The crate is a dependency renamed with `package = "fm_access"`:
///    `::renamed`.
/// 3. The name starts with `fm_` and the caller depends on the facade
///    `fm_core`: `::fm_core::access`.
/// 4. Steps 1-3 again in `dev-dependencies`.
/// 5. Otherwise `::fm_access`.
///
/// ## Note
///
/// A crate naming itself from generated code needs
/// `extern crate self as fm_access;` in its root, so that `::fm_access`
/// resolves in unit tests and doc tests alike.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "fm_core";
const CRATE_PREFIX: &str = "fm_";

impl Manifest {
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be set by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    // `alias = { package = "name" }`
    fn find_renamed(deps: &Table, name: &str) -> Option<String> {
        deps.iter().find_map(|(alias, item)| {
            let package = item.as_table_like()?.get("package")?;
            (package.as_str() == Some(name)).then(|| alias.replace('-', "_"))
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        if let Some(alias) = Self::find_renamed(deps, name) {
            return Some(Self::parse_path(&format!("::{alias}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::parse_path(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Returns the path of the crate `name` as seen from the caller.
    ///
    /// See the type documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(section)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }

        Self::parse_path(&format!("::{name}"))
    }

    /// Runs `func` on the caller's manifest.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

// -----------------------------------------------------------------------------
// Tests
