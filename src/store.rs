//! JSON-file scheme store.
//!
//! Each scheme lives in its own `<name>.json` file directly under the store
//! root. Files are read in file-name order so catalogue order is stable
//! between runs. Output is pretty-printed with sorted keys.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, ensure};
use log::{debug, info};

use crate::catalogue::Catalogue;
use crate::error::{SchemeError, SchemeResult};
use crate::scheme::{CURRENT_SCHEME_VERSION, Workbook};

const SCHEME_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct SchemeStore {
    root: PathBuf,
}

impl SchemeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        ensure!(!name.trim().is_empty(), "Scheme name cannot be empty");
        ensure!(
            !name.contains(['/', '\\']) && name != "." && name != "..",
            "Scheme name '{name}' cannot be used as a file name"
        );
        Ok(self.root.join(format!("{name}.{SCHEME_EXTENSION}")))
    }

    fn scheme_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Reading scheme directory {:?}", self.root))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Listing scheme directory {:?}", self.root))?
                .path();
            let is_scheme = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(SCHEME_EXTENSION));
            if is_scheme {
                paths.push(path);
            } else {
                debug!("Skipping non-scheme entry {:?}", path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn load_all(&self) -> Result<Vec<Workbook>> {
        let schemes = self
            .scheme_paths()?
            .iter()
            .map(|path| load_file(path))
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded {} scheme(s) from {:?}", schemes.len(), self.root);
        Ok(schemes)
    }

    /// Finds a scheme by its `name` field and returns it with the file it was
    /// read from. The file name does not have to match the scheme name.
    pub fn locate(&self, name: &str) -> Result<(PathBuf, Workbook)> {
        for path in self.scheme_paths()? {
            let scheme = load_file(&path)?;
            if scheme.name == name {
                return Ok((path, scheme));
            }
        }
        Err(anyhow!("Scheme '{name}' not found in {:?}", self.root))
    }

    pub fn load(&self, name: &str) -> Result<Workbook> {
        self.locate(name).map(|(_, scheme)| scheme)
    }

    /// Loads and compiles every scheme. Any failure to materialise the
    /// catalogue is reported as [`SchemeError::SchemeNotLoaded`].
    pub fn catalogue(&self) -> SchemeResult<Catalogue> {
        let schemes = self
            .load_all()
            .map_err(|err| SchemeError::SchemeNotLoaded(format!("{err:#}")))?;
        Catalogue::new(schemes)
    }

    /// Writes `scheme` to `<root>/<name>.json`.
    ///
    /// With `ensure_exists` the file must already be present (an update);
    /// otherwise it is created or replaced.
    pub fn write(&self, scheme: &Workbook, ensure_exists: bool) -> Result<PathBuf> {
        let path = self.path_for(&scheme.name)?;
        if ensure_exists {
            ensure!(
                path.is_file(),
                "Scheme file {path:?} does not exist; refusing to create it on update"
            );
        }
        self.write_file(&path, scheme)?;
        Ok(path)
    }

    /// Writes `scheme` to `path` as pretty JSON with sorted keys.
    pub fn write_file(&self, path: &Path, scheme: &Workbook) -> Result<()> {
        let mut scheme = scheme.clone();
        if scheme.schema_version.is_none() {
            scheme.schema_version = Some(CURRENT_SCHEME_VERSION.to_string());
        }
        // serde_json maps are ordered, so going through a Value sorts keys.
        let value = serde_json::to_value(&scheme).context("Serializing scheme to JSON")?;
        let file = File::create(path).with_context(|| format!("Creating scheme file {path:?}"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &value).context("Writing scheme JSON")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("Scheme '{}' written to {:?}", scheme.name, path);
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).with_context(|| format!("Removing scheme file {path:?}"))?;
        info!("Scheme '{name}' removed from {:?}", self.root);
        Ok(())
    }
}

pub fn load_file(path: &Path) -> Result<Workbook> {
    let file = File::open(path).with_context(|| format!("Opening scheme file {path:?}"))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("Parsing scheme JSON {path:?}"))
}
