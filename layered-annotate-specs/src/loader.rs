//! Loading a fixture suite: every `.ann` file under a directory plus the
//! `expected-failures.toml` that sits next to them.

use crate::failures::ExpectedFailures;
use crate::{parse_fixture, AnnFixture, SpecError, SpecResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Expected failures file looked up at the suite root.
pub const EXPECTED_FAILURES_FILE: &str = "expected-failures.toml";

const FIXTURE_EXTENSION: &str = "ann";

/// A fixture and its path relative to the suite root, with `/` separators.
///
/// The name is what `expected-failures.toml` entries refer to.
#[derive(Debug, Clone)]
pub struct NamedFixture {
    pub name: String,
    pub fixture: AnnFixture,
}

/// Fixtures of one directory tree, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct FixtureSuite {
    pub fixtures: Vec<NamedFixture>,
    pub expected: ExpectedFailures,
}

impl FixtureSuite {
    /// Load every fixture under `dir` and the suite's expected failures.
    ///
    /// A missing `expected-failures.toml` means none are expected.
    pub fn load(dir: &Path) -> SpecResult<Self> {
        let expected = ExpectedFailures::load(&dir.join(EXPECTED_FAILURES_FILE))?;
        let fixtures = load_all_fixtures(dir)?;
        Ok(Self { fixtures, expected })
    }

    pub fn get(&self, name: &str) -> Option<&AnnFixture> {
        self.fixtures
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.fixture)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// Load a single fixture file. Parse errors carry the file path.
pub fn load_fixture(path: &Path) -> SpecResult<AnnFixture> {
    let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_fixture(&content).map_err(|e| SpecError::Fixture {
        path: path.display().to_string(),
        source: Box::new(e),
    })
}

/// Load all `.ann` files under `dir`, sorted by name.
///
/// A directory that does not exist yields no fixtures.
pub fn load_all_fixtures(dir: &Path) -> SpecResult<Vec<NamedFixture>> {
    let mut fixtures = fixture_paths(dir)?
        .into_iter()
        .map(|path| {
            let fixture = load_fixture(&path)?;
            Ok(NamedFixture {
                name: fixture_name(dir, &path),
                fixture,
            })
        })
        .collect::<SpecResult<Vec<_>>>()?;
    fixtures.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(fixtures)
}

fn fixture_paths(root: &Path) -> SpecResult<Vec<PathBuf>> {
    let read_error = |dir: &Path, e: std::io::Error| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut paths = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir).map_err(|e| read_error(&dir, e))? {
            let path = entry.map_err(|e| read_error(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().map_or(false, |ext| ext == FIXTURE_EXTENSION) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}

fn fixture_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
