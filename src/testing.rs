//! In-memory fakes shared by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::adapters::live::locators::DefaultLocatorFactory;
use crate::adapters::xml::XmlMetadataCodec;
use crate::context::ServiceContext;
use crate::coords::{relative_path, Gav};
use crate::error::PortError;
use crate::metadata::Unit;
use crate::platform::TargetEnvironment;
use crate::ports::{
    ClosureArtifact, Clock, ContentLocator, DependencyClosure, DependencyMetadataGenerator,
    FileSystem, GeneratorRole, IdGenerator, LocatorFactory, MetadataCodec, RepositoryLoader,
};
use crate::resolver::{GreedySolver, ReactorModule};

/// In-memory filesystem for testing without touching disk.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<Vec<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), contents.as_ref().to_vec());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path.as_ref())
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

impl FileSystem for MemFs {
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        self.put(path, contents);
        Ok(())
    }

    fn append(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        let mut files = self.files.lock().unwrap();
        files.entry(path.to_path_buf()).or_default().extend_from_slice(contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path))
            || self.dirs.lock().unwrap().iter().any(|d| d.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// In-memory repository keyed by relative path.
#[derive(Default)]
pub struct MemLocator {
    name: String,
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemLocator {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Mutex::default(),
        }
    }

    pub fn put(&self, gav: &Gav, classifier: Option<&str>, extension: Option<&str>, bytes: &[u8]) {
        self.put_path(&relative_path(gav, classifier, extension), bytes);
    }

    pub fn put_path(&self, path: &str, bytes: &[u8]) {
        self.entries.lock().unwrap().insert(path.to_string(), bytes.to_vec());
    }
}

impl ContentLocator for MemLocator {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError> {
        self.entries
            .lock()
            .unwrap()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| format!("{relative_path} not found in {}", self.name).into())
    }
}

/// Clock fixed at 2024-06-15T10:30:00Z.
pub struct FixedClock;

impl FixedClock {
    pub fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Self::instant()
    }
}

/// Produces `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequenceIds(Mutex<u32>);

impl IdGenerator for SequenceIds {
    fn generate_id(&self) -> String {
        let mut next = self.0.lock().unwrap();
        *next += 1;
        format!("id-{next}")
    }
}

impl ContentLocator for Arc<MemLocator> {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, PortError> {
        (**self).fetch(relative_path)
    }
}

/// Serves registered in-memory remotes; `file://` URLs go to the filesystem.
pub struct MemLocatorFactory {
    local: DefaultLocatorFactory,
    remotes: Mutex<BTreeMap<String, Arc<MemLocator>>>,
}

impl MemLocatorFactory {
    pub fn new(fs: Arc<MemFs>) -> Self {
        Self {
            local: DefaultLocatorFactory::new(fs),
            remotes: Mutex::default(),
        }
    }

    pub fn register(&self, url: &str) -> Arc<MemLocator> {
        let locator = Arc::new(MemLocator::named(url));
        self.remotes.lock().unwrap().insert(url.to_string(), Arc::clone(&locator));
        locator
    }
}

impl LocatorFactory for MemLocatorFactory {
    fn open(&self, url: &str) -> Result<Box<dyn ContentLocator>, PortError> {
        if let Some(locator) = self.remotes.lock().unwrap().get(url) {
            return Ok(Box::new(Arc::clone(locator)));
        }
        self.local.open(url)
    }
}

/// Provisioning repositories by URL; unknown URLs fail to load.
#[derive(Default)]
pub struct StaticLoader {
    repositories: Mutex<BTreeMap<String, Vec<Unit>>>,
    requested: Mutex<Vec<String>>,
}

impl StaticLoader {
    pub fn add(&self, url: &str, units: Vec<Unit>) {
        self.repositories.lock().unwrap().insert(url.to_string(), units);
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl RepositoryLoader for StaticLoader {
    fn load_units(&self, url: &str) -> Result<Vec<Unit>, PortError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.repositories
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| format!("connection refused: {url}").into())
    }
}

/// Returns a preset closure regardless of the declarations.
#[derive(Default)]
pub struct StaticClosure(Mutex<Vec<ClosureArtifact>>);

impl StaticClosure {
    pub fn set(&self, artifacts: Vec<ClosureArtifact>) {
        *self.0.lock().unwrap() = artifacts;
    }
}

impl DependencyClosure for StaticClosure {
    fn compile_closure(
        &self,
        _module: &Gav,
        _declared: &[Gav],
    ) -> Result<Vec<ClosureArtifact>, PortError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Returns preset units per module and role.
#[derive(Default)]
pub struct StaticGenerator(Mutex<HashMap<(Gav, GeneratorRole), Vec<Unit>>>);

impl StaticGenerator {
    pub fn set(&self, gav: &Gav, role: GeneratorRole, units: Vec<Unit>) {
        self.0.lock().unwrap().insert((gav.clone(), role), units);
    }
}

impl DependencyMetadataGenerator for StaticGenerator {
    fn generate(
        &self,
        module: &ReactorModule,
        _environments: &[TargetEnvironment],
        role: GeneratorRole,
    ) -> Result<Vec<Unit>, PortError> {
        Ok(self.0.lock().unwrap().get(&(module.gav().clone(), role)).cloned().unwrap_or_default())
    }
}

/// Every fake a resolution needs, plus the context wiring them.
pub struct Fakes {
    pub fs: Arc<MemFs>,
    pub locators: Arc<MemLocatorFactory>,
    pub loader: Arc<StaticLoader>,
    pub closure: Arc<StaticClosure>,
    pub generator: Arc<StaticGenerator>,
}

impl Fakes {
    /// Fakes with an empty local repository at `/m2`.
    pub fn new() -> Self {
        let fs = Arc::new(MemFs::new());
        fs.create_dir_all(Path::new("/m2")).unwrap();
        Self {
            locators: Arc::new(MemLocatorFactory::new(Arc::clone(&fs))),
            loader: Arc::default(),
            closure: Arc::default(),
            generator: Arc::default(),
            fs,
        }
    }

    pub fn context(&self) -> ServiceContext {
        ServiceContext {
            fs: self.fs.clone(),
            codec: Arc::new(XmlMetadataCodec),
            locators: self.locators.clone(),
            loader: self.loader.clone(),
            solver: Arc::new(GreedySolver),
            closure: self.closure.clone(),
            generator: self.generator.clone(),
            clock: Arc::new(FixedClock),
            id_gen: Arc::new(SequenceIds::default()),
        }
    }

    /// Writes `units` as a metadata document at `path`.
    pub fn put_units(&self, path: impl AsRef<Path>, units: &[Unit]) {
        self.fs.put(path, XmlMetadataCodec.write_units(units).unwrap());
    }
}
