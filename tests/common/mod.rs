#![allow(dead_code)]

use std::fs;
use std::path::Path;

use cataloger::signature::HashAlgorithm;
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the cataloger binary.
#[macro_export]
macro_rules! cataloger {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("cataloger"))
    };
}

/// A small site to catalog: two tracked files, one out-of-scope file and a
/// `static/` directory that is ignored by default.
pub const SITE_FILES: &[(&str, &str)] = &[
    ("app.py", "print('hello')\n"),
    ("templates/index.html", "<h1>hello</h1>\n"),
    ("README.md", "# site\n"),
    ("static/logo.png", "not really a png"),
];

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Creates a new test fixture with an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Fixture pre-populated with [`SITE_FILES`].
    pub fn site() -> Self {
        let fixture = Self::new();
        for (path, content) in SITE_FILES {
            fixture.create_file(path, content);
        }
        fixture
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn remove_file(&self, relative_path: &str) {
        fs::remove_file(self.dir.path().join(relative_path)).expect("Failed to remove file");
    }

    pub fn read_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }

    /// Returns the path to the temp directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates the default config file.
    pub fn create_config(&self, content: &str) {
        self.create_file("catalog.cfg", content);
    }

    /// Writes `catalog.cat` with SHA-224 signatures of the given contents.
    pub fn create_catalog(&self, entries: &[(&str, &str)]) {
        let text: String = entries
            .iter()
            .map(|(path, content)| format!("{path}\t{}\n", signature(content)))
            .collect();
        self.create_file("catalog.cat", &text);
    }
}

/// Default signature of `content`.
pub fn signature(content: &str) -> String {
    HashAlgorithm::default().digest_bytes(content.as_bytes())
}
