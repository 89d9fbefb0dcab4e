//! Shared test helpers for agent loop tests.

use async_trait::async_trait;
use chatrelay_core::error::{GenerationError, WorkspaceError};
use chatrelay_core::generation::TextGenerator;
use chatrelay_core::workspace::WorkspaceFileAccessor;
use chatrelay_tools::LocalWorkspace;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A generator that returns a sequence of scripted results and records
/// every prompt it was sent.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedGenerator {
    results: Mutex<Vec<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            results: Mutex::new(results),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Script successful replies only.
    pub fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut prompts = self.prompts.lock().unwrap();
        let results = self.results.lock().unwrap();
        let call = prompts.len();

        if call >= results.len() {
            panic!(
                "ScriptedGenerator: no more results (call #{call}, have {})",
                results.len()
            );
        }

        prompts.push(prompt.to_string());
        results[call].clone()
    }
}

/// A real on-disk workspace that counts how often it was touched.
#[derive(Default)]
pub struct CountingWorkspace {
    inner: LocalWorkspace,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingWorkspace {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn operations(&self) -> usize {
        self.reads() + self.writes()
    }
}

#[async_trait]
impl WorkspaceFileAccessor for CountingWorkspace {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, WorkspaceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(path).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WorkspaceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(path, bytes).await
    }
}
