//! Scripted in-memory backend and log capture for service tests.

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::subscriber::DefaultGuard;

use crate::domain::{BackendKind, LogRecord};
use crate::error::WorkerError;
use crate::persistence::LogBackend;

/// Backend whose probe and append outcomes are fixed up front.
#[derive(Debug)]
pub(crate) struct ScriptedBackend {
    kind: BackendKind,
    probe_failures: u32,
    probe_stalls: bool,
    failing_appends: Vec<u32>,
    probe_calls: AtomicU32,
    append_calls: AtomicU32,
    appended: Mutex<Vec<(Instant, LogRecord)>>,
}

impl ScriptedBackend {
    /// Probe fails `failures` times, then succeeds.
    pub(crate) fn reachable_after(failures: u32) -> Self {
        Self {
            kind: BackendKind::Postgres,
            probe_failures: failures,
            probe_stalls: false,
            failing_appends: Vec::new(),
            probe_calls: AtomicU32::new(0),
            append_calls: AtomicU32::new(0),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Probe never succeeds.
    pub(crate) fn unreachable() -> Self {
        Self::reachable_after(u32::MAX)
    }

    /// Probe never returns, like a connect to a host that drops packets.
    pub(crate) fn stalled() -> Self {
        Self {
            probe_stalls: true,
            ..Self::reachable_after(0)
        }
    }

    pub(crate) fn with_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    /// The given 1-based append calls fail.
    pub(crate) fn failing_appends(mut self, calls: &[u32]) -> Self {
        self.failing_appends = calls.to_vec();
        self
    }

    pub(crate) fn probe_calls(&self) -> u32 {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn append_calls(&self) -> u32 {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Successfully appended records with the instant they arrived.
    pub(crate) async fn appended(&self) -> Vec<(Instant, LogRecord)> {
        self.appended.lock().await.clone()
    }
}

#[async_trait]
impl LogBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn probe(&self) -> Result<(), WorkerError> {
        let call = self.probe_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.probe_stalls {
            std::future::pending::<()>().await;
        }
        if call > self.probe_failures {
            Ok(())
        } else {
            Err(WorkerError::Sql(sqlx::Error::PoolTimedOut))
        }
    }

    async fn append(&self, record: &LogRecord) -> Result<(), WorkerError> {
        let call = self.append_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_appends.contains(&call) {
            return Err(WorkerError::Sql(sqlx::Error::RowNotFound));
        }
        self.appended.lock().await.push((Instant::now(), *record));
        Ok(())
    }
}

/// Collects formatted log lines emitted on the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so spawned tasks are
/// captured too.
#[derive(Debug)]
pub(crate) struct LogCapture {
    buf: Arc<StdMutex<Vec<u8>>>,
    _guard: DefaultGuard,
}

impl LogCapture {
    pub(crate) fn install() -> Self {
        let buf = Arc::new(StdMutex::new(Vec::new()));
        let writer_buf = Arc::clone(&buf);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_writer(move || BufWriter(Arc::clone(&writer_buf)))
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            buf,
            _guard: guard,
        }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let bytes = match self.buf.lock() {
            Ok(bytes) => bytes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug)]
struct BufWriter(Arc<StdMutex<Vec<u8>>>);

impl io::Write for BufWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
