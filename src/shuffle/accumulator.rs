//! The durable cross-party power-sum accumulator
//!
//! Each party folds its power vector into a shared running sum. The store
//! and the mutual-exclusion barrier are injected so hosts can bind them to
//! anything; the reference implementations bind to a plain text file and an
//! advisory lock on a *separate* barrier file, so a crashed party can never
//! leave the state file wedged.
//!
//! Writers that bypass the barrier race; the accumulator does not defend
//! against uncooperative processes.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use fs2::FileExt;
use itertools::Itertools;
use tracing::log;

use crate::{
    algebra::{FieldContext, Scalar},
    error::ShuffleError,
};

// ---------
// | State |
// ---------

/// The accumulator state: a field and the running sums `(S₁, …, Sₖ)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccumulatorState {
    /// The field every fold must agree on
    pub field: FieldContext,
    /// The running sums, index 1 first (index 0 is implicitly always 1)
    pub sums: Vec<Scalar>,
}

impl AccumulatorState {
    /// The vector length `k`
    pub fn vector_len(&self) -> usize {
        self.sums.len()
    }

    /// Render the state in its line-oriented form: modulus, `k`, then the
    /// `k` residues, one per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.field.modulus()));
        out.push_str(&format!("{}\n", self.sums.len()));
        for sum in self.sums.iter() {
            out.push_str(&format!("{sum}\n"));
        }

        out
    }

    /// Parse the line-oriented form; tolerates a trailing newline
    pub fn parse(text: &str) -> Result<Self, ShuffleError> {
        let mut lines = text.lines();

        let modulus_line = lines
            .next()
            .ok_or_else(|| ShuffleError::MalformedInput("missing modulus".to_string()))?;
        let modulus = modulus_line
            .trim()
            .parse::<num_bigint::BigUint>()
            .map_err(|e| ShuffleError::MalformedInput(format!("unreadable modulus: {e}")))?;
        if modulus <= num_bigint::BigUint::from(1u8) {
            return Err(ShuffleError::MalformedInput("modulus is not a field".to_string()));
        }
        let field = FieldContext::new(modulus);

        let k: usize = lines
            .next()
            .ok_or_else(|| ShuffleError::MalformedInput("missing vector length".to_string()))?
            .trim()
            .parse()
            .map_err(|_| ShuffleError::MalformedInput("unreadable vector length".to_string()))?;

        let mut sums = Vec::with_capacity(k);
        for i in 0..k {
            let line = lines.next().ok_or_else(|| {
                ShuffleError::MalformedInput(format!("missing sum {}", i + 1))
            })?;
            sums.push(Scalar::from_decimal_string(line, &field)?);
        }

        Ok(Self { field, sums })
    }
}

// --------------------------
// | Store and barrier seams |
// --------------------------

/// Durable storage for the accumulator state
pub trait SumStore {
    /// Read the recorded state, `None` when nothing has been folded yet
    fn load(&mut self) -> Result<Option<AccumulatorState>, ShuffleError>;

    /// Replace the recorded state
    fn save(&mut self, state: &AccumulatorState) -> Result<(), ShuffleError>;
}

/// The logical serialisation barrier every fold runs under
///
/// `exclusive` acquires the barrier (blocking indefinitely if necessary),
/// runs the critical section, and releases on every exit path.
pub trait Barrier {
    /// Run `critical` while holding the barrier exclusively
    fn exclusive<T>(
        &self,
        critical: impl FnOnce() -> Result<T, ShuffleError>,
    ) -> Result<T, ShuffleError>;
}

/// State persisted as a plain text file
#[derive(Clone, Debug)]
pub struct FileSumStore {
    /// Path of the state file
    path: PathBuf,
}

impl FileSumStore {
    /// A store over the given state-file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SumStore for FileSumStore {
    fn load(&mut self) -> Result<Option<AccumulatorState>, ShuffleError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| ShuffleError::Storage(e.to_string()))?;
        AccumulatorState::parse(&text).map(Some)
    }

    fn save(&mut self, state: &AccumulatorState) -> Result<(), ShuffleError> {
        let mut file = std::fs::File::create(&self.path)
            .map_err(|e| ShuffleError::Storage(e.to_string()))?;
        file.write_all(state.render().as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| ShuffleError::Storage(e.to_string()))
    }
}

/// An advisory file lock on a barrier file distinct from the state file
#[derive(Clone, Debug)]
pub struct FileBarrier {
    /// Path of the lock file
    path: PathBuf,
}

impl FileBarrier {
    /// A barrier over the given lock-file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conventional barrier for a state file: `<state>.lock` alongside it
    pub fn for_store(state_path: &Path) -> Self {
        let mut name = state_path.as_os_str().to_os_string();
        name.push(".lock");
        Self::new(PathBuf::from(name))
    }
}

impl Barrier for FileBarrier {
    fn exclusive<T>(
        &self,
        critical: impl FnOnce() -> Result<T, ShuffleError>,
    ) -> Result<T, ShuffleError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| ShuffleError::Storage(format!("cannot open barrier file: {e}")))?;

        // Blocks until the lock is granted
        file.lock_exclusive()
            .map_err(|e| ShuffleError::Storage(format!("cannot acquire barrier: {e}")))?;

        let result = critical();
        let _ = file.unlock();
        result
    }
}

/// In-memory state, shareable across threads of one process
#[derive(Clone, Debug, Default)]
pub struct MemorySumStore {
    /// The shared state cell
    state: Arc<Mutex<Option<AccumulatorState>>>,
}

impl MemorySumStore {
    /// An empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SumStore for MemorySumStore {
    fn load(&mut self) -> Result<Option<AccumulatorState>, ShuffleError> {
        Ok(self.state.lock().expect("store poisoned").clone())
    }

    fn save(&mut self, state: &AccumulatorState) -> Result<(), ShuffleError> {
        *self.state.lock().expect("store poisoned") = Some(state.clone());
        Ok(())
    }
}

/// An in-process barrier over a shared mutex
#[derive(Clone, Debug, Default)]
pub struct MutexBarrier {
    /// The shared exclusion token
    token: Arc<Mutex<()>>,
}

impl MutexBarrier {
    /// A fresh barrier; clone it to share the token
    pub fn new() -> Self {
        Self::default()
    }
}

impl Barrier for MutexBarrier {
    fn exclusive<T>(
        &self,
        critical: impl FnOnce() -> Result<T, ShuffleError>,
    ) -> Result<T, ShuffleError> {
        let _guard = self
            .token
            .lock()
            .map_err(|_| ShuffleError::Internal("barrier poisoned".to_string()))?;
        critical()
    }
}

// ---------------
// | Accumulator |
// ---------------

/// The fold state machine over an injected store and barrier
#[derive(Clone, Debug)]
pub struct SumAccumulator<S: SumStore, B: Barrier> {
    /// The durable state
    store: S,
    /// The exclusion barrier folds run under
    barrier: B,
}

impl<S: SumStore, B: Barrier> SumAccumulator<S, B> {
    /// Assemble an accumulator from its store and barrier
    pub fn new(store: S, barrier: B) -> Self {
        Self { store, barrier }
    }

    /// Fold a power vector into the running sum
    ///
    /// The first fold records the vector verbatim; later folds add
    /// componentwise. A vector under a different modulus or of a different
    /// length is fatal (`AccumulatorMismatch`) and leaves the state
    /// untouched. Returns the state after the fold.
    pub fn fold(&mut self, update: &[Scalar]) -> Result<AccumulatorState, ShuffleError> {
        let first = update
            .first()
            .ok_or_else(|| ShuffleError::MalformedInput("empty power vector".to_string()))?;
        let field = first.field().clone();

        let store = &mut self.store;
        self.barrier.exclusive(|| {
            let next = match store.load()? {
                None => AccumulatorState { field: field.clone(), sums: update.to_vec() },
                Some(state) => {
                    if state.field != field {
                        return Err(ShuffleError::AccumulatorMismatch(format!(
                            "state modulus {} but update modulus {}",
                            state.field.modulus(),
                            field.modulus(),
                        )));
                    }
                    if state.vector_len() != update.len() {
                        return Err(ShuffleError::AccumulatorMismatch(format!(
                            "state length {} but update length {}",
                            state.vector_len(),
                            update.len(),
                        )));
                    }

                    let sums =
                        state.sums.iter().zip(update.iter()).map(|(s, v)| s + v).collect_vec();
                    AccumulatorState { field: state.field, sums }
                },
            };

            store.save(&next)?;
            log::debug!("folded a length-{} power vector", next.vector_len());
            Ok(next)
        })
    }

    /// Read the current state under the barrier, `None` when no fold has
    /// happened yet
    pub fn read(&mut self) -> Result<Option<AccumulatorState>, ShuffleError> {
        let store = &mut self.store;
        self.barrier.exclusive(|| store.load())
    }
}
