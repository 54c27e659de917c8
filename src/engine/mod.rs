//! Training session engine
//!
//! [`Trainer`] owns the knowledge base, its store, the RNG and the current
//! round. Hosts drive it with one call at a time: `generate`, then `submit`
//! (or `skip`), and repeat. It does no locking of its own; a multi-threaded
//! host must serialize access.

pub mod report;

pub use report::{ObstacleLine, RoundReport};

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{info, warn};

use crate::core::config::TrainerConfig;
use crate::core::error::{Result, TrainerError};
use crate::encoder;
use crate::generator::{self, SearchOutcome};
use crate::knowledge::{Feedback, FileStore, KnowledgeBase, RecordStore};
use crate::rng::SecureRng;

/// One generated round, kept until feedback arrives or the next round replaces it
#[derive(Debug, Clone)]
pub struct Round {
    pub outcome: SearchOutcome,
    pub seed: u64,
    pub location: String,
    pub code: String,
}

/// Adaptive difficulty engine
pub struct Trainer<S: RecordStore, R: RngCore> {
    knowledge: KnowledgeBase,
    store: S,
    rng: SecureRng<R>,
    prefix: String,
    locations: Vec<String>,
    seed_max: u64,
    round: Option<Round>,
}

impl Trainer<FileStore, OsRng> {
    /// Production setup: file store and OS entropy, both from `config`
    pub fn open(config: &TrainerConfig) -> Result<Self> {
        config.validate()?;
        let rng = SecureRng::from_os()?;
        let store = FileStore::new(&config.knowledge_path);
        info!(path = ?store.path(), "opening knowledge store");
        Ok(Self::new(store, rng, config.load_prefix(), config))
    }
}

impl<S: RecordStore, R: RngCore> Trainer<S, R> {
    /// Build a trainer over `store`
    ///
    /// If loading had to merge or evict stored records, the repaired set is
    /// written back straight away. A failed write-back is only logged; the
    /// next `submit` saves again.
    pub fn new(mut store: S, rng: SecureRng<R>, prefix: String, config: &TrainerConfig) -> Self {
        let loaded = store.load_all();
        let stored = loaded.len();
        let knowledge = KnowledgeBase::from_records(loaded);

        if knowledge.len() != stored {
            warn!(stored, kept = knowledge.len(), "stored records repaired on load");
            if let Err(e) = store.save_all(knowledge.records()) {
                warn!(error = %e, "could not write back repaired knowledge base");
            }
        }

        info!(records = knowledge.len(), mastery = knowledge.mastery(), "trainer ready");
        Self {
            knowledge,
            store,
            rng,
            prefix,
            locations: config.locations.clone(),
            seed_max: config.seed_max,
            round: None,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn mastery(&self) -> f64 {
        self.knowledge.mastery()
    }

    /// Start a new round, replacing any round still awaiting feedback
    pub fn generate(&mut self) -> &Round {
        let outcome = generator::generate(&self.knowledge, &mut self.rng);
        let seed = self.rng.uniform(0, self.seed_max);
        let location = self.rng.choose(&self.locations).cloned().unwrap_or_default();
        let code = encoder::encode(&self.prefix, seed, &location, &outcome.permutation);

        info!(
            desired = outcome.desired,
            min = outcome.bound.min,
            max = outcome.bound.max,
            end = ?outcome.end,
            %location,
            "generated round"
        );

        self.round.insert(Round { outcome, seed, location, code })
    }

    /// Drop the current round without feedback and generate the next one
    pub fn skip(&mut self) -> &Round {
        self.round = None;
        self.generate()
    }

    /// Apply feedback to the current round and persist the knowledge base
    ///
    /// Consumes the round. If persisting fails, the knowledge base and the
    /// round are both restored so the call can be retried. Returns the number
    /// of records evicted as inconsistent.
    pub fn submit(&mut self, feedback: Feedback) -> Result<usize> {
        let round = self.round.take().ok_or(TrainerError::NoActiveRound)?;
        let snapshot = self.knowledge.clone();

        let evicted = self.knowledge.record_feedback(round.outcome.permutation, feedback);

        if let Err(e) = self.store.save_all(self.knowledge.records()) {
            warn!(error = %e, "persist failed, rolling back feedback");
            self.knowledge = snapshot;
            self.round = Some(round);
            return Err(e);
        }

        info!(%feedback, evicted, records = self.knowledge.len(), "feedback recorded");
        Ok(evicted)
    }

    /// Presentation payload for the current round
    pub fn report(&self) -> Option<RoundReport> {
        self.round.as_ref().map(|round| RoundReport::new(round, self.mastery()))
    }
}
