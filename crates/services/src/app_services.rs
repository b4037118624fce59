use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::QuestionBank;
use storage::repository::Storage;

use crate::Clock;
use crate::activity::ActivityStore;
use crate::error::AppServicesError;
use crate::history::HistoryService;
use crate::quiz::{QuizFilter, QuizSession};

/// Question bank plus activity log, wired once at startup.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<QuestionBank>,
    store: ActivityStore,
    clock: Clock,
}

impl AppServices {
    /// Load the question dataset and open `SQLite` storage in parallel.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the dataset cannot be read or storage
    /// initialization fails.
    pub async fn bootstrap(
        db_url: &str,
        questions_path: impl Into<PathBuf>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let questions_path = questions_path.into();
        let load_bank = async move {
            let bank = tokio::task::spawn_blocking(move || QuestionBank::from_path(questions_path))
                .await??;
            Ok::<_, AppServicesError>(bank)
        };
        let open_storage = async { Ok::<_, AppServicesError>(Storage::sqlite(db_url).await?) };

        let (bank, storage) = tokio::try_join!(load_bank, open_storage)?;
        tracing::info!(questions = bank.len(), "question bank loaded");

        Ok(Self::from_parts(
            Arc::new(bank),
            ActivityStore::from_storage(storage),
            clock,
        ))
    }

    #[must_use]
    pub fn from_parts(bank: Arc<QuestionBank>, store: ActivityStore, clock: Clock) -> Self {
        Self { bank, store, clock }
    }

    /// A new session in `Loading`; call [`QuizSession::load`] before use.
    #[must_use]
    pub fn quiz_session(&self, filter: QuizFilter) -> QuizSession {
        QuizSession::new(Arc::clone(&self.bank), self.store.clone(), filter).with_clock(self.clock)
    }

    #[must_use]
    pub fn history(&self) -> HistoryService {
        HistoryService::new(Arc::clone(&self.bank), self.store.clone())
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn activity(&self) -> ActivityStore {
        self.store.clone()
    }
}
