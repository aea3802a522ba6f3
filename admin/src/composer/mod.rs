//! The show composer: picks a now-playing movie, collects show dates and
//! times plus a ticket price, and submits the result to the show API.

pub mod display;
pub mod draft;
pub mod selection;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AppResult;
use crate::i18n;
use crate::services::auth::{AdminUser, TokenProvider};
use crate::services::notifier::Notifier;
use crate::services::show_api::{AddShowRequest, AddShowResponse, MovieCandidate, ShowBackend};

use draft::{ShowDraft, ValidationError};
use selection::parse_date_time;

/// Result of pressing "add time".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTimeOutcome {
    Added,
    /// The pair was already selected; the input is still cleared.
    Duplicate,
    /// Empty or unparseable input; nothing changed.
    Invalid,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission is still in flight.
    Busy,
    /// The draft failed a local check; nothing was sent.
    Rejected(ValidationError),
    /// The API accepted the show; the draft has been reset.
    Created(String),
    /// The API answered with `success: false`; the draft is untouched.
    Failed(String),
    /// Transport or unexpected failure; the draft is untouched.
    Errored,
}

/// Clears the in-flight flag when dropped, including when a submit future is
/// dropped before completing.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ShowComposer {
    backend: Arc<dyn ShowBackend>,
    tokens: Arc<dyn TokenProvider>,
    notifier: Arc<dyn Notifier>,
    lang: String,
    candidates: Vec<MovieCandidate>,
    draft: ShowDraft,
    date_time_input: String,
    in_flight: Arc<AtomicBool>,
    /// User id the candidate fetch last ran for.
    fetched_for: Option<String>,
}

impl ShowComposer {
    pub fn new(
        backend: Arc<dyn ShowBackend>,
        tokens: Arc<dyn TokenProvider>,
        notifier: Arc<dyn Notifier>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            tokens,
            notifier,
            lang: lang.into(),
            candidates: Vec::new(),
            draft: ShowDraft::new(),
            date_time_input: String::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
            fetched_for: None,
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn candidates(&self) -> &[MovieCandidate] {
        &self.candidates
    }

    pub fn candidate(&self, id: &str) -> Option<&MovieCandidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// The picker shows a loading state until some candidates are available.
    pub fn is_loading(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn draft(&self) -> &ShowDraft {
        &self.draft
    }

    pub fn date_time_input(&self) -> &str {
        &self.date_time_input
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ========================================================================
    // Candidates
    // ========================================================================

    /// Reloads the now playing list. Failures are logged and leave the
    /// current list in place. Returns whether the list was replaced.
    pub async fn fetch_candidates(&mut self) -> bool {
        match self.load_now_playing().await {
            Ok(Some(movies)) => {
                tracing::info!(count = movies.len(), "Loaded now playing movies");
                self.candidates = movies;
                true
            }
            Ok(None) => {
                tracing::warn!("Show API reported failure for now playing movies; keeping current list");
                false
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "Error fetching movies");
                false
            }
        }
    }

    async fn load_now_playing(&self) -> AppResult<Option<Vec<MovieCandidate>>> {
        let token = self.tokens.get_token().await?;
        let response = self.backend.now_playing(&token).await?;
        Ok(response.success.then_some(response.movies))
    }

    /// Runs the candidate fetch whenever the signed-in user changes.
    ///
    /// Keyed on the user id: the same user does not trigger a second fetch,
    /// and signing out re-arms the effect. Returns whether a fetch ran.
    pub async fn on_user_changed(&mut self, user: Option<&AdminUser>) -> bool {
        match user {
            None => {
                self.fetched_for = None;
                false
            }
            Some(user) if self.fetched_for.as_deref() == Some(user.id.as_str()) => false,
            Some(user) => {
                tracing::debug!(user_id = %user.id, "User available; fetching now playing movies");
                self.fetched_for = Some(user.id.clone());
                self.fetch_candidates().await;
                true
            }
        }
    }

    // ========================================================================
    // Draft editing
    // ========================================================================

    pub fn select_movie(&mut self, movie_id: impl Into<String>) {
        self.draft.movie_id = Some(movie_id.into());
    }

    pub fn set_date_time_input(&mut self, value: impl Into<String>) {
        self.date_time_input = value.into();
    }

    /// Moves the current date-time input into the selection.
    pub fn add_date_time(&mut self) -> AddTimeOutcome {
        let Some((date, time)) = parse_date_time(&self.date_time_input) else {
            return AddTimeOutcome::Invalid;
        };
        let inserted = self.draft.selection.insert(date, time);
        self.date_time_input.clear();

        if inserted {
            AddTimeOutcome::Added
        } else {
            AddTimeOutcome::Duplicate
        }
    }

    pub fn remove_date_time(&mut self, date: &str, time: &str) -> bool {
        self.draft.selection.remove(date, time)
    }

    pub fn set_price(&mut self, raw: impl Into<String>) {
        self.draft.price = raw.into();
    }

    // ========================================================================
    // Submission
    // ========================================================================

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            self.notifier.error(&self.message("submit.in_progress"));
            return SubmitOutcome::Busy;
        };

        tracing::debug!(
            movie_id = ?self.draft.movie_id,
            slots = self.draft.selection.len(),
            price = %self.draft.price,
            "Submitting show"
        );

        let request = match self.draft.validate() {
            Ok(request) => request,
            Err(e) => {
                self.notifier.error(&e.user_message(&self.lang));
                return SubmitOutcome::Rejected(e);
            }
        };

        match self.send(&request).await {
            Ok(response) if response.success => {
                let message = if response.message.is_empty() {
                    self.message("show.added_default")
                } else {
                    response.message
                };
                tracing::info!(movie_id = %request.movie_id, slots = request.shows_input.len(), "Show added");
                self.notifier.success(&message);
                self.draft.reset();
                SubmitOutcome::Created(message)
            }
            Ok(response) => {
                tracing::warn!(message = %response.message, "Show API rejected the show");
                let message = if response.message.is_empty() {
                    self.message("error.generic")
                } else {
                    response.message
                };
                self.notifier.error(&message);
                SubmitOutcome::Failed(message)
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = ?e, "Submission error");
                self.notifier.error(&self.message("error.generic"));
                SubmitOutcome::Errored
            }
        }
    }

    async fn send(&self, request: &AddShowRequest) -> AppResult<AddShowResponse> {
        let token = self.tokens.get_token().await?;
        self.backend.add_show(&token, request).await
    }

    fn message(&self, key: &str) -> String {
        i18n::tr(Some(&self.lang), key, None)
    }
}
