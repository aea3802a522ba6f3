use crate::composer::selection::DateTimeSelection;
use crate::i18n;
use crate::services::show_api::AddShowRequest;

/// Why a draft cannot be submitted yet. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no movie selected")]
    MissingMovie,

    #[error("no show date and time added")]
    NoShowTimes,

    #[error("show price is missing, not a number, or not positive")]
    InvalidPrice,
}

impl ValidationError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingMovie => "validation.select_movie",
            ValidationError::NoShowTimes => "validation.add_date_time",
            ValidationError::InvalidPrice => "validation.show_price",
        }
    }

    /// The message shown to the administrator, in `lang`.
    pub fn user_message(&self, lang: &str) -> String {
        i18n::tr(Some(lang), self.message_key(), None)
    }
}

/// Parses the raw price field. Only finite values above zero are accepted.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// The show being put together: which movie, when, and for how much.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowDraft {
    pub movie_id: Option<String>,
    pub selection: DateTimeSelection,
    /// Price exactly as typed.
    pub price: String,
}

impl ShowDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the draft and builds the request payload.
    ///
    /// Only the first failing check is reported: movie, then times, then price.
    pub fn validate(&self) -> Result<AddShowRequest, ValidationError> {
        let movie_id = self
            .movie_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingMovie)?;

        if !self.selection.has_any_time() {
            return Err(ValidationError::NoShowTimes);
        }

        let show_price = parse_price(&self.price).ok_or(ValidationError::InvalidPrice)?;

        Ok(AddShowRequest {
            movie_id: movie_id.to_string(),
            shows_input: self.selection.flatten(),
            show_price,
        })
    }

    pub fn reset(&mut self) {
        self.movie_id = None;
        self.selection.clear();
        self.price.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.movie_id.is_none() && self.selection.is_empty() && self.price.is_empty()
    }
}
