use std::fmt::Write;

use chrono::NaiveDateTime;
use tokio::sync::watch;

use crate::composer::display::{format_price_label, render_candidate, render_selection};
use crate::composer::{AddTimeOutcome, ShowComposer};
use crate::config::DisplayConfig;
use crate::i18n;
use crate::services::auth::AdminUser;

const DATE_TIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login { id: String, name: Option<String> },
    Logout,
    Refresh,
    List,
    Select(String),
    Add(String),
    Remove { date: String, time: String },
    Price(String),
    Show,
    Submit,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing argument for '{command}': {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl CliError {
    pub fn user_message(&self, lang: &str) -> String {
        match self {
            CliError::UnknownCommand(command) => i18n::tr(
                Some(lang),
                "cli.unknown_command",
                Some(&[("command", command.as_str())]),
            ),
            CliError::MissingArgument { command, argument } => i18n::tr(
                Some(lang),
                "cli.missing_argument",
                Some(&[("command", *command), ("argument", *argument)]),
            ),
        }
    }
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CliError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "login" => {
                let (id, name) = match rest.split_once(char::is_whitespace) {
                    Some((id, name)) => (id, Some(name.trim().to_string())),
                    None => (rest, None),
                };
                if id.is_empty() {
                    return Err(CliError::MissingArgument {
                        command: "login",
                        argument: "user-id",
                    });
                }
                Command::Login {
                    id: id.to_string(),
                    name: name.filter(|n| !n.is_empty()),
                }
            }
            "logout" => Command::Logout,
            "refresh" => Command::Refresh,
            "list" | "ls" => Command::List,
            "select" => {
                if rest.is_empty() {
                    return Err(CliError::MissingArgument {
                        command: "select",
                        argument: "movie-id",
                    });
                }
                Command::Select(rest.to_string())
            }
            "add" => Command::Add(rest.to_string()),
            "remove" | "rm" => {
                let mut parts = rest.split_whitespace();
                let date = parts.next().ok_or(CliError::MissingArgument {
                    command: "remove",
                    argument: "date",
                })?;
                let time = parts.next().ok_or(CliError::MissingArgument {
                    command: "remove",
                    argument: "time",
                })?;
                Command::Remove {
                    date: date.to_string(),
                    time: time.to_string(),
                }
            }
            "price" => Command::Price(rest.to_string()),
            "show" | "draft" => Command::Show,
            "submit" => Command::Submit,
            "quit" | "exit" => Command::Quit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Terminal front end around a [`ShowComposer`].
///
/// Login and logout only publish the new identity on the watch channel; the
/// candidate fetch is driven by whoever observes that channel.
pub struct Console {
    composer: ShowComposer,
    user: watch::Sender<Option<AdminUser>>,
    display: DisplayConfig,
}

impl Console {
    pub fn new(
        composer: ShowComposer,
        user: watch::Sender<Option<AdminUser>>,
        display: DisplayConfig,
    ) -> Self {
        Self {
            composer,
            user,
            display,
        }
    }

    pub fn composer(&self) -> &ShowComposer {
        &self.composer
    }

    pub fn lang(&self) -> &str {
        &self.display.lang
    }

    /// Feeds a change of the signed-in user into the composer.
    pub async fn user_changed(&mut self, user: Option<AdminUser>) -> Option<String> {
        if self.composer.on_user_changed(user.as_ref()).await {
            Some(self.render_candidates())
        } else {
            None
        }
    }

    /// Runs one command and returns the text to print.
    pub async fn execute(&mut self, command: Command) -> String {
        let lang = self.display.lang.clone();
        match command {
            Command::Help => i18n::tr(Some(&lang), "cli.help", None),
            Command::Login { id, name } => {
                let user = AdminUser::new(id, name);
                let text = i18n::tr(
                    Some(&lang),
                    "session.logged_in",
                    Some(&[("user", user.display_name())]),
                );
                self.user.send_replace(Some(user));
                text
            }
            Command::Logout => {
                self.user.send_replace(None);
                i18n::tr(Some(&lang), "session.logged_out", None)
            }
            Command::Refresh => {
                if self.user.borrow().is_none() {
                    return i18n::tr(Some(&lang), "session.required", None);
                }
                self.composer.fetch_candidates().await;
                self.render_candidates()
            }
            Command::List => self.render_candidates(),
            Command::Select(id) => {
                if self.composer.candidate(&id).is_none() {
                    return i18n::tr(Some(&lang), "candidates.unknown", Some(&[("id", id.as_str())]));
                }
                self.composer.select_movie(id);
                self.render_candidates()
            }
            Command::Add(value) => {
                // Only accept what a datetime-local control would produce.
                if !is_date_time_local(&value) {
                    return i18n::tr(Some(&lang), "selection.invalid_input", None);
                }
                self.composer.set_date_time_input(value);
                match self.composer.add_date_time() {
                    AddTimeOutcome::Invalid => {
                        i18n::tr(Some(&lang), "selection.invalid_input", None)
                    }
                    AddTimeOutcome::Added | AddTimeOutcome::Duplicate => {
                        render_selection(&self.composer.draft().selection, &lang)
                    }
                }
            }
            Command::Remove { date, time } => {
                self.composer.remove_date_time(&date, &time);
                render_selection(&self.composer.draft().selection, &lang)
            }
            Command::Price(raw) => {
                self.composer.set_price(raw);
                format_price_label(&self.display.currency, &self.composer.draft().price, &lang)
            }
            Command::Show => self.render_draft(),
            // Notifications carry the outcome.
            Command::Submit => {
                self.composer.submit().await;
                String::new()
            }
            Command::Quit => String::new(),
        }
    }

    pub fn render_candidates(&self) -> String {
        let lang = &self.display.lang;
        if self.composer.is_loading() {
            return i18n::tr(Some(lang), "candidates.loading", None);
        }

        let selected = self.composer.draft().movie_id.as_deref();
        let mut out = i18n::tr(Some(lang), "candidates.heading", None);
        for candidate in self.composer.candidates() {
            let _ = write!(
                out,
                "\n{}",
                render_candidate(
                    candidate,
                    selected == Some(candidate.id.as_str()),
                    &self.display.image_base_url,
                    lang,
                )
            );
        }
        out
    }

    pub fn render_draft(&self) -> String {
        let lang = &self.display.lang;
        let draft = self.composer.draft();
        let mut out = self.render_candidates();
        let _ = write!(
            out,
            "\n\n{}\n\n{}",
            format_price_label(&self.display.currency, &draft.price, lang),
            render_selection(&draft.selection, lang)
        );
        let status_key = if self.composer.is_submitting() {
            "submit.status_in_progress"
        } else {
            "submit.status_ready"
        };
        let _ = write!(out, "\n\n{}", i18n::tr(Some(lang), status_key, None));
        out
    }
}

/// `YYYY-MM-DDTHH:MM`, a real calendar date and time of day.
fn is_date_time_local(value: &str) -> bool {
    NaiveDateTime::parse_from_str(value, DATE_TIME_LOCAL_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::error::AppResult;
    use crate::services::auth::StaticTokenProvider;
    use crate::services::notifier::testing::{RecordingNotifier, Toast};
    use crate::services::show_api::{
        AddShowRequest, AddShowResponse, MovieCandidate, NowPlayingResponse, ShowBackend,
    };

    struct OneMovieBackend;

    #[async_trait]
    impl ShowBackend for OneMovieBackend {
        async fn now_playing(&self, _token: &str) -> AppResult<NowPlayingResponse> {
            Ok(NowPlayingResponse {
                success: true,
                movies: vec![MovieCandidate {
                    id: "550".to_string(),
                    poster_path: Some("/fc.jpg".to_string()),
                    title: Some("Fight Club".to_string()),
                    release_date: Some("1999-10-15".to_string()),
                    vote_average: Some(8.4),
                    vote_count: Some(1500),
                }],
            })
        }

        async fn add_show(
            &self,
            _token: &str,
            _request: &AddShowRequest,
        ) -> AppResult<AddShowResponse> {
            Ok(AddShowResponse {
                success: true,
                message: "Show Added successfully.".to_string(),
            })
        }
    }

    fn console() -> (Console, watch::Receiver<Option<AdminUser>>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let composer = ShowComposer::new(
            Arc::new(OneMovieBackend),
            Arc::new(StaticTokenProvider::new(Some("tok".to_string()))),
            notifier.clone(),
            "en",
        );
        let (tx, rx) = watch::channel(None);
        let mut display = Config::default().display;
        display.image_base_url = "https://img".to_string();
        (Console::new(composer, tx, display), rx, notifier)
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("help"), Ok(Some(Command::Help)));
        assert_eq!(
            Command::parse("login u1 Jane Doe"),
            Ok(Some(Command::Login {
                id: "u1".to_string(),
                name: Some("Jane Doe".to_string()),
            }))
        );
        assert_eq!(
            Command::parse("LOGIN u1"),
            Ok(Some(Command::Login {
                id: "u1".to_string(),
                name: None,
            }))
        );
        assert_eq!(
            Command::parse("add 2024-05-01T14:00"),
            Ok(Some(Command::Add("2024-05-01T14:00".to_string())))
        );
        assert_eq!(
            Command::parse("remove 2024-05-01 14:00"),
            Ok(Some(Command::Remove {
                date: "2024-05-01".to_string(),
                time: "14:00".to_string(),
            }))
        );
        assert_eq!(
            Command::parse("price  12.50 "),
            Ok(Some(Command::Price("12.50".to_string())))
        );
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn add_without_value_is_an_empty_input() {
        assert_eq!(Command::parse("add"), Ok(Some(Command::Add(String::new()))));
    }

    #[test]
    fn reports_missing_arguments_and_unknown_commands() {
        assert_eq!(
            Command::parse("select"),
            Err(CliError::MissingArgument {
                command: "select",
                argument: "movie-id",
            })
        );
        assert_eq!(
            Command::parse("remove 2024-05-01"),
            Err(CliError::MissingArgument {
                command: "remove",
                argument: "time",
            })
        );
        let err = Command::parse("dance").unwrap_err();
        assert_eq!(err, CliError::UnknownCommand("dance".to_string()));
        assert!(err.user_message("en").contains("Unknown command: dance"));
    }

    #[tokio::test]
    async fn login_publishes_user_and_effect_loads_candidates() {
        let (mut console, mut rx, _) = console();
        assert!(console.render_candidates().contains("Loading"));

        let out = console
            .execute(Command::Login {
                id: "u1".to_string(),
                name: Some("Jane".to_string()),
            })
            .await;
        assert_eq!(out, "Logged in as Jane");

        assert!(rx.has_changed().unwrap());
        let user = rx.borrow_and_update().clone();
        let listing = console.user_changed(user.clone()).await.unwrap();
        assert!(listing.contains("[ ] 550  Fight Club"));
        assert!(listing.contains("1.5k Votes"));

        // Same user again does not refetch.
        assert!(console.user_changed(user).await.is_none());
    }

    #[tokio::test]
    async fn full_flow_submits_and_resets() {
        let (mut console, _rx, notifier) = console();
        console
            .user_changed(Some(AdminUser::new("u1", None)))
            .await;

        let out = console.execute(Command::Select("999".to_string())).await;
        assert!(out.contains("No now playing movie with id 999"));

        let out = console.execute(Command::Select("550".to_string())).await;
        assert!(out.contains("[x] 550"));

        let out = console.execute(Command::Add("2024-05-01".to_string())).await;
        assert!(out.contains("YYYY-MM-DDTHH:MM"));

        let out = console
            .execute(Command::Add("2024-05-01T14:00".to_string()))
            .await;
        assert!(out.contains("2024-05-01: 14:00"));

        let out = console.execute(Command::Price("12".to_string())).await;
        assert_eq!(out, "Show Price: $ 12");

        console.execute(Command::Submit).await;
        assert_eq!(
            notifier.last(),
            Some(Toast::Success("Show Added successfully.".to_string()))
        );
        assert!(console.composer().draft().is_blank());
    }

    #[test]
    fn date_time_local_format_is_enforced() {
        assert!(is_date_time_local("2024-05-01T14:00"));
        assert!(!is_date_time_local("helloTworld"));
        assert!(!is_date_time_local("2024-13-45T99:99"));
        assert!(!is_date_time_local("2024-05-01T14:00T99"));
        assert!(!is_date_time_local(""));
    }

    #[tokio::test]
    async fn malformed_add_input_leaves_selection_empty() {
        let (mut console, _rx, _) = console();

        for input in ["add helloTworld", "add 2024-13-45T99:99"] {
            let command = Command::parse(input).unwrap().unwrap();
            let out = console.execute(command).await;
            assert_eq!(out, "Enter the date and time as YYYY-MM-DDTHH:MM.");
        }

        assert!(console.composer().draft().selection.is_empty());
        assert!(console.composer().draft().selection.flatten().is_empty());
    }

    #[tokio::test]
    async fn draft_view_shows_submit_status() {
        let (console, _rx, _) = console();
        let out = console.render_draft();
        assert!(out.contains("Show Price: $ not set"));
        assert!(out.ends_with("Ready to submit."));
    }

    #[tokio::test]
    async fn refresh_requires_a_user() {
        let (mut console, _rx, _) = console();
        let out = console.execute(Command::Refresh).await;
        assert_eq!(out, "Log in to load now playing movies.");
    }
}
