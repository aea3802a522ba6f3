/*
Message catalogue for everything the console shows to the administrator.

This module provides:
- A small embedded translations store for EN/RU (compile-time embedded JSON).
- A `tr` function to look up translations by key + optional params.
- `t` / `t_with` convenience wrappers using the default language (DEFAULT_LANG).

Usage:
    use crate::i18n;
    let msg = i18n::t("validation.select_movie");
    let msg_with = i18n::tr(Some("ru"), "session.logged_in", Some(&[("user", "alice")]));

Notes:
- Placeholders in translation strings use single-brace format: `{name}`.
- Default language is `en`. If a key is missing for the requested language,
  the default language is used; if it is missing there too the key itself is returned.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const EN_JSON: &str = r#"
{
  "validation.select_movie": "Please select a movie.",
  "validation.add_date_time": "Please add at least one date and time.",
  "validation.show_price": "Please enter a valid show price.",
  "error.generic": "An error occurred. Please try again.",
  "submit.in_progress": "A show is already being added. Please wait.",
  "submit.status_ready": "Ready to submit.",
  "submit.status_in_progress": "Adding show...",
  "show.added_default": "Show added successfully.",
  "candidates.heading": "Now Playing Movies",
  "candidates.loading": "Loading now playing movies...",
  "candidates.unknown": "No now playing movie with id {id}.",
  "selection.heading": "Selected Date-Time",
  "selection.empty": "No date and time added yet.",
  "selection.invalid_input": "Enter the date and time as YYYY-MM-DDTHH:MM.",
  "price.label": "Show Price",
  "price.unset": "not set",
  "rating.unavailable": "N/A",
  "votes.label": "{count} Votes",
  "session.logged_in": "Logged in as {user}",
  "session.logged_out": "Logged out",
  "session.required": "Log in to load now playing movies.",
  "cli.unknown_command": "Unknown command: {command}. Type 'help' for the list of commands.",
  "cli.missing_argument": "Missing argument for '{command}': {argument}",
  "cli.help": "Commands:\n  login <user-id> [name]   set the current admin user\n  logout                   clear the current admin user\n  refresh                  reload now playing movies\n  list                     show now playing movies\n  select <movie-id>        pick the movie for the show\n  add <YYYY-MM-DDTHH:MM>   add a show date and time\n  remove <date> <time>     remove a show time\n  price <amount>           set the ticket price\n  show                     print the current draft\n  submit                   add the show\n  quit                     leave the console",
  "app.name": "Showtime Admin"
}
"#;

const RU_JSON: &str = r#"
{
  "validation.select_movie": "Пожалуйста, выберите фильм.",
  "validation.add_date_time": "Пожалуйста, добавьте хотя бы одну дату и время.",
  "validation.show_price": "Пожалуйста, укажите корректную цену сеанса.",
  "error.generic": "Произошла ошибка. Попробуйте ещё раз.",
  "submit.in_progress": "Сеанс уже добавляется. Пожалуйста, подождите.",
  "submit.status_ready": "Готово к отправке.",
  "submit.status_in_progress": "Сеанс добавляется...",
  "show.added_default": "Сеанс успешно добавлен.",
  "candidates.heading": "Сейчас в прокате",
  "candidates.loading": "Загрузка фильмов в прокате...",
  "candidates.unknown": "Фильм с id {id} не найден среди фильмов в прокате.",
  "selection.heading": "Выбранные дата и время",
  "selection.empty": "Дата и время ещё не добавлены.",
  "selection.invalid_input": "Укажите дату и время в формате ГГГГ-ММ-ДДTЧЧ:ММ.",
  "price.label": "Цена сеанса",
  "price.unset": "не указана",
  "rating.unavailable": "Н/Д",
  "votes.label": "{count} голосов",
  "session.logged_in": "Вы вошли как {user}",
  "session.logged_out": "Вы вышли из системы",
  "session.required": "Войдите, чтобы загрузить фильмы в прокате.",
  "cli.unknown_command": "Неизвестная команда: {command}. Введите 'help' для списка команд.",
  "cli.missing_argument": "Не указан аргумент для '{command}': {argument}",
  "app.name": "Showtime Admin"
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    let ru_map: HashMap<String, String> = serde_json::from_str(RU_JSON).unwrap_or_else(|e| {
        panic!("failed to parse RU_JSON in i18n module: {}", e);
    });
    out.insert("ru".to_string(), ru_map);

    out
}

fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "en-US" -> "en").
pub fn normalize_language(lang: &str) -> String {
    lang.split(['-', '_'])
        .next()
        .unwrap_or(lang)
        .trim()
        .to_lowercase()
}

pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Translate a key using an explicit language (or default if None).
///
/// Placeholders `{name}` are replaced from `params`. Falls back to the default
/// language, then to the key itself.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        .unwrap_or_else(|| key.to_string());

    match params {
        Some(params) => {
            let mut s = val;
            for (k, v) in params {
                s = s.replace(&format!("{{{}}}", k), v);
            }
            s
        }
        None => val,
    }
}

/// Convenience wrapper: translate using default language (DEFAULT_LANG).
pub fn t(key: &str) -> String {
    tr(None, key, None)
}

/// Convenience wrapper with params (default language).
pub fn t_with(key: &str, params: &[(&str, &str)]) -> String {
    tr(None, key, Some(params))
}
