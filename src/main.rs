// src/main.rs — Activity Board (Rust + Yew + WASM)
// Browser client for the activity sign-up service:
// - loads the catalog from GET /activities and renders one card per activity
// - signs a student up via POST /activities/{name}/signup?email=...
// - removes a participant via DELETE /activities/{name}/unregister?email=...
// Every successful mutation re-fetches the whole catalog, so the view is
// always a projection of the last successful response.

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::Deserialize;
use urlencoding::encode;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlFormElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const ACTIVITIES_URL: &str = "/activities";
const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
const MESSAGE_HIDE_MS: u32 = 5_000;

const FETCH_FAILED: &str = "Failed to load activities. Please try again later.";
const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
const UNREGISTER_FAILED: &str = "Failed to unregister participant.";

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct ActivityDetails {
    description: String,
    schedule: String,
    max_participants: u32,
    participants: Vec<String>,
}

/// Catalog entries in the order the server sent them.
type Catalog = Vec<(String, ActivityDetails)>;

#[derive(Debug, Deserialize)]
struct SignupReply {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

// ---------- API helpers ----------

fn signup_url(activity: &str, email: &str) -> String {
    format!(
        "/activities/{}/signup?email={}",
        encode(activity),
        encode(email)
    )
}

fn unregister_url(activity: &str, email: &str) -> String {
    format!(
        "/activities/{}/unregister?email={}",
        encode(activity),
        encode(email)
    )
}

// serde_json's preserve_order feature keeps the response's key order, so the
// cards and the select options come out exactly as the server listed them.
fn parse_catalog(body: &str) -> Result<Catalog, serde_json::Error> {
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(body)?;
    entries
        .into_iter()
        .map(|(name, details)| Ok((name, serde_json::from_value(details)?)))
        .collect()
}

fn parse_signup_reply(body: &str) -> Option<String> {
    serde_json::from_str::<SignupReply>(body)
        .ok()
        .map(|r| r.message)
}

/// Server text for a rejected signup. A JSON body without a `detail` field
/// gets the generic fallback; a body that is not JSON at all reads as a
/// parse failure and returns `None`.
fn signup_rejection(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    Some(
        value
            .get("detail")
            .and_then(|d| d.as_str())
            .map(String::from)
            .unwrap_or_else(|| SIGNUP_REJECTED_FALLBACK.to_string()),
    )
}

fn error_detail(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| fallback.to_string())
}

async fn fetch_catalog() -> Result<Catalog, String> {
    let resp = Request::get(ACTIVITIES_URL)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let body = resp.text().await.map_err(|e| e.to_string())?;
    parse_catalog(&body).map_err(|e| e.to_string())
}

fn log_error(context: &str, err: &str) {
    web_sys::console::error_1(&format!("{context}: {err}").into());
}

// ---------- view model ----------

fn spots_left(details: &ActivityDetails) -> i64 {
    i64::from(details.max_participants) - details.participants.len() as i64
}

fn availability_label(details: &ActivityDetails) -> String {
    format!("{} spots left", spots_left(details))
}

/// Value/label pairs for the activity selector. The placeholder entry comes
/// first with an empty value so an untouched form fails the browser's
/// `required` check.
fn option_list(names: &[String]) -> Vec<(String, String)> {
    let mut options = vec![(String::new(), SELECT_PLACEHOLDER.to_string())];
    options.extend(names.iter().map(|n| (n.clone(), n.clone())));
    options
}

// ---------- status messages ----------

#[derive(Debug, Clone, PartialEq)]
enum NoteKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
struct StatusNote {
    text: String,
    kind: NoteKind,
}

impl StatusNote {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoteKind::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoteKind::Error,
        }
    }

    fn css_class(&self) -> &'static str {
        match self.kind {
            NoteKind::Success => "success",
            NoteKind::Error => "error",
        }
    }
}

#[derive(Clone, PartialEq)]
enum CatalogState {
    Loading,
    Ready(Catalog),
    Unavailable,
}

// ---------- app ----------

#[function_component(App)]
fn app() -> Html {
    let catalog = use_state(|| CatalogState::Loading);
    // Select options survive a failed fetch, so they live apart from the list.
    let activity_names = use_state(Vec::<String>::new);
    let note = use_state(|| None::<StatusNote>);

    let form_ref = use_node_ref();
    let email_ref = use_node_ref();
    let select_ref = use_node_ref();

    // Show a note and arm the 5 s auto-hide. Timers are fire-and-forget:
    // the message area shows whichever response settled last, and hides on
    // whichever timer fires next.
    let show_note = {
        let note = note.clone();
        Callback::from(move |n: StatusNote| {
            note.set(Some(n));
            let note = note.clone();
            Timeout::new(MESSAGE_HIDE_MS, move || note.set(None)).forget();
        })
    };

    let load_activities = {
        let catalog = catalog.clone();
        let activity_names = activity_names.clone();
        Callback::from(move |_: ()| {
            let catalog = catalog.clone();
            let activity_names = activity_names.clone();
            spawn_local(async move {
                match fetch_catalog().await {
                    Ok(entries) => {
                        activity_names.set(entries.iter().map(|(n, _)| n.clone()).collect());
                        catalog.set(CatalogState::Ready(entries));
                    }
                    Err(err) => {
                        log_error("Error fetching activities", &err);
                        catalog.set(CatalogState::Unavailable);
                    }
                }
            });
        })
    };

    let on_signup = {
        let form_ref = form_ref.clone();
        let email_ref = email_ref.clone();
        let select_ref = select_ref.clone();
        let show_note = show_note.clone();
        let load_activities = load_activities.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let Some(email_input) = email_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let Some(select) = select_ref.cast::<HtmlSelectElement>() else {
                return;
            };
            let email = email_input.value();
            let activity = select.value();
            let form = form_ref.cast::<HtmlFormElement>();

            let show_note = show_note.clone();
            let load_activities = load_activities.clone();
            spawn_local(async move {
                match Request::post(&signup_url(&activity, &email)).send().await {
                    Ok(resp) if resp.ok() => {
                        let body = resp.text().await.unwrap_or_default();
                        match parse_signup_reply(&body) {
                            Some(message) => {
                                show_note.emit(StatusNote::success(message));
                                if let Some(form) = form {
                                    form.reset();
                                }
                                load_activities.emit(());
                            }
                            None => {
                                log_error("Error signing up", "unparsable response body");
                                show_note.emit(StatusNote::error(SIGNUP_FAILED));
                            }
                        }
                    }
                    Ok(resp) => {
                        let body = resp.text().await.unwrap_or_default();
                        match signup_rejection(&body) {
                            Some(text) => show_note.emit(StatusNote::error(text)),
                            None => {
                                log_error("Error signing up", "unparsable response body");
                                show_note.emit(StatusNote::error(SIGNUP_FAILED));
                            }
                        }
                    }
                    Err(err) => {
                        log_error("Error signing up", &err.to_string());
                        show_note.emit(StatusNote::error(SIGNUP_FAILED));
                    }
                }
            });
        })
    };

    // Bound per roster entry; several removals may be in flight at once and
    // each successful one re-fetches on its own.
    let unregister_participant = {
        let show_note = show_note.clone();
        let load_activities = load_activities.clone();
        Callback::from(move |(participant, activity): (String, String)| {
            let show_note = show_note.clone();
            let load_activities = load_activities.clone();
            spawn_local(async move {
                match Request::delete(&unregister_url(&activity, &participant))
                    .send()
                    .await
                {
                    Ok(resp) if resp.ok() => load_activities.emit(()),
                    Ok(resp) => {
                        let body = resp.text().await.unwrap_or_default();
                        show_note.emit(StatusNote::error(error_detail(&body, UNREGISTER_FAILED)));
                    }
                    Err(err) => {
                        log_error("Error unregistering participant", &err.to_string());
                        show_note.emit(StatusNote::error(UNREGISTER_FAILED));
                    }
                }
            });
        })
    };

    // Load the catalog once on first render.
    {
        let load_activities = load_activities.clone();
        use_effect_with((), move |_| {
            load_activities.emit(());
            || ()
        });
    }

    let list = match &*catalog {
        CatalogState::Loading => html! { <p>{ "Loading activities..." }</p> },
        CatalogState::Unavailable => html! { <p>{ FETCH_FAILED }</p> },
        CatalogState::Ready(entries) => entries
            .iter()
            .map(|(name, details)| {
                let roster = if details.participants.is_empty() {
                    html! { <li class="participant-empty">{ "No participants yet" }</li> }
                } else {
                    details
                        .participants
                        .iter()
                        .map(|participant| {
                            let on_remove = {
                                let unregister_participant = unregister_participant.clone();
                                let participant = participant.clone();
                                let activity = name.clone();
                                Callback::from(move |_: MouseEvent| {
                                    unregister_participant
                                        .emit((participant.clone(), activity.clone()));
                                })
                            };
                            html! {
                                <li class="participant-item">
                                    { participant.clone() }
                                    <button
                                        type="button"
                                        class="delete-icon"
                                        aria-label={format!("Remove {participant} from {name}")}
                                        onclick={on_remove}
                                    >
                                        { "X" }
                                    </button>
                                </li>
                            }
                        })
                        .collect::<Html>()
                };

                html! {
                    <div class="activity-card">
                        <h4>{ name.clone() }</h4>
                        <p>{ details.description.clone() }</p>
                        <p><strong>{ "Schedule: " }</strong>{ details.schedule.clone() }</p>
                        <p><strong>{ "Availability: " }</strong>{ availability_label(details) }</p>
                        <div class="participants">
                            <p><strong>{ "Participants:" }</strong></p>
                            <ul class="participants-list">{ roster }</ul>
                        </div>
                    </div>
                }
            })
            .collect::<Html>(),
    };

    let (note_class, note_text) = match &*note {
        Some(n) => (n.css_class(), n.text.clone()),
        None => ("hidden", String::new()),
    };

    html! {
        <>
            <header>
                <h1>{ "Activity Board" }</h1>
                <p>{ "Browse activities and manage sign-ups" }</p>
            </header>

            <main>
                <section>
                    <h3>{ "Current Activities" }</h3>
                    <div id="activities-list">{ list }</div>
                </section>

                <section>
                    <h3>{ "Sign Up for an Activity" }</h3>
                    <form id="signup-form" ref={form_ref} onsubmit={on_signup}>
                        <label for="email">{ "Student Email:" }</label>
                        <input
                            id="email"
                            ref={email_ref}
                            type="email"
                            required=true
                            placeholder="your-email@school.edu"
                        />
                        <label for="activity">{ "Select Activity:" }</label>
                        <select id="activity" ref={select_ref} required=true>
                            { for option_list(activity_names.as_slice()).into_iter().map(|(value, label)| html! {
                                <option value={value}>{ label }</option>
                            }) }
                        </select>
                        <button type="submit">{ "Sign Up" }</button>
                    </form>
                    <div id="message" class={note_class}>{ note_text }</div>
                </section>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

// ---------- tests ----------

#[cfg(test)]
mod tests {
    use super::*;

    fn details(max: u32, participants: &[&str]) -> ActivityDetails {
        ActivityDetails {
            description: "d".into(),
            schedule: "Mon".into(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn catalog_parse_maps_fields() {
        let body = r#"{"Chess Club":{"description":"d","schedule":"Mon","max_participants":10,"participants":["a@x.com","b@x.com"]}}"#;
        let catalog = parse_catalog(body).unwrap();
        assert_eq!(catalog.len(), 1);
        let (name, details) = &catalog[0];
        assert_eq!(name, "Chess Club");
        assert_eq!(details.description, "d");
        assert_eq!(details.schedule, "Mon");
        assert_eq!(details.max_participants, 10);
        assert_eq!(details.participants, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn catalog_parse_keeps_response_order() {
        let body = r#"{
            "Zeta Club":{"description":"z","schedule":"Mon","max_participants":5,"participants":[]},
            "Alpha Club":{"description":"a","schedule":"Tue","max_participants":5,"participants":[]},
            "Mid Club":{"description":"m","schedule":"Wed","max_participants":5,"participants":[]}
        }"#;
        let names: Vec<String> = parse_catalog(body)
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["Zeta Club", "Alpha Club", "Mid Club"]);
    }

    #[test]
    fn catalog_parse_rejects_malformed_bodies() {
        assert!(parse_catalog("<!doctype html>").is_err());
        assert!(parse_catalog(r#"{"Chess Club":{"description":"d"}}"#).is_err());
    }

    #[test]
    fn availability_is_derived_from_capacity_and_roster() {
        assert_eq!(
            availability_label(&details(10, &["a@x.com", "b@x.com"])),
            "8 spots left"
        );
        assert_eq!(spots_left(&details(3, &[])), 3);
        // an overbooked roster goes negative rather than clamping
        assert_eq!(spots_left(&details(1, &["a@x.com", "b@x.com"])), -1);
    }

    #[test]
    fn option_list_leads_with_placeholder() {
        let names = vec!["Chess Club".to_string(), "Art Studio".to_string()];
        let options = option_list(&names);
        assert_eq!(options.len(), names.len() + 1);
        assert_eq!(options[0], (String::new(), SELECT_PLACEHOLDER.to_string()));
        assert_eq!(options[1].0, "Chess Club");
        assert_eq!(options[2].0, "Art Studio");
    }

    #[test]
    fn option_list_is_placeholder_only_for_an_empty_catalog() {
        assert_eq!(
            option_list(&[]),
            vec![(String::new(), SELECT_PLACEHOLDER.to_string())]
        );
    }

    #[test]
    fn urls_percent_encode_path_and_query() {
        assert_eq!(
            signup_url("Chess Club", "new student@x.com"),
            "/activities/Chess%20Club/signup?email=new%20student%40x.com"
        );
        assert_eq!(
            unregister_url("Gym Class", "a+b@x.com"),
            "/activities/Gym%20Class/unregister?email=a%2Bb%40x.com"
        );
    }

    #[test]
    fn signup_reply_extracts_message() {
        assert_eq!(
            parse_signup_reply(r#"{"message":"Signed up!"}"#),
            Some("Signed up!".to_string())
        );
        assert_eq!(parse_signup_reply(""), None);
        assert_eq!(parse_signup_reply(r#"{"detail":"nope"}"#), None);
    }

    #[test]
    fn signup_rejection_prefers_server_detail() {
        assert_eq!(
            signup_rejection(r#"{"detail":"Activity full"}"#),
            Some("Activity full".to_string())
        );
        assert_eq!(
            signup_rejection("{}"),
            Some(SIGNUP_REJECTED_FALLBACK.to_string())
        );
        // not JSON at all: the caller treats this as a parse failure
        assert_eq!(signup_rejection("<html>boom</html>"), None);
    }

    #[test]
    fn error_detail_falls_back_on_unparsable_bodies() {
        assert_eq!(
            error_detail(r#"{"detail":"Student is not registered"}"#, UNREGISTER_FAILED),
            "Student is not registered"
        );
        assert_eq!(error_detail("{}", UNREGISTER_FAILED), UNREGISTER_FAILED);
        assert_eq!(error_detail("", UNREGISTER_FAILED), UNREGISTER_FAILED);
    }

    #[test]
    fn note_kind_maps_to_css_class() {
        assert_eq!(StatusNote::success("ok").css_class(), "success");
        assert_eq!(StatusNote::error("bad").css_class(), "error");
    }
}
