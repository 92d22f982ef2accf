use api::actions::{self, AbstractSubmission};
use api::{Endpoint, FilePart};
use dioxus::prelude::*;
use store::views::format::{format_date, paper_status};
use store::views::{build_view, FilterKey, SortKey, ViewParams};
use store::Paper;
use ui::Chip;

#[component]
pub fn Papers() -> Element {
    let papers = ui::use_query::<Vec<Paper>>(|| Some(Endpoint::OwnPapers));
    let mut filter = use_signal(|| "all".to_string());
    let mut page = use_signal(|| 1i64);

    let state = papers.state();
    let items = state.data.clone().unwrap_or_default();
    let params = ViewParams::default()
        .with_filter(FilterKey::status(filter()))
        .with_sort(SortKey::parse("recent"))
        .with_page(page());
    let view = build_view(&items, &params, chrono::Utc::now());
    let chips = vec![
        Chip::new("all", "All"),
        Chip::new("Pending", "Submitted"),
        Chip::new("UnderReview", "Under review"),
        Chip::new("Revision", "Revision"),
        Chip::new("Accepted", "Accepted"),
        Chip::new("Rejected", "Rejected"),
    ];

    rsx! {
        div { class: "screen",
            h1 { "My papers" }
            ui::ChipGroup {
                chips,
                selected: filter(),
                on_select: move |key| {
                    filter.set(key);
                    page.set(1);
                },
            }
            ui::QueryStatus {
                loading: state.is_loading,
                error: state.error.clone(),
                empty: state.data.is_some() && view.is_empty(),
                empty_message: "You have not submitted any papers.",
                on_retry: move |_| papers.refetch(),
                for paper in view.items.clone() {
                    PaperCard { key: "{paper.paper_id}", paper }
                }
                ui::Pager { pagination: view.pagination, on_page: move |p| page.set(p) }
            }
        }
    }
}

#[component]
fn PaperCard(paper: Paper) -> Element {
    let (label, tone) = paper_status(&paper.status);
    let submitted = format_date(paper.submitted_at);
    let conference = paper.conference_name.clone().unwrap_or_default();
    let phase = paper.current_phase().cloned();
    let needs_revision = label == "Revision required";

    rsx! {
        div { class: "card",
            div { class: "row",
                p { class: "card-title", "{paper.title}" }
                ui::Badge { label: label.to_string(), tone }
            }
            p { class: "muted", "{conference} · submitted {submitted}" }
            if let Some(phase) = phase {
                p { class: "muted",
                    "{phase.phase_name}: {phase.status}, due {format_date(phase.deadline)}"
                }
                for (i, feedback) in phase.feedback.iter().enumerate() {
                    blockquote { key: "{i}", "{feedback.comment}" }
                }
            }
            if needs_revision {
                RevisionForm { paper_id: paper.paper_id.clone() }
            }
        }
    }
}

#[component]
fn RevisionForm(paper_id: String) -> Element {
    let queries = ui::use_query_client();
    let submit = ui::use_mutation();
    let mut file = use_signal(|| None::<FilePart>);
    let mut note = use_signal(String::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        let paper_id = paper_id.clone();
        async move {
            let Some(attachment) = file.peek().clone() else {
                return;
            };
            let text = note.peek().clone();
            if submit
                .run(actions::submit_revision(&queries, &paper_id, attachment, Some(&text)))
                .await
                .is_some()
            {
                file.set(None);
                note.set(String::new());
            }
        }
    };

    let selected = file.read().as_ref().map(|f| f.file_name.clone());
    rsx! {
        form { class: "form",
            onsubmit: onsubmit,
            ui::FilePicker {
                label: "Revised manuscript",
                accept: ".pdf,.doc,.docx",
                selected,
                on_pick: move |f| file.set(Some(f)),
            }
            textarea {
                placeholder: "Note to reviewers (optional)",
                value: note(),
                oninput: move |e| note.set(e.value()),
            }
            if let Some(error) = submit.error() {
                div { class: "field-error", "{error}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: file.read().is_none() || submit.pending(),
                "Submit revision"
            }
        }
    }
}

/// Abstract submission for a research conference.
#[component]
pub fn AbstractForm(conference_id: String) -> Element {
    let queries = ui::use_query_client();
    let submit = ui::use_mutation();
    let mut form = use_signal({
        let conference_id = conference_id.clone();
        move || AbstractSubmission {
            conference_id,
            ..AbstractSubmission::default()
        }
    });
    let mut keywords = use_signal(String::new);
    let mut done = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        async move {
            let mut submission = form.peek().clone();
            submission.keywords = keywords
                .peek()
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            if submit.run(actions::submit_abstract(&queries, &submission)).await.is_some() {
                done.set(true);
            }
        }
    };

    if done() {
        return rsx! {
            div { class: "banner banner-success", "Abstract submitted. Track it under Papers." }
        };
    }

    let selected = form.read().file.as_ref().map(|f| f.file_name.clone());
    rsx! {
        form { class: "form card",
            onsubmit: onsubmit,
            p { class: "card-title", "Submit an abstract" }
            input {
                placeholder: "Title",
                value: form.read().title.clone(),
                oninput: move |e| form.write().title = e.value(),
            }
            textarea {
                placeholder: "Abstract",
                value: form.read().abstract_text.clone(),
                oninput: move |e| form.write().abstract_text = e.value(),
            }
            input {
                placeholder: "Keywords, comma separated",
                value: keywords(),
                oninput: move |e| keywords.set(e.value()),
            }
            ui::FilePicker {
                label: "Abstract file",
                accept: ".pdf,.doc,.docx",
                selected,
                on_pick: move |f| form.write().file = Some(f),
            }
            if let Some(error) = submit.error() {
                div { class: "field-error", "{error}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: submit.pending(),
                "Submit abstract"
            }
        }
    }
}
