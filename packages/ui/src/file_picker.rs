use api::FilePart;
use dioxus::prelude::*;

/// Content type sent for an attachment, from its extension.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// File input that hands the first picked file over as a [`FilePart`].
#[component]
pub fn FilePicker(
    label: String,
    #[props(default = "".to_string())] accept: String,
    #[props(default)] selected: Option<String>,
    on_pick: EventHandler<FilePart>,
) -> Element {
    let onchange = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        match engine.read_file(&name).await {
            Some(bytes) => {
                let mime = mime_for(&name);
                on_pick.call(FilePart::new(name, mime, bytes));
            }
            None => tracing::warn!("Could not read {}", name),
        }
    };

    rsx! {
        label { class: "form-file",
            span { "{label}" }
            input { r#type: "file", accept: "{accept}", onchange: onchange }
            if let Some(name) = selected {
                span { class: "muted", "{name}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for("paper.PDF"), "application/pdf");
        assert_eq!(mime_for("me.jpeg"), "image/jpeg");
        assert_eq!(mime_for("README"), "application/octet-stream");
    }
}
