//! HTML components shared by the camera pages

use crate::camera_store::{Camera, CameraFamily, POLLING_INTERVAL_RANGE};
use async_trait::async_trait;
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Opening part of a page document, up to and including `<body>` content
pub fn document_open(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        (PreEscaped(r#"<html lang="en">"#))
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (title) " | Camera Console" }
        }
        (PreEscaped("<body>"))
        (content)
    }
}

/// Closing part of a page document
pub fn document_close() -> Markup {
    PreEscaped("</body></html>".to_string())
}

/// Complete document, for pages rendered in one piece
pub fn document(title: &str, content: Markup) -> Markup {
    html! {
        (document_open(title, content))
        (document_close())
    }
}

/// Loading placeholder shown while the camera form renders
pub fn camera_form_skeleton() -> Markup {
    html! {
        div.space-y-6.animate-pulse data-skeleton="camera-form" {
            @for _ in 0..4 {
                div.space-y-2 {
                    div.h-4.w-24.rounded.bg-gray-200 {}
                    div.h-10.w-full.rounded.bg-gray-200 {}
                }
            }
            div.h-10.w-32.rounded.bg-gray-300 {}
        }
    }
}

/// Edit form component
///
/// Receives the camera id from the route and the record fetched for it.
/// Implementations may do their own async work before producing markup.
#[async_trait]
pub trait EditForm: Send + Sync {
    async fn render(&self, camera_id: &str, initial: &Camera) -> Markup;
}

/// Default camera edit form
#[derive(Debug, Clone, Default)]
pub struct CameraEditForm;

#[async_trait]
impl EditForm for CameraEditForm {
    async fn render(&self, camera_id: &str, initial: &Camera) -> Markup {
        camera_edit_form(camera_id, initial)
    }
}

fn camera_edit_form(camera_id: &str, camera: &Camera) -> Markup {
    let action = super::edit_path(camera_id);

    html! {
        form.space-y-6 method="post" action=(action) data-camera-id=(camera_id) {
            script type="application/json" data-initial-data { (PreEscaped(initial_data_json(camera))) }

            (text_field("name", "Name", &camera.name, true))
            (text_field("location", "Location", &camera.location, false))
            (text_field("floor", "Floor", opt(&camera.floor), false))

            div.space-y-2 {
                label.block.text-sm.font-medium for="family" { "Family" }
                select.w-full.rounded.border.px-3.py-2 id="family" name="family" {
                    @for family in CameraFamily::ALL {
                        option value=(family.as_str()) selected[family.as_str() == camera.family] {
                            (family.label())
                        }
                    }
                }
            }

            (text_field("manufacturer", "Manufacturer", opt(&camera.manufacturer), false))
            (text_field("model", "Model", opt(&camera.model), false))
            (text_field("ip_address", "IP address", opt(&camera.ip_address), false))
            (text_field("rtsp_main", "RTSP main stream", opt(&camera.rtsp_main), false))
            (text_field("rtsp_sub", "RTSP sub stream", opt(&camera.rtsp_sub), false))

            div.space-y-2 {
                label.block.text-sm.font-medium for="polling_interval_sec" { "Polling interval (sec)" }
                input.w-full.rounded.border.px-3.py-2
                    type="number"
                    id="polling_interval_sec"
                    name="polling_interval_sec"
                    min=(*POLLING_INTERVAL_RANGE.start())
                    max=(*POLLING_INTERVAL_RANGE.end())
                    value=(camera.polling_interval_sec);
            }

            (checkbox("enabled", "Enabled", camera.enabled))
            (checkbox("polling_enabled", "Polling enabled", camera.polling_enabled))

            div.flex.gap-4 {
                button.rounded.bg-blue-600.px-4.py-2.text-white type="submit" { "Save" }
                button.rounded.border.px-4.py-2 type="reset" { "Reset" }
            }
        }
    }
}

fn text_field(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div.space-y-2 {
            label.block.text-sm.font-medium for=(name) { (label) }
            input.w-full.rounded.border.px-3.py-2
                type="text"
                id=(name)
                name=(name)
                value=(value)
                required[required];
        }
    }
}

fn checkbox(name: &str, label: &str, checked: bool) -> Markup {
    html! {
        div.flex.items-center.gap-2 {
            input type="checkbox" id=(name) name=(name) checked[checked];
            label.text-sm for=(name) { (label) }
        }
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Record as JSON for client-side form state, safe inside a script element
fn initial_data_json(camera: &Camera) -> String {
    match serde_json::to_string(camera) {
        Ok(json) => json.replace('<', "\\u003c"),
        Err(e) => {
            tracing::warn!(camera_id = %camera.camera_id, error = %e, "Failed to serialize initial data");
            "null".to_string()
        }
    }
}
