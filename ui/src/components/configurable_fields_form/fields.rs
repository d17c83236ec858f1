//! Field Controls
//!
//! One control per `ControlKind`. Controls read their value from the form
//! signal and report edits as `FieldInput`; committing is the engine's job.

use configurator::domain::{is_truthy, SelectOption};
use configurator::form::{ControlKind, FieldInput};
use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use wasm_bindgen::JsCast;

use super::editable_list::EditableList;
use crate::components::json_editor::JsonEditor;

const INPUT_CLASS: &str =
    "w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500";

// ============================================================================
// Value helpers
// ============================================================================

/// Text shown by text-like controls
pub fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Ids currently selected in a select control
pub fn selected_ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => vec![id.clone()],
        Some(Value::Array(ids)) => ids.iter().filter_map(Value::as_str).map(String::from).collect(),
        _ => Vec::new(),
    }
}

/// Entries of an editable list; a lone string counts as one entry
pub fn list_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(|v| text_of(Some(v))).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn selected_options(select: &web_sys::HtmlSelectElement) -> Vec<String> {
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<web_sys::HtmlOptionElement>().ok())
        .map(|option| option.value())
        .filter(|id| !id.is_empty())
        .collect()
}

// ============================================================================
// Dispatch
// ============================================================================

/// Renders the control for one field
#[component]
pub fn FieldControl(
    /// Bound field name, used as the element id
    name: String,
    control: ControlKind,
    #[prop(into)] value: Signal<Option<Value>>,
    on_change: Callback<FieldInput>,
) -> impl IntoView {
    match control {
        ControlKind::MaskedText => view! {
            <PasswordInput name=name value=value on_change=on_change />
        }
        .into_any(),
        ControlKind::DigitsText => view! {
            <TextInput name=name value=value on_change=on_change input_mode="numeric" />
        }
        .into_any(),
        ControlKind::Select { options, multiple } => view! {
            <SelectInput name=name options=options multiple=multiple value=value on_change=on_change />
        }
        .into_any(),
        ControlKind::EditableList => {
            let items = Signal::derive(move || value.with(|v| list_items(v.as_ref())));
            view! {
                <EditableList
                    name=name
                    items=items
                    on_change=Callback::new(move |items: Vec<String>| on_change.run(FieldInput::List(items)))
                />
            }
            .into_any()
        }
        ControlKind::JsonEditor => view! {
            <LazyJsonField name=name value=value on_change=on_change />
        }
        .into_any(),
        ControlKind::Toggle => view! {
            <ToggleSwitch name=name value=value on_change=on_change />
        }
        .into_any(),
        ControlKind::Text => view! {
            <TextInput name=name value=value on_change=on_change />
        }
        .into_any(),
    }
}

// ============================================================================
// Text-like inputs
// ============================================================================

#[component]
fn TextInput(
    name: String,
    value: Signal<Option<Value>>,
    on_change: Callback<FieldInput>,
    #[prop(default = "text")] input_mode: &'static str,
) -> impl IntoView {
    view! {
        <input
            type="text"
            id=name.clone()
            name=name
            inputmode=input_mode
            class=INPUT_CLASS
            prop:value=move || value.with(|v| text_of(v.as_ref()))
            on:input=move |ev| on_change.run(FieldInput::Text(event_target_value(&ev)))
        />
    }
}

#[component]
fn PasswordInput(name: String, value: Signal<Option<Value>>, on_change: Callback<FieldInput>) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div class="flex gap-2">
            <input
                type=move || if visible.get() { "text" } else { "password" }
                id=name.clone()
                name=name
                autocomplete="off"
                class=INPUT_CLASS
                prop:value=move || value.with(|v| text_of(v.as_ref()))
                on:input=move |ev| on_change.run(FieldInput::Text(event_target_value(&ev)))
            />
            <button
                type="button"
                class="px-2 text-xs text-gray-600 hover:bg-gray-100 rounded"
                on:click=move |_| set_visible.update(|v| *v = !*v)
            >
                {move || if visible.get() { "Hide" } else { "Show" }}
            </button>
        </div>
    }
}

// ============================================================================
// Select
// ============================================================================

#[component]
fn SelectInput(
    name: String,
    options: Vec<SelectOption>,
    multiple: bool,
    value: Signal<Option<Value>>,
    on_change: Callback<FieldInput>,
) -> impl IntoView {
    let on_select = move |ev: web_sys::Event| {
        let select = event_target::<web_sys::HtmlSelectElement>(&ev);
        on_change.run(FieldInput::Selected(selected_options(&select)));
    };

    view! {
        <select
            id=name.clone()
            name=name
            multiple=multiple
            class=format!("{} bg-white", INPUT_CLASS)
            on:change=on_select
        >
            {(!multiple).then(|| view! { <option value="">"-- Select --"</option> })}
            {options.into_iter().map(|option| {
                let id = option.id.clone();
                view! {
                    <option
                        value=option.id
                        prop:selected=move || value.with(|v| selected_ids(v.as_ref()).contains(&id))
                    >
                        {option.display_name}
                    </option>
                }
            }).collect_view()}
        </select>
    }
}

// ============================================================================
// Toggle
// ============================================================================

#[component]
fn ToggleSwitch(name: String, value: Signal<Option<Value>>, on_change: Callback<FieldInput>) -> impl IntoView {
    view! {
        <label class="switch">
            <input
                type="checkbox"
                role="switch"
                id=name.clone()
                name=name
                prop:checked=move || value.with(|v| v.as_ref().is_some_and(is_truthy))
                on:change=move |ev| on_change.run(FieldInput::Toggled(event_target_checked(&ev)))
            />
            <span class="switch-slider"></span>
        </label>
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Mounts the JSON editor one tick after the rest of the form so the other
/// fields are interactive while it loads
#[component]
fn LazyJsonField(name: String, value: Signal<Option<Value>>, on_change: Callback<FieldInput>) -> impl IntoView {
    let editor_ready = LocalResource::new(|| async {
        gloo_timers::future::TimeoutFuture::new(0).await;
    });
    let text = Signal::derive(move || value.with(|v| text_of(v.as_ref())));
    let on_text = Callback::new(move |text: String| on_change.run(FieldInput::Json(text)));

    view! {
        <Suspense fallback=move || view! {
            <div class="flex items-center gap-2 text-sm text-gray-500">
                <span class="spinner" aria-hidden="true"></span>
                "Loading editor..."
            </div>
        }>
            {move || editor_ready.get().map(|_| view! {
                <JsonEditor name=name.clone() value=text on_change=on_text />
            })}
        </Suspense>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_of() {
        assert_eq!(text_of(None), "");
        assert_eq!(text_of(Some(&Value::Null)), "");
        assert_eq!(text_of(Some(&json!("db"))), "db");
        assert_eq!(text_of(Some(&json!(5432))), "5432");
    }

    #[test]
    fn test_selected_ids() {
        assert_eq!(selected_ids(Some(&json!("iam"))), vec!["iam"]);
        assert_eq!(selected_ids(Some(&json!(["a", "b"]))), vec!["a", "b"]);
        assert!(selected_ids(Some(&json!(""))).is_empty());
        assert!(selected_ids(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_list_items() {
        assert_eq!(list_items(Some(&json!(["public", "sales"]))), vec!["public", "sales"]);
        assert_eq!(list_items(Some(&json!("public"))), vec!["public"]);
        assert!(list_items(None).is_empty());
    }
}
