use configurator::domain::{parameters_from_configs, FormValues, Parameter, ParameterConfig};
use configurator::form::{FieldError, FormEngine};
use leptos::prelude::*;
use serde_json::Value;

mod components;

use components::configurable_fields_form::ConfigurableFieldsForm;

const DEMO_PARAMETERS: &str = include_str!("../demo/parameters.json");
const NAME_PREFIX: &str = "pg-";

fn demo_parameters() -> Result<Vec<Parameter>, String> {
    let configs: Vec<ParameterConfig> = serde_json::from_str(DEMO_PARAMETERS).map_err(|e| e.to_string())?;
    parameters_from_configs(configs).map_err(|e| e.to_string())
}

#[component]
pub fn App() -> impl IntoView {
    let content = match demo_parameters() {
        Ok(params) => view! { <SourceForm params=params /> }.into_any(),
        Err(e) => view! {
            <div class="p-4 bg-red-50 text-red-700 rounded">
                {format!("Failed to load parameters: {}", e)}
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="min-h-screen bg-gray-100 p-8">
            <div class="max-w-2xl mx-auto bg-white rounded-lg shadow p-6">
                <h1 class="text-2xl font-bold mb-6">"Postgres source"</h1>
                {content}
            </div>
        </div>
    }
}

#[component]
fn SourceForm(params: Vec<Parameter>) -> impl IntoView {
    let form = RwSignal::new(FormValues::new());
    let (touches, set_touches) = signal(0usize);
    let (result, set_result) = signal(None::<Result<Value, Vec<FieldError>>>);
    let (attempted, set_attempted) = signal(false);
    let submit_params = StoredValue::new(params.clone());

    let on_touch = Callback::new(move |_: ()| set_touches.update(|n| *n += 1));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_attempted.set(true);
        let engine = FormEngine::with_store(
            form.get_untracked(),
            submit_params.get_value(),
            FormValues::new(),
            Some(NAME_PREFIX.to_string()),
        );
        let outcome = engine.submit();
        if let Err(errors) = &outcome {
            log::info!("Submit blocked by {} field error(s)", errors.len());
        }
        set_result.set(Some(outcome));
    };

    view! {
        <form on:submit=on_submit class="space-y-6">
            <ConfigurableFieldsForm
                fields_params_list=params
                form=form
                name_prefix=NAME_PREFIX
                handle_touch_any_field=on_touch
                show_errors=attempted
            />

            <div class="flex items-center justify-between">
                <span class="text-xs text-gray-500">
                    {move || format!("Touched {} time(s)", touches.get())}
                </span>
                <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded hover:bg-blue-700">
                    "Save"
                </button>
            </div>

            {move || result.get().map(|outcome| match outcome {
                Ok(submitted) => view! {
                    <pre class="p-3 bg-gray-50 text-xs rounded overflow-x-auto">
                        {serde_json::to_string_pretty(&submitted).unwrap_or_default()}
                    </pre>
                }.into_any(),
                Err(errors) => view! {
                    <p class="p-3 bg-red-50 text-sm text-red-700 rounded">
                        {format!("Fix {} field(s) before saving", errors.len())}
                    </p>
                }.into_any(),
            })}
        </form>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
