//! Configurable Fields Form Component
//!
//! Renders one row per parameter and binds every row to the shared form
//! signal through the engine.

use configurator::domain::{FormStore, FormValues, Parameter};
use configurator::form::{compose_rows, FieldInput, FieldRow, FormEngine, Rule, TOUCH_DEBOUNCE_MS};
use leptos::prelude::*;
use serde_json::Value;

use super::debounce::use_debounced;
use super::fields::FieldControl;

// ============================================================================
// Signal-backed store
// ============================================================================

/// `FormStore` over the parent's form signal.
///
/// Engine reads are untracked; views subscribe to the signal themselves.
#[derive(Clone, Copy, Debug)]
pub struct SignalStore(pub RwSignal<FormValues>);

impl FormStore for SignalStore {
    fn fields_value(&self) -> FormValues {
        self.0.get_untracked()
    }

    fn field_value(&self, id: &str) -> Option<Value> {
        self.0.with_untracked(|values| values.get(id).cloned())
    }

    fn set_fields_value(&mut self, values: FormValues) {
        self.0.update(|current| current.merge(values));
    }
}

fn is_required(row: &FieldRow) -> bool {
    row.rules.as_ref().is_some_and(|rules| {
        rules.iter().any(|rule| match rule {
            Rule::Required { .. } => true,
            Rule::IsoDate { required, .. } => *required,
        })
    })
}

/// Rule message shown under a row once it was edited or the form asked
/// for errors
fn visible_error(row: Option<&FieldRow>, value: Option<&Value>, reveal: bool) -> Option<String> {
    if !reveal {
        return None;
    }
    row?.error_for(value)
}

// ============================================================================
// Form
// ============================================================================

/// Schema-driven form: one bound control per parameter.
///
/// Fields whose constant resolves are hidden but stay mounted, so their
/// values remain part of `form`.
#[component]
pub fn ConfigurableFieldsForm(
    /// Parameters, rendered in order
    fields_params_list: Vec<Parameter>,
    /// Form state shared with the parent
    form: RwSignal<FormValues>,
    /// Values that take precedence over defaults and constants at mount
    #[prop(optional)]
    initial_values: FormValues,
    /// Prefix for bound field names
    #[prop(optional, into)]
    name_prefix: Option<String>,
    /// Fired once per burst of edits on any field
    handle_touch_any_field: Callback<()>,
    /// Show every row's error, edited or not (e.g. after a submit attempt)
    #[prop(optional, into)]
    show_errors: MaybeProp<bool>,
) -> impl IntoView {
    let params = StoredValue::new(fields_params_list.clone());
    let engine = StoredValue::new(FormEngine::with_store(
        SignalStore(form),
        fields_params_list,
        initial_values.clone(),
        name_prefix.clone(),
    ));
    let touch = use_debounced(TOUCH_DEBOUNCE_MS as u32, handle_touch_any_field);

    let rows = Memo::new(move |_| {
        form.with(|values| {
            params.with_value(|params| compose_rows(params, values, &initial_values, name_prefix.as_deref()))
        })
    });

    // Values set from outside the form also move the constants
    Effect::new(move |_| {
        form.track();
        engine.try_update_value(|engine| {
            let changed = engine.recompute_constants();
            if !changed.is_empty() {
                log::debug!("Constants recomputed: {:?}", changed);
            }
        });
    });

    let on_change = Callback::new(move |(id, input): (String, FieldInput)| {
        match engine.try_update_value(|engine| engine.handle_change(&id, input)) {
            Some(Ok(outcome)) => {
                if outcome.touched {
                    touch.run(());
                }
            }
            Some(Err(e)) => log::warn!("Change on '{}' rejected: {}", id, e),
            None => {}
        }
    });

    let ids: Vec<String> = params.with_value(|params| params.iter().map(|p| p.id.clone()).collect());

    view! {
        <div class="configurable-fields-form space-y-4">
            {ids.into_iter().map(|id| view! {
                <ConfigurableField id=id rows=rows form=form on_change=on_change show_errors=show_errors />
            }).collect_view()}
        </div>
    }
}

/// One labelled row; visibility, label and inline error follow the
/// composed row
#[component]
fn ConfigurableField(
    id: String,
    rows: Memo<Vec<FieldRow>>,
    form: RwSignal<FormValues>,
    on_change: Callback<(String, FieldInput)>,
    show_errors: MaybeProp<bool>,
) -> impl IntoView {
    let row_id = id.clone();
    let row = Memo::new(move |_| rows.with(|rows| rows.iter().find(|r| r.id == row_id).cloned()));
    let Some(mounted) = row.get_untracked() else {
        return ().into_any();
    };

    let value_id = id.clone();
    let value = Signal::derive(move || form.with(|values| values.get(&value_id).cloned()));
    let edited = RwSignal::new(false);
    let change_id = id.clone();
    let on_input = Callback::new(move |input: FieldInput| {
        edited.set(true);
        on_change.run((change_id.clone(), input));
    });

    let error = Memo::new(move |_| {
        let reveal = edited.get() || show_errors.get().unwrap_or(false);
        row.with(|r| value.with(|v| visible_error(r.as_ref(), v.as_ref(), reveal)))
    });
    let error_id = format!("{}-error", mounted.name);

    let documented = mounted.documentation.is_some();

    view! {
        <div
            class=move || format!("form-row {}", row.with(|r| r.as_ref().map(FieldRow::class).unwrap_or_default()))
            data-field=id
        >
            <label
                for=mounted.name.clone()
                title=mounted.documentation.clone()
                class="block text-sm font-medium text-gray-700 mb-1"
            >
                {move || row.with(|r| r.as_ref().map(FieldRow::label).unwrap_or_default())}
                {documented.then(|| view! { <span class="doc-hint" aria-hidden="true">" ?"</span> })}
                {move || row.with(|r| r.as_ref().is_some_and(is_required)).then(|| view! {
                    <span class="text-red-500">" *"</span>
                })}
            </label>
            <FieldControl
                name=mounted.name
                control=mounted.control
                value=value
                on_change=on_input
            />
            {move || error.get().map(|message| view! {
                <p id=error_id.clone() class="mt-1 text-xs text-red-500" role="alert">{message}</p>
            })}
        </div>
    }
    .into_any()
}
