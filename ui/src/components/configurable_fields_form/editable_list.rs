//! Editable List
//!
//! Backs `array/string` fields: add, edit and remove string entries.

use leptos::prelude::*;
use leptos::web_sys;

/// Append `entry`, ignoring blanks
pub fn with_item(mut items: Vec<String>, entry: &str) -> Vec<String> {
    let entry = entry.trim();
    if !entry.is_empty() {
        items.push(entry.to_string());
    }
    items
}

/// Replace the entry at `idx`; a blank replacement removes it
pub fn replace_item(mut items: Vec<String>, idx: usize, entry: &str) -> Vec<String> {
    let entry = entry.trim();
    if idx < items.len() {
        if entry.is_empty() {
            items.remove(idx);
        } else {
            items[idx] = entry.to_string();
        }
    }
    items
}

pub fn remove_item(mut items: Vec<String>, idx: usize) -> Vec<String> {
    if idx < items.len() {
        items.remove(idx);
    }
    items
}

/// List editor reporting the whole list on every edit
#[component]
pub fn EditableList(
    name: String,
    #[prop(into)] items: Signal<Vec<String>>,
    on_change: Callback<Vec<String>>,
) -> impl IntoView {
    let (draft, set_draft) = signal(String::new());

    let add = move || {
        let current = items.get_untracked();
        let len = current.len();
        let next = draft.with_untracked(|entry| with_item(current, entry));
        if next.len() > len {
            on_change.run(next);
        }
        set_draft.set(String::new());
    };

    view! {
        <div class="border border-gray-200 rounded-lg p-3 bg-gray-50">
            {move || {
                let current = items.get();
                if current.is_empty() {
                    view! {
                        <div class="text-sm text-gray-400 italic pb-2">"No items."</div>
                    }.into_any()
                } else {
                    view! {
                        <ul class="space-y-1 pb-2">
                            {current.into_iter().enumerate().map(|(idx, item)| view! {
                                <li class="flex items-center gap-2">
                                    <input
                                        type="text"
                                        class="flex-1 px-2 py-1 text-sm border border-gray-300 rounded"
                                        prop:value=item
                                        on:change=move |ev| {
                                            let entry = event_target_value(&ev);
                                            on_change.run(replace_item(items.get_untracked(), idx, &entry));
                                        }
                                    />
                                    <button
                                        type="button"
                                        class="text-red-500 hover:bg-red-50 p-1 rounded"
                                        title="Remove"
                                        on:click=move |_| on_change.run(remove_item(items.get_untracked(), idx))
                                    >
                                        <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                                        </svg>
                                    </button>
                                </li>
                            }).collect_view()}
                        </ul>
                    }.into_any()
                }
            }}
            <div class="flex gap-2">
                <input
                    type="text"
                    id=name
                    placeholder="Add item"
                    class="flex-1 px-2 py-1 text-sm border border-gray-300 rounded"
                    prop:value=draft
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            add();
                        }
                    }
                />
                <button
                    type="button"
                    class="px-2 py-1 text-xs rounded text-blue-600 hover:bg-blue-50"
                    on:click=move |_| add()
                >
                    "Add"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_with_item_skips_blank() {
        assert_eq!(with_item(items(&["a"]), " b "), items(&["a", "b"]));
        assert_eq!(with_item(items(&["a"]), "   "), items(&["a"]));
    }

    #[test]
    fn test_replace_item() {
        assert_eq!(replace_item(items(&["a", "b"]), 1, "c"), items(&["a", "c"]));
        assert_eq!(replace_item(items(&["a", "b"]), 0, ""), items(&["b"]));
        assert_eq!(replace_item(items(&["a"]), 3, "c"), items(&["a"]));
    }

    #[test]
    fn test_remove_item() {
        assert_eq!(remove_item(items(&["a", "b"]), 0), items(&["b"]));
        assert_eq!(remove_item(items(&["a"]), 5), items(&["a"]));
    }
}
