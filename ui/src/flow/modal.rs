use api::{RateField, StoreBackend};
use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::flow::actions;
use crate::flow::{FlowError, FlowMachine, FlowStage, SaveOutcome};
use crate::{i18n, t};

/// Modal that walks a visitor from email entry to a saved dataset.
///
/// Mounting the component opens the flow; unmounting it discards the
/// working copy and cancels interest in any call still in flight.
#[component]
pub fn DatasetFlowModal(on_close: EventHandler<()>, on_save: EventHandler<SaveOutcome>) -> Element {
    let _locale = i18n::use_locale();
    let store = use_context::<StoreBackend>();
    let mut machine = use_signal(FlowMachine::opened);

    let submit_identity = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(request) = machine.with_mut(FlowMachine::submit_identity) else {
                return;
            };
            let store = store.clone();
            spawn(async move {
                let result = actions::resolve(&store, &request).await;
                machine.with_mut(|m| m.finish_resolve(request.ticket, result));
            });
        }
    };

    let submit_save = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(request) = machine.with_mut(FlowMachine::submit_save) else {
                return;
            };
            let store = store.clone();
            spawn(async move {
                let result = actions::persist(&store, &request, OffsetDateTime::now_utc()).await;
                if let Some(outcome) = machine.with_mut(|m| m.finish_save(request.ticket, result)) {
                    on_save.call(outcome);
                }
            });
        }
    };

    let close = move |_| {
        machine.with_mut(FlowMachine::close);
        on_close.call(());
    };

    let snapshot = machine();
    let busy = snapshot.is_busy();
    let error_text = snapshot.error().map(|err| match err {
        FlowError::InvalidEmail => t!("flow-error-invalid-email"),
        FlowError::Store(message) => message.clone(),
    });
    let showing_editor = matches!(snapshot.stage(), FlowStage::Editing | FlowStage::Saving);

    rsx! {
        div { class: "flow-modal",
            role: "dialog",
            aria_modal: "true",
            div { class: "flow-modal__panel",
                button {
                    r#type: "button",
                    class: "flow-modal__close",
                    aria_label: t!("flow-close"),
                    onclick: close,
                    "×"
                }

                if showing_editor {
                    {render_editor(&snapshot, machine, submit_save, store.is_ephemeral(), error_text)}
                } else {
                    h2 { class: "flow-modal__title", {t!("flow-identity-title")} }
                    p { class: "flow-modal__intro", {t!("flow-identity-intro")} }

                    form { class: "flow-form", onsubmit: submit_identity,
                        label { class: "flow-form__label", r#for: "flow-email",
                            {t!("flow-email-label")}
                        }
                        input {
                            id: "flow-email",
                            class: "flow-form__input",
                            r#type: "email",
                            placeholder: t!("flow-email-placeholder"),
                            value: "{snapshot.identity_input()}",
                            disabled: busy,
                            oninput: move |evt: FormEvent| {
                                machine.with_mut(|m| m.set_identity_input(evt.value()));
                            },
                        }

                        if let Some(message) = error_text {
                            div { class: "flow-modal__error", role: "alert", "{message}" }
                        }

                        button {
                            r#type: "submit",
                            class: "button button--accent flow-form__submit",
                            disabled: busy,
                            if busy { {t!("flow-loading")} } else { {t!("flow-continue")} }
                        }
                    }
                }
            }
        }
    }
}

fn render_editor(
    snapshot: &FlowMachine,
    mut machine: Signal<FlowMachine>,
    on_submit: impl FnMut(FormEvent) + 'static,
    ephemeral: bool,
    error_text: Option<String>,
) -> Element {
    let busy = snapshot.is_busy();
    let working = snapshot.working();
    let unbalanced = working.unbalanced_entries().len();

    rsx! {
        h2 { class: "flow-modal__title", {t!("flow-edit-title")} }

        if ephemeral {
            p { class: "flow-modal__notice", {t!("flow-backend-memory")} }
        }

        if snapshot.has_prior_data() {
            div { class: "flow-modal__prior",
                p { strong { {t!("flow-prior-label")} } " " {t!("flow-prior-note")} }
                button {
                    r#type: "button",
                    class: "flow-modal__restore",
                    disabled: busy,
                    onclick: move |_| {
                        machine.with_mut(FlowMachine::restore_previous);
                    },
                    {t!("flow-restore")}
                }
            }
        }

        form { class: "flow-form flow-form--editor", onsubmit: on_submit,
            div { class: "flow-entries",
                for (index, entry) in working.entries().iter().enumerate() {
                    div { key: "{index}", class: "flow-entry",
                        p { class: "flow-entry__label", {t!("flow-entry-time", time = entry.label.clone())} }
                        div { class: "flow-entry__fields",
                            label { class: "flow-entry__field",
                                span { {t!("flow-success-label")} }
                                input {
                                    r#type: "number",
                                    min: "0",
                                    max: "100",
                                    value: snapshot.field_text(index, RateField::Success),
                                    disabled: busy,
                                    oninput: move |evt: FormEvent| {
                                        machine.with_mut(|m| m.edit(index, RateField::Success, &evt.value()));
                                    },
                                    onblur: move |_| machine.with_mut(FlowMachine::settle),
                                }
                            }
                            label { class: "flow-entry__field",
                                span { {t!("flow-failure-label")} }
                                input {
                                    r#type: "number",
                                    min: "0",
                                    max: "100",
                                    value: snapshot.field_text(index, RateField::Failure),
                                    disabled: busy,
                                    oninput: move |evt: FormEvent| {
                                        machine.with_mut(|m| m.edit(index, RateField::Failure, &evt.value()));
                                    },
                                    onblur: move |_| machine.with_mut(FlowMachine::settle),
                                }
                            }
                        }
                    }
                }
            }

            if unbalanced > 0 {
                p { class: "flow-modal__hint", {t!("flow-unbalanced-hint", count = unbalanced)} }
            }

            if let Some(message) = error_text {
                div { class: "flow-modal__error", role: "alert", "{message}" }
            }

            div { class: "flow-form__actions",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: busy,
                    onclick: move |_| {
                        machine.with_mut(FlowMachine::back);
                    },
                    {t!("flow-back")}
                }
                button {
                    r#type: "submit",
                    class: "button button--accent",
                    disabled: busy,
                    if busy { {t!("flow-saving")} } else { {t!("flow-save")} }
                }
            }
        }
    }
}
