use crate::i18n;
use crate::t;
use dioxus::prelude::*;

/// Sticky dashboard header: brand, tagline, locale switcher and whatever
/// actions the page passes as `children`.
///
/// The selected language is written to the platform's `Signal<String>`
/// context (when one is provided) so every component reading it through
/// [`i18n::use_locale`] re-renders with fresh strings.
#[component]
pub fn AppNavbar(children: Element) -> Element {
    i18n::init();

    let lang_code_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let mut current_lang = use_signal(|| {
        lang_code_ctx
            .map(|code| code())
            .unwrap_or_else(|| i18n::FALLBACK_LANGUAGE.to_string())
    });
    let langs = use_signal(i18n::available_languages);
    let show_switcher = langs().len() > 1;
    let _locale = i18n::use_locale();

    let on_change = move |evt: FormEvent| {
        let val = evt.value();
        match i18n::set_language(&val) {
            Ok(()) => {
                current_lang.set(val.clone());
                if let Some(mut code) = lang_code_ctx {
                    code.set(val);
                }
            }
            Err(err) => tracing::warn!("could not switch language to {val}: {err}"),
        }
    };

    rsx! {
        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    h1 { class: "navbar__title", {t!("app-title")} }
                    p { class: "navbar__subtitle", {t!("app-tagline")} }
                }

                div { class: "navbar__actions",
                    if show_switcher {
                        div { class: "navbar__locale",
                            label {
                                class: "visually-hidden",
                                r#for: "locale-select",
                                {t!("nav-language-label")}
                            }
                            select {
                                id: "locale-select",
                                value: "{current_lang()}",
                                oninput: on_change,
                                for code in langs() {
                                    option { key: "{code}", value: "{code}", "{code}" }
                                }
                            }
                        }
                    }
                    {children}
                }
            }
        }
    }
}
