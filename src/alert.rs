//! Alert messages that are swapped into the page's alert container.

use maud::{Markup, html};

/// A dismissable error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// A short summary of what went wrong.
    pub message: String,
    /// What the user can do about it. May be empty.
    pub details: String,
}

impl Alert {
    pub fn into_html(self) -> Markup {
        // The alert container starts hidden, so the script reveals it and
        // the button hides it again.
        html! {
            div
                id="alert"
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 border rounded-lg shadow
                    text-red-800 border-red-300 bg-red-50
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                span class="font-bold" aria-hidden="true" { "!" }

                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1 text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto"
                    onclick="document.getElementById('alert-container').classList.add('hidden')"
                {
                    "×"
                }
            }

            script
            {
                "document.getElementById('alert-container').classList.remove('hidden');"
            }
        }
    }
}
