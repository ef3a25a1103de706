// web_app/pages/login.rs - Sign-in page
//
// Credentials go to the `login` server function; the returned user (with its
// backend token) is stored in the browser session and shared via AuthState.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;

use crate::web_app::app::AuthState;
use crate::web_app::components::Button;
use crate::web_app::error::FetchError;
use crate::web_app::server_fns::{fetch_error, login};
use crate::web_app::session::Credentials;

/// Message for a failed sign-in
pub fn login_error_message(err: &FetchError) -> String {
    match err {
        FetchError::Server { status: 400 | 401 | 403, .. } => {
            "Wrong email or password.".to_string()
        }
        other => other.user_message(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_context::<AuthState>();
    let identity = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let done = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials {
            identity: identity.get_untracked(),
            password: password.get_untracked(),
        };
        if let Err(e) = credentials.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        error.set(None);
        submitting.set(true);
        spawn_local(async move {
            match login(credentials).await.map_err(fetch_error) {
                Ok(user) => {
                    let signed_in = match auth {
                        Some(auth) => auth.sign_in(user).map_err(|e| e.to_string()),
                        None => Err("Sign-in is unavailable.".to_string()),
                    };
                    match signed_in {
                        Ok(()) => {
                            password.set(String::new());
                            done.set(true);
                        }
                        Err(e) => error.set(Some(e)),
                    }
                }
                Err(e) => error.set(Some(login_error_message(&e))),
            }
            submitting.set(false);
        });
    };

    let field_class = "w-full border border-gray-300 rounded-lg px-3 py-2 \
                       focus:ring-2 focus:ring-pink-100 focus:border-pink-500 outline-none";

    view! {
        <div class="flex justify-center items-center py-16 px-4">
            <form
                on:submit=on_submit
                class="w-full max-w-md bg-white rounded-2xl p-8 shadow-sm border border-gray-100 space-y-6"
            >
                <div>
                    <h1 class="text-2xl font-bold text-gray-900">"Sign in"</h1>
                    <p class="text-gray-500 text-sm mt-1">"Use your Nay's Dreams account to leave reviews."</p>
                </div>
                <label class="block space-y-1">
                    <span class="text-sm font-medium text-gray-700">"Email"</span>
                    <input
                        type="email"
                        autocomplete="username"
                        placeholder="tu@correo.com"
                        class=field_class
                        prop:value=move || identity.get()
                        on:input=move |ev| identity.set(event_target_value(&ev))
                    />
                </label>
                <label class="block space-y-1">
                    <span class="text-sm font-medium text-gray-700">"Password"</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        class=field_class
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|e| view! { <p class="text-sm text-red-600" role="alert">{e}</p> })}
                <Button button_type="submit" disabled=submitting>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </Button>
            </form>
            <Show when=move || done.get()>
                <Redirect path="/products" />
            </Show>
        </div>
    }
}
