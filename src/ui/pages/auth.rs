//! Sign-in, registration and password recovery screens.

use dioxus::prelude::*;
use tracing::warn;

use crate::{
    app::{sign_in, Route},
    domain::{
        session::validate_email_only, AppState, Credentials, NewAccount, PasswordReset,
        ValidationErrors,
    },
    infra::api::{FreightClient, LoadApi},
    ui::{
        components::{
            form_field::FormField,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::version::APP_NAME,
};

fn field_error(errors: &Signal<Option<ValidationErrors>>, field: &str) -> Option<String> {
    errors.with(|errors| {
        errors
            .as_ref()
            .and_then(|errors| errors.field(field))
            .map(str::to_string)
    })
}

#[component]
fn AuthFrame(title: &'static str, subtitle: &'static str, children: Element) -> Element {
    rsx! {
        div { class: "app-shell bg-slate-950 text-slate-100",
            div { class: "mx-auto flex w-full max-w-md flex-1 flex-col justify-center px-6 py-10",
                p { class: "text-sm font-semibold uppercase tracking-wide text-sky-300", "{APP_NAME}" }
                h1 { class: "mt-2 text-2xl font-semibold", "{title}" }
                p { class: "mt-1 text-sm {theme::TEXT_MUTED}", "{subtitle}" }
                div { class: "mt-8", {children} }
            }
        }
    }
}

#[component]
pub fn LoginPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<FreightClient>();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut submitting = use_signal(|| false);

    use_effect(move || {
        if state.read().is_signed_in() {
            nav.replace(Route::ActiveLoads {});
        }
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let credentials = Credentials {
            email: email().trim().to_string(),
            password: password(),
        };
        if let Err(invalid) = credentials.validate() {
            errors.set(Some(invalid));
            return;
        }
        errors.set(None);
        submitting.set(true);

        let client = client.clone();
        spawn(async move {
            match client.login(&credentials.email, &credentials.password).await {
                Ok(session) => {
                    sign_in(&mut state, session);
                    nav.replace(Route::ActiveLoads {});
                }
                Err(err) => {
                    warn!(%err, "sign-in failed");
                    push_toast(toasts, ToastKind::Error, err.user_message("Authentication failed"));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        AuthFrame { title: "Sign in", subtitle: "Track your loads and keep dispatch up to date.",
            form { class: "space-y-4", onsubmit: on_submit,
                FormField {
                    label: "Email",
                    value: email(),
                    oninput: move |value| email.set(value),
                    input_type: "email",
                    autocomplete: "email",
                    error: field_error(&errors, "email"),
                }
                FormField {
                    label: "Password",
                    value: password(),
                    oninput: move |value| password.set(value),
                    input_type: "password",
                    autocomplete: "current-password",
                    error: field_error(&errors, "password"),
                }
                button { class: theme::BTN_PRIMARY, r#type: "submit", disabled: submitting(),
                    if submitting() { "Signing in…" } else { "Sign in" }
                }
            }
            div { class: "mt-6 flex items-center justify-between",
                button { class: theme::BTN_LINK, onclick: move |_| { nav.push(Route::ForgotPassword {}); }, "Forgot password?" }
                button { class: theme::BTN_LINK, onclick: move |_| { nav.push(Route::Register {}); }, "Create account" }
            }
        }
    }
}

#[component]
pub fn RegisterPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<FreightClient>();
    let nav = use_navigator();

    let mut account_form = use_signal(NewAccount::default);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let account = account_form();
        if let Err(invalid) = account.validate() {
            errors.set(Some(invalid));
            return;
        }
        errors.set(None);
        submitting.set(true);

        let client = client.clone();
        spawn(async move {
            match client.register(&account).await {
                Ok(session) => {
                    sign_in(&mut state, session);
                    push_toast(toasts, ToastKind::Success, "Welcome aboard!");
                    nav.replace(Route::ActiveLoads {});
                }
                Err(err) => {
                    warn!(%err, "registration failed");
                    push_toast(toasts, ToastKind::Error, err.user_message("Registration failed"));
                }
            }
            submitting.set(false);
        });
    };

    let values = account_form();

    rsx! {
        AuthFrame { title: "Create account", subtitle: "Drivers sign up with the email their carrier invited.",
            form { class: "space-y-4", onsubmit: on_submit,
                div { class: "grid grid-cols-2 gap-3",
                    FormField {
                        label: "First name",
                        value: values.first_name.clone(),
                        oninput: move |value| account_form.with_mut(|f| f.first_name = value),
                        autocomplete: "given-name",
                        error: field_error(&errors, "first_name"),
                    }
                    FormField {
                        label: "Last name",
                        value: values.last_name.clone(),
                        oninput: move |value| account_form.with_mut(|f| f.last_name = value),
                        autocomplete: "family-name",
                        error: field_error(&errors, "last_name"),
                    }
                }
                FormField {
                    label: "Email",
                    value: values.email.clone(),
                    oninput: move |value| account_form.with_mut(|f| f.email = value),
                    input_type: "email",
                    autocomplete: "email",
                    error: field_error(&errors, "email"),
                }
                FormField {
                    label: "Password",
                    value: values.password.clone(),
                    oninput: move |value| account_form.with_mut(|f| f.password = value),
                    input_type: "password",
                    autocomplete: "new-password",
                    error: field_error(&errors, "password"),
                }
                FormField {
                    label: "Confirm password",
                    value: values.confirm_password.clone(),
                    oninput: move |value| account_form.with_mut(|f| f.confirm_password = value),
                    input_type: "password",
                    autocomplete: "new-password",
                    error: field_error(&errors, "confirm_password"),
                }
                button { class: theme::BTN_PRIMARY, r#type: "submit", disabled: submitting(),
                    if submitting() { "Creating account…" } else { "Create account" }
                }
            }
            div { class: "mt-6 text-center",
                button { class: theme::BTN_LINK, onclick: move |_| { nav.push(Route::Login {}); }, "Already registered? Sign in" }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RecoveryStep {
    RequestCode,
    ChooseNewPassword,
}

#[component]
pub fn ForgotPasswordPage() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<FreightClient>();
    let nav = use_navigator();

    let mut step = use_signal(|| RecoveryStep::RequestCode);
    let mut email = use_signal(String::new);
    let mut reset = use_signal(PasswordReset::default);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut submitting = use_signal(|| false);

    let on_request = {
        let client = client.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if submitting() {
                return;
            }
            let address = email().trim().to_string();
            if let Err(invalid) = validate_email_only(&address) {
                errors.set(Some(invalid));
                return;
            }
            errors.set(None);
            submitting.set(true);

            let client = client.clone();
            spawn(async move {
                match client.forgot_password(&address).await {
                    Ok(()) => {
                        push_toast(
                            toasts,
                            ToastKind::Success,
                            "Check your email for a reset code.",
                        );
                        step.set(RecoveryStep::ChooseNewPassword);
                    }
                    Err(err) => {
                        warn!(%err, "password reset request failed");
                        push_toast(
                            toasts,
                            ToastKind::Error,
                            err.user_message("Could not send reset email"),
                        );
                    }
                }
                submitting.set(false);
            });
        }
    };

    let on_reset = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let request = reset();
        if let Err(invalid) = request.validate() {
            errors.set(Some(invalid));
            return;
        }
        errors.set(None);
        submitting.set(true);

        let client = client.clone();
        spawn(async move {
            match client
                .reset_password(request.token.trim(), &request.password)
                .await
            {
                Ok(()) => {
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        "Password updated. Sign in with your new password.",
                    );
                    nav.replace(Route::Login {});
                }
                Err(err) => {
                    warn!(%err, "password reset failed");
                    push_toast(
                        toasts,
                        ToastKind::Error,
                        err.user_message("Could not reset password"),
                    );
                }
            }
            submitting.set(false);
        });
    };

    let values = reset();

    rsx! {
        AuthFrame { title: "Reset password", subtitle: "We will email you a code to choose a new password.",
            match step() {
                RecoveryStep::RequestCode => rsx! {
                    form { class: "space-y-4", onsubmit: on_request,
                        FormField {
                            label: "Email",
                            value: email(),
                            oninput: move |value| email.set(value),
                            input_type: "email",
                            autocomplete: "email",
                            error: field_error(&errors, "email"),
                        }
                        button { class: theme::BTN_PRIMARY, r#type: "submit", disabled: submitting(),
                            "Send reset code"
                        }
                    }
                },
                RecoveryStep::ChooseNewPassword => rsx! {
                    form { class: "space-y-4", onsubmit: on_reset,
                        FormField {
                            label: "Reset code",
                            value: values.token.clone(),
                            oninput: move |value| reset.with_mut(|r| r.token = value),
                            autocomplete: "one-time-code",
                            error: field_error(&errors, "token"),
                        }
                        FormField {
                            label: "New password",
                            value: values.password.clone(),
                            oninput: move |value| reset.with_mut(|r| r.password = value),
                            input_type: "password",
                            autocomplete: "new-password",
                            error: field_error(&errors, "password"),
                        }
                        FormField {
                            label: "Confirm password",
                            value: values.confirm_password.clone(),
                            oninput: move |value| reset.with_mut(|r| r.confirm_password = value),
                            input_type: "password",
                            autocomplete: "new-password",
                            error: field_error(&errors, "confirm_password"),
                        }
                        button { class: theme::BTN_PRIMARY, r#type: "submit", disabled: submitting(),
                            "Update password"
                        }
                    }
                },
            }
            div { class: "mt-6 text-center",
                button { class: theme::BTN_LINK, onclick: move |_| { nav.push(Route::Login {}); }, "Back to sign in" }
            }
        }
    }
}
