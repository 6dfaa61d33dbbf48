use super::super::{Model, Msg};
use super::utils::notify;
use crate::auth::AuthService;
use crate::storage::PickedImage;
use gloo_file::File as GlooFile;
use gloo_timers::callback::{Interval, Timeout};
use js_sys::{Date, Math};
use shared::progress::{RESET_DELAY_MS, TICK_INTERVAL_MS};
use shared::{GeneratedImage, Identity, SelectError, Selection, SubmitError, run_submission};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

// Session-fetch failures are logged and treated as signed out; no retry.
pub fn load_session(ctx: &Context<Model>, auth: AuthService) {
    let link = ctx.link().clone();

    spawn_local(async move {
        let identity = match auth.get_session().await {
            Ok(identity) => identity,
            Err(e) => {
                log::error!("Failed to load session: {}", e);
                None
            }
        };
        link.send_message(Msg::SessionLoaded(identity));
    });
}

pub fn handle_session_loaded(model: &mut Model, identity: Option<Identity>) -> bool {
    // A change event that arrived first wins.
    if !model.session_loading {
        return false;
    }
    model.session_loading = false;
    model.identity = identity;
    true
}

pub fn handle_session_changed(model: &mut Model, identity: Option<Identity>) -> bool {
    match &identity {
        Some(user) => log::info!("Signed in as {}", user.display_label()),
        None => log::info!("Signed out"),
    }
    model.session_loading = false;
    if identity.is_some() {
        model.show_login_modal = false;
    }
    model.identity = identity;
    true
}

pub fn handle_sign_in(model: &mut Model) -> bool {
    model.show_login_modal = false;
    if let Err(e) = model.auth.sign_in_with_oauth() {
        log::error!("Sign-in could not start: {}", e);
        notify(&format!("Sign-in failed: {}", e));
    }
    true
}

// Identity is cleared by the change event the auth service publishes.
pub fn handle_sign_out(model: &mut Model) -> bool {
    let auth = model.auth.clone();
    spawn_local(async move {
        if let Err(e) = auth.sign_out().await {
            log::warn!("Provider sign-out failed: {}", e);
        }
    });
    false
}

pub fn handle_file_chosen(model: &mut Model, file: Option<GlooFile>) -> bool {
    let mime_type = file.as_ref().map(|f| f.raw_mime_type());

    match model.workflow.admit(model.identity.as_ref(), mime_type.as_deref()) {
        Ok(()) => {}
        Err(SelectError::SignInRequired) => {
            model.show_login_modal = true;
            return true;
        }
        Err(e) => {
            notify(&e.to_string());
            return false;
        }
    }

    let Some(file) = file else {
        return false;
    };
    let selection = Selection {
        file_name: file.name(),
        mime_type: file.raw_mime_type(),
        payload: PickedImage::new(file),
    };

    match model.workflow.select(model.identity.as_ref(), selection) {
        Ok(()) => true,
        Err(e) => {
            notify(&e.to_string());
            false
        }
    }
}

pub fn handle_param_changed(model: &mut Model, name: &str, value: &str) -> bool {
    match model.workflow.set_param(name, value) {
        Ok(changed) => changed,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

pub fn handle_submit(model: &mut Model, ctx: &Context<Model>) -> bool {
    let plan = match model.workflow.begin_submit(model.identity.as_ref(), Date::now() as u64) {
        Ok(plan) => plan,
        Err(SubmitError::AlreadySubmitting) => {
            log::warn!("Submit ignored: a generation is already running");
            return false;
        }
        Err(SubmitError::SignInRequired) => {
            model.show_login_modal = true;
            return true;
        }
        Err(e) => {
            notify(&e.to_string());
            return false;
        }
    };

    start_progress(model, ctx);

    let storage = Rc::clone(&model.storage);
    let api = Rc::clone(&model.api);
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = run_submission(&*storage, &*api, plan).await;
        link.send_message(Msg::SubmissionSettled(outcome));
    });

    true
}

pub fn handle_submission_settled(
    model: &mut Model,
    ctx: &Context<Model>,
    outcome: Result<GeneratedImage, SubmitError>,
) -> bool {
    // Dropping the interval cancels it.
    model.progress_interval = None;
    model.progress.finish();

    let link = ctx.link().clone();
    model.progress_reset = Some(Timeout::new(RESET_DELAY_MS, move || {
        link.send_message(Msg::ProgressReset);
    }));

    if let Err(e) = model.workflow.settle(outcome) {
        notify(&e.to_string());
    }
    true
}

pub fn handle_progress_tick(model: &mut Model) -> bool {
    if !model.workflow.is_submitting() {
        return false;
    }
    model.progress.advance(Math::random());
    true
}

pub fn handle_progress_reset(model: &mut Model) -> bool {
    model.progress_reset = None;
    model.progress.reset();
    true
}

fn start_progress(model: &mut Model, ctx: &Context<Model>) {
    model.progress_reset = None;
    model.progress.start();

    let link = ctx.link().clone();
    model.progress_interval = Some(Interval::new(TICK_INTERVAL_MS, move || {
        link.send_message(Msg::ProgressTick);
    }));
}
