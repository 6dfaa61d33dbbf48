mod api;
mod auth;
mod components;
mod config;
mod storage;

use api::GenerationClient;
use auth::AuthService;
use components::handlers;
use components::header::render_header;
use components::login_modal::render_login_modal;
use components::preview_area::render_preview_area;
use components::upload_section::render_upload_section;
use gloo_file::File as GlooFile;
use gloo_timers::callback::{Interval, Timeout};
use shared::{CosmeticProgress, GeneratedImage, Identity, SubmitError, Subscription, Workflow};
use std::rc::Rc;
use storage::{BucketStorage, PickedImage};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Session
    SessionLoaded(Option<Identity>),
    SessionChanged(Option<Identity>),
    SignIn,
    SignOut,
    DismissLoginModal,

    // Generation workflow
    FileChosen(Option<GlooFile>),
    ParamChanged(String, String),
    Submit,
    SubmissionSettled(Result<GeneratedImage, SubmitError>),

    // Decorative progress
    ProgressTick,
    ProgressReset,
}

// Main component
pub struct Model {
    auth: AuthService,
    storage: Rc<BucketStorage>,
    api: Rc<GenerationClient>,
    identity: Option<Identity>,
    session_loading: bool,
    session_subscription: Option<Subscription>,
    workflow: Workflow<PickedImage>,
    progress: CosmeticProgress,
    progress_interval: Option<Interval>,
    progress_reset: Option<Timeout>,
    show_login_modal: bool,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = Rc::new(config::load());
        let auth = AuthService::new(Rc::clone(&config));
        let storage = Rc::new(BucketStorage::new(Rc::clone(&config), auth.clone()));
        let api = Rc::new(GenerationClient::new(config.generate_endpoint()));

        let link = ctx.link().clone();
        let subscription =
            auth.subscribe(move |identity| link.send_message(Msg::SessionChanged(identity)));

        handlers::load_session(ctx, auth.clone());

        Self {
            auth,
            storage,
            api,
            identity: None,
            session_loading: true,
            session_subscription: Some(subscription),
            workflow: Workflow::new(config.upload),
            progress: CosmeticProgress::default(),
            progress_interval: None,
            progress_reset: None,
            show_login_modal: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Session
            Msg::SessionLoaded(identity) => handlers::handle_session_loaded(self, identity),
            Msg::SessionChanged(identity) => handlers::handle_session_changed(self, identity),
            Msg::SignIn => handlers::handle_sign_in(self),
            Msg::SignOut => handlers::handle_sign_out(self),
            Msg::DismissLoginModal => {
                self.show_login_modal = false;
                true
            }

            // Generation workflow
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, file),
            Msg::ParamChanged(name, value) => handlers::handle_param_changed(self, &name, &value),
            Msg::Submit => handlers::handle_submit(self, ctx),
            Msg::SubmissionSettled(outcome) => {
                handlers::handle_submission_settled(self, ctx, outcome)
            }

            // Decorative progress
            Msg::ProgressTick => handlers::handle_progress_tick(self),
            Msg::ProgressReset => handlers::handle_progress_reset(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header(self, ctx) }
                { render_login_modal(self, ctx) }

                <main class="main-content">
                    <h1>{"Generate AI Rolling Shots of Your Car"}</h1>
                    { render_upload_section(self, ctx) }
                    { render_preview_area(self) }
                </main>

                <footer class="app-footer">
                    <p>{"rollersAI | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session_subscription = None;
        self.progress_interval = None;
        self.progress_reset = None;
        log::debug!("App torn down, auth listener and timers released");
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
