use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_login_modal(model: &Model, ctx: &Context<Model>) -> Html {
    if !model.show_login_modal {
        return html! {};
    }

    let link = ctx.link();

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>{"Please sign in to upload"}</h2>
                <button class="login-button" onclick={link.callback(|_| Msg::SignIn)}>
                    <i class="fa-brands fa-google"></i>{" Sign in with Google"}
                </button>
                <button class="modal-cancel" onclick={link.callback(|_| Msg::DismissLoginModal)}>
                    {"Cancel"}
                </button>
            </div>
        </div>
    }
}
