use super::super::{Model, Msg};
use super::auth_button::AuthButton;
use yew::prelude::*;

/// Renders the application header with the sign-in/out controls
pub fn render_header(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    html! {
        <header class="app-header">
            <div class="brand">{"rollersAI"}</div>
            <AuthButton
                identity={model.identity.clone()}
                loading={model.session_loading}
                on_sign_in={link.callback(|_| Msg::SignIn)}
                on_sign_out={link.callback(|_| Msg::SignOut)}
            />
        </header>
    }
}
