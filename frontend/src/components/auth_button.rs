use shared::Identity;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AuthButtonProps {
    pub identity: Option<Identity>,
    pub loading: bool,
    pub on_sign_in: Callback<()>,
    pub on_sign_out: Callback<()>,
}

#[function_component(AuthButton)]
pub fn auth_button(props: &AuthButtonProps) -> Html {
    if props.loading {
        return html! {
            <div class="auth-button-container">
                <div class="auth-loading">
                    <i class="fa-solid fa-spinner fa-spin"></i>
                    {" Loading..."}
                </div>
            </div>
        };
    }

    match &props.identity {
        Some(user) => {
            html! {
                <div class="auth-button-container">
                    <div class="user-info">
                        <span class="user-email">{ format!("Hello, {}", user.display_label()) }</span>
                        <button
                            class="logout-button"
                            onclick={props.on_sign_out.reform(|_: MouseEvent| ())}
                            title="Logout"
                        >
                            <i class="fa-solid fa-sign-out-alt"></i>
                            {" Logout"}
                        </button>
                    </div>
                </div>
            }
        }
        None => {
            html! {
                <div class="auth-button-container">
                    <button
                        class="login-button"
                        onclick={props.on_sign_in.reform(|_: MouseEvent| ())}
                        title="Login with Google"
                    >
                        <i class="fa-brands fa-google"></i>
                        {" Login with Google"}
                    </button>
                </div>
            }
        }
    }
}
