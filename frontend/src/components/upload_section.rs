use super::super::{Model, Msg};
use super::utils::{debounce, first_file};
use shared::storage::ACCEPTED_TYPES;
use shared::{GenerationParameters, ParamName};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let submitting = model.workflow.is_submitting();

    html! {
        <div class="upload-section">
            { render_file_input(ctx, submitting) }
            { for ParamName::all().map(|name| render_param_select(model, ctx, name)) }
            { render_generate_button(ctx, submitting) }
        </div>
    }
}

fn render_file_input(ctx: &Context<Model>, submitting: bool) -> Html {
    let handle_change = ctx.link().callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_file);

        input.set_value("");
        Msg::FileChosen(file)
    });

    html! {
        <label class={classes!("analyze-btn", submitting.then_some("disabled"))}>
            <i class="fa-solid fa-upload"></i>{" Upload Image"}
            <input
                type="file"
                id="file-input"
                accept={ACCEPTED_TYPES.join(", ")}
                style="display: none;"
                disabled={submitting}
                onchange={handle_change}
            />
        </label>
    }
}

fn render_param_select(model: &Model, ctx: &Context<Model>, name: ParamName) -> Html {
    let current = model.workflow.params().value(name);
    let onchange = ctx.link().callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::ParamChanged(name.to_string(), select.value())
    });

    html! {
        <select name={name.to_string()} class="param-select" {onchange}>
            { for GenerationParameters::options(name).into_iter().map(|option| html! {
                <option value={option.value} selected={option.value == current}>
                    { option.label }
                </option>
            })}
        </select>
    }
}

fn render_generate_button(ctx: &Context<Model>, submitting: bool) -> Html {
    let link = ctx.link().clone();

    html! {
        <button
            id="generate-button"
            class="analyze-btn"
            disabled={submitting}
            onclick={debounce(300, move || link.send_message(Msg::Submit))}
        >
            {
                if submitting {
                    html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Generating..."}</> }
                } else {
                    html! { <><i class="fa-solid fa-wand-magic-sparkles"></i>{" Generate Image"}</> }
                }
            }
        </button>
    }
}
