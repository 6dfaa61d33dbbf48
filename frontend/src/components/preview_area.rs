use super::super::Model;
use super::results::render_result;
use yew::prelude::*;

pub fn render_preview_area(model: &Model) -> Html {
    html! {
        <div id="preview-container" class="preview-container">
            {
                if model.workflow.is_submitting() {
                    render_progress(model)
                } else if let Some(image) = model.workflow.result() {
                    render_result(image)
                } else if let Some(selection) = model.workflow.selection() {
                    html! {
                        <img id="actual-image-preview"
                            src={selection.payload.preview.to_string()}
                            alt="Preview" />
                    }
                } else {
                    html! {
                        <div class="select-preview">
                            <p>{"No image selected"}</p>
                        </div>
                    }
                }
            }
        </div>
    }
}

// The bar is decorative; see shared::progress.
fn render_progress(model: &Model) -> Html {
    let value = model.progress.value();

    html! {
        <div class="loading-preview">
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            <p>{"Generating image..."}</p>
            <div class="meter">
                <div class="meter-fill" style={format!("width: {}%", value)}></div>
            </div>
            <div class="meter-value">{ format!("{}%", value) }</div>
        </div>
    }
}
