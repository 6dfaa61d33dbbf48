use shared::GeneratedImage;
use shared::generation::DOWNLOAD_FILE_NAME;
use yew::prelude::*;

pub fn render_result(image: &GeneratedImage) -> Html {
    let src = AttrValue::from(image.data_url().to_string());

    html! {
        <div class="results-container">
            <img id="result-image" src={src.clone()} alt="Result" />
            <a class="analyze-btn download-btn" href={src} download={DOWNLOAD_FILE_NAME}>
                <i class="fa-solid fa-download"></i>{" Download Image"}
            </a>
        </div>
    }
}
