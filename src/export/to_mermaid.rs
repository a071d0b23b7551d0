use crate::asset::GraphAsset;

use super::renderer;

pub fn render(asset: &GraphAsset) -> Result<String, handlebars::RenderError> {
    renderer::render_template(asset, &get_template())
}

pub fn get_template() -> String {
    include_str!("to_mermaid.hbs").to_string()
}
