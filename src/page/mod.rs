//! Dashboard page rendering.
//!
//! The page is a fixed layout filled with `{placeholder}` substitution:
//! the map script, then `<details>` panels in this order.
//!
//! | Panel           | Content                                         |
//! |-----------------|-------------------------------------------------|
//! | `legend`        | One swatch per distinct layer color              |
//! | `neighborhoods` | Neighborhoods ranked by nearby building count   |
//! | `buildings`     | Building count within the buffer distance       |
//! | `chp`           | Combined heat and power background              |
//! | `sources`       | Data sources and limitations                    |
//! | `disclaimer`    | Usage disclaimer                                |

mod stats;

pub use stats::{BuildingStats, NeighborhoodStats, format_count};

use crate::config::{AppConfig, PageConfig};
use crate::map::{Legend, MapView};
use crate::utils::{
    error::{CAUSED_BY, error_chain},
    html::{escape_html, fill_template},
    minify::minify_html,
};
use chrono::{DateTime, Local};

const LAYOUT_TEMPLATE: &str = include_str!("../embed/page/layout.html");
const CHP_TEMPLATE: &str = include_str!("../embed/page/chp.html");
const SOURCES_TEMPLATE: &str = include_str!("../embed/page/sources.html");
const DISCLAIMER_TEMPLATE: &str = include_str!("../embed/page/disclaimer.html");
const ERROR_TEMPLATE: &str = include_str!("../embed/page/error.html");

/// Element id of the map container.
const MAP_CONTAINER: &str = "map";

/// Everything one page render needs.
pub struct PageContext<'a> {
    pub config: &'a AppConfig,
    pub view: &'a MapView,
    /// Image URL for the CHP panel.
    pub illustration: Option<&'a str>,
    pub rendered_at: DateTime<Local>,
}

/// Render the complete dashboard page.
pub fn present(ctx: &PageContext) -> String {
    let config = ctx.config;
    let base = &config.base;

    let notice = ctx
        .view
        .notice
        .as_deref()
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    let credits = if base.author.is_empty() {
        String::new()
    } else {
        format!("<p>Created by {}</p>", escape_html(&base.author))
    };

    let rendered_at = ctx.rendered_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let html = fill_template(
        LAYOUT_TEMPLATE,
        &[
            ("lang", escape_html(&base.language).as_str()),
            ("description", escape_html(&base.description).as_str()),
            ("title", escape_html(&base.title).as_str()),
            ("notice", notice.as_str()),
            ("panels", panels(ctx).as_str()),
            ("credits", credits.as_str()),
            ("rendered_at", rendered_at.as_str()),
            ("script", ctx.view.to_script(MAP_CONTAINER).as_str()),
        ],
    );

    minify_html(&html, config.render.minify).into_owned()
}

/// Page shown instead of the dashboard when the render fails.
pub fn error_page(title: &str, err: &dyn std::error::Error) -> String {
    let chain = error_chain(err, CAUSED_BY);
    fill_template(
        ERROR_TEMPLATE,
        &[
            ("title", escape_html(title).as_str()),
            ("chain", escape_html(&chain).as_str()),
        ],
    )
}

// ============================================================================
// Panels
// ============================================================================

fn panels(ctx: &PageContext) -> String {
    let page = &ctx.config.page;
    let view = ctx.view;
    let overlay = |id: &Option<String>| {
        id.as_deref()
            .and_then(|id| view.overlays.iter().find(|layer| layer.id == id))
    };

    let mut html = Vec::new();

    let legend = Legend::from_layers(&view.overlays);
    if !legend.is_empty() {
        let body = format!("<ul class=\"legend\">\n{}\n</ul>", legend.to_html());
        html.push(panel(page, "legend", "🎨 Legend", &body));
    }

    let neighborhoods = overlay(&page.neighborhood_layer)
        .and_then(|layer| NeighborhoodStats::from_layer(layer, &page.name_property));
    if let Some(stats) = neighborhoods {
        html.push(panel(
            page,
            "neighborhoods",
            "🏠 Neighborhood Statistics",
            &neighborhood_body(&stats),
        ));
    }

    if let Some(layer) = overlay(&page.building_layer) {
        let stats = BuildingStats::from_layer(layer, page.buffer_meters);
        html.push(panel(
            page,
            "buildings",
            "🏢 Building Statistics",
            &building_body(&stats),
        ));
    }

    let illustration = ctx
        .illustration
        .map(|url| {
            format!(
                "<img class=\"illustration\" src=\"{}\" alt=\"Cogeneration diagram\">\n\
                 <div class=\"caption-small\">Image Source: <a href=\"https://en.wikipedia.org/wiki/Cogeneration\">Wikipedia Cogeneration</a></div>",
                escape_html(url)
            )
        })
        .unwrap_or_default();
    html.push(panel(
        page,
        "chp",
        "💡 More about Combined Heat and Power (CHP)",
        &fill_template(CHP_TEMPLATE, &[("illustration", illustration.as_str())]),
    ));

    html.push(panel(
        page,
        "sources",
        "📜 Source Information",
        &fill_template(SOURCES_TEMPLATE, &[("buffer", page.buffer_meters.to_string().as_str())]),
    ));
    html.push(panel(page, "disclaimer", "Disclaimer", DISCLAIMER_TEMPLATE));

    html.join("\n")
}

fn panel(page: &PageConfig, id: &str, summary: &str, body: &str) -> String {
    let open = if page.is_expanded(id) { " open" } else { "" };
    format!(
        "<details id=\"panel-{id}\"{open}>\n<summary>{summary}</summary>\n{}\n</details>",
        body.trim_end()
    )
}

fn neighborhood_body(stats: &NeighborhoodStats) -> String {
    let items: Vec<String> = stats
        .ranked
        .iter()
        .map(|n| {
            format!(
                r#"<li><span style="color: {};">{}</span>: {} buildings</li>"#,
                escape_html(&n.color),
                escape_html(&n.name),
                format_count(n.count)
            )
        })
        .collect();

    format!(
        "<div class=\"headline\">Buildings in <span class=\"highlight\">{}</span> (out of <span class=\"total\">{}</span>) neighborhoods are nearby the Philadelphia Steam Loop.</div>\n<ol>\n{}\n</ol>",
        stats.with_buildings,
        stats.total,
        items.join("\n")
    )
}

fn building_body(stats: &BuildingStats) -> String {
    format!(
        "<p>There are approximately <span class=\"buildings\">{} buildings</span> <span class=\"total\">within {}m</span> (about {:.2} miles) <span class=\"total\">of the steam loop.</span></p>",
        format_count(stats.total as f64),
        stats.buffer_meters,
        stats.buffer_miles()
    )
}
