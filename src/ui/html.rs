//! Interactive chart document
//!
//! A standalone HTML page that draws the combined bubble view and one bar
//! chart per lens with Plotly. Chart data is embedded as JSON.

use chrono::Local;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::chart::{ChartArtifact, ChartConfig};
use crate::error::ChartError;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Plotly figure for the combined view: x = focal length, y = lens, size = frequency
pub fn combined_figure(config: &ChartConfig, artifact: &ChartArtifact) -> Value {
    let traces: Vec<Value> = artifact
        .lens_charts
        .iter()
        .map(|chart| {
            let bubbles: Vec<_> = artifact.bubbles.iter().filter(|b| b.lens == chart.lens).collect();
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": chart.lens,
                "x": bubbles.iter().map(|b| b.focal.millimetres()).collect::<Vec<_>>(),
                "y": bubbles.iter().map(|b| b.lens.as_str()).collect::<Vec<_>>(),
                "customdata": bubbles.iter().map(|b| b.count).collect::<Vec<_>>(),
                "marker": {
                    "size": bubbles.iter().map(|b| b.size).collect::<Vec<_>>(),
                    "opacity": 0.7,
                },
                "hovertemplate": "<b>Lens:</b> %{y}<br><b>Focal:</b> %{x} mm<br><b>Images:</b> %{customdata}<extra></extra>",
            })
        })
        .collect();

    json!({
        "id": "combined",
        "data": traces,
        "layout": {
            "title": { "text": config.title },
            "xaxis": {
                "title": { "text": "Focal Length (mm)" },
                "tickmode": "linear",
                "tick0": artifact.ticks.start,
                "dtick": artifact.ticks.step,
            },
            "yaxis": { "title": { "text": "Lens" }, "type": "category" },
            "legend": { "title": { "text": "Lens" } },
            "height": artifact.height,
            "margin": { "l": 200 },
        },
    })
}

/// One bar chart per lens, focal lengths ascending
pub fn lens_figures(artifact: &ChartArtifact) -> Vec<Value> {
    artifact
        .lens_charts
        .iter()
        .enumerate()
        .map(|(index, chart)| {
            json!({
                "id": format!("lens-{index}"),
                "data": [{
                    "type": "bar",
                    "name": chart.lens,
                    "x": chart.points.iter().map(|(focal, _)| format!("{focal} mm")).collect::<Vec<_>>(),
                    "y": chart.points.iter().map(|(_, count)| count).collect::<Vec<_>>(),
                }],
                "layout": {
                    "title": { "text": format!("{} ({} images)", chart.lens, chart.total()) },
                    "xaxis": { "title": { "text": "Focal Length (mm)" }, "type": "category" },
                    "yaxis": { "title": { "text": "Images" } },
                    "height": 360,
                },
            })
        })
        .collect()
}

/// Render the full HTML page
pub fn render_document(config: &ChartConfig, artifact: &ChartArtifact) -> Result<String, ChartError> {
    let mut figures = vec![combined_figure(config, artifact)];
    figures.extend(lens_figures(artifact));

    // Keep lens names from closing the script element
    let data = serde_json::to_string(&figures)?.replace("</", "<\\/");

    let mut containers = String::from("<div id=\"combined\"></div>\n");
    for index in 0..artifact.lens_charts.len() {
        containers.push_str(&format!("<div id=\"lens-{index}\"></div>\n"));
    }

    let total: u32 = artifact.lens_charts.iter().map(|chart| chart.total()).sum();
    let title = escape_html(&config.title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<h1>{title}</h1>
{containers}<p>{total} photos across {lenses} lenses. Generated {generated}.</p>
<script>
const figures = {data};
for (const figure of figures) {{
  Plotly.newPlot(figure.id, figure.data, figure.layout, {{ responsive: true }});
}}
</script>
</body>
</html>
"#,
        lenses = artifact.lens_charts.len(),
        generated = Local::now().format("%Y-%m-%d %H:%M"),
    ))
}

/// Write the document to the configured location
pub fn write_document(config: &ChartConfig, artifact: &ChartArtifact) -> Result<PathBuf, ChartError> {
    let path = config.html_path();
    let document = render_document(config, artifact)?;

    std::fs::write(&path, document).map_err(|source| ChartError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::aggregate::{GroupingPolicy, LensAggregate};
    use crate::state::data::PhotoRecord;
    use crate::ui::chart::ChartBuilder;

    fn artifact(entries: &[(&str, f64)]) -> ChartArtifact {
        let records: Vec<PhotoRecord> = entries
            .iter()
            .enumerate()
            .map(|(i, (lens, focal))| {
                PhotoRecord::new(PathBuf::from(format!("{i}.jpg")), *lens, *focal, None).unwrap()
            })
            .collect();
        let aggregate = LensAggregate::from_records(&records, &GroupingPolicy::default());
        ChartBuilder::new(ChartConfig::default()).shape(&aggregate).unwrap()
    }

    #[test]
    fn test_combined_figure_has_one_trace_per_lens() {
        let artifact = artifact(&[("LensA", 24.0), ("LensA", 24.0), ("LensB", 85.0)]);
        let figure = combined_figure(&ChartConfig::default(), &artifact);

        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "LensA");
        assert_eq!(traces[0]["x"], json!([24.0]));
        assert_eq!(traces[0]["customdata"], json!([2]));
        assert_eq!(figure["layout"]["xaxis"]["tick0"], 20);
        assert_eq!(figure["layout"]["xaxis"]["dtick"], 10);
    }

    #[test]
    fn test_lens_figures_are_bar_charts() {
        let artifact = artifact(&[("LensA", 50.0), ("LensA", 24.0)]);
        let figures = lens_figures(&artifact);

        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0]["data"][0]["type"], "bar");
        assert_eq!(figures[0]["data"][0]["x"], json!(["24 mm", "50 mm"]));
        assert_eq!(figures[0]["layout"]["title"]["text"], "LensA (2 images)");
    }

    #[test]
    fn test_document_escapes_script_breakers() {
        let artifact = artifact(&[("</script><b>", 35.0)]);
        let document = render_document(&ChartConfig::default(), &artifact).unwrap();

        assert!(document.contains("<\\/script><b>"));
        assert_eq!(document.matches("</script>").count(), 2);
        assert!(document.contains("<div id=\"lens-0\"></div>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
