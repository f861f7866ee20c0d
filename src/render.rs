//! HTML and SVG rendering
//!
//! The map is a tile-grid choropleth: every state is a square at a fixed grid position (see
//! [crate::geography]), filled on a sequential green scale by its program count. Hovering a tile
//! shows the state's breakdown through an SVG `<title>`.

use crate::aggregation::{Aggregation, DeviceCount, Filters};
use crate::dataset::Dataset;
use crate::error::IncentiveMapError;
use crate::geography::{self, State, GRID_COLS, GRID_ROWS, STATES};
use crate::models::FilterRequest;
use crate::types::Region;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::fmt::Write;

const PAGE_TEMPLATE: &str = "page.html";
const MAP_TEMPLATE: &str = "map.svg";

/// Side of a state tile in pixels
const TILE: u32 = 52;
/// Space between tiles in pixels
const GAP: u32 = 4;
/// Outer margin in pixels
const MARGIN: u32 = 20;
/// Height reserved for the map title
const TITLE_HEIGHT: u32 = 40;
/// Height reserved for the legend
const LEGEND_HEIGHT: u32 = 56;
/// Width of the legend colour bar
const LEGEND_WIDTH: u32 = 240;

/// Fill for states without programs
const EMPTY_FILL: &str = "#e5e5e5";

/// ColorBrewer "Greens", light to dark.
const GREENS: [(u8, u8, u8); 9] = [
    (247, 252, 245),
    (229, 245, 224),
    (199, 233, 192),
    (161, 217, 155),
    (116, 196, 118),
    (65, 171, 93),
    (35, 139, 69),
    (0, 109, 44),
    (0, 68, 27),
];

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template(PAGE_TEMPLATE, include_str!("templates/page.html"))?;
    env.add_template(MAP_TEMPLATE, include_str!("templates/map.svg"))?;
    Ok(env)
}

fn render_template<S: Serialize>(name: &'static str, view: S) -> Result<String, IncentiveMapError> {
    let render = || -> Result<String, minijinja::Error> {
        let env = environment()?;
        let template = env.get_template(name)?;
        template.render(view)
    };
    render().map_err(|source| IncentiveMapError::Template { name, source })
}

/// Colour on the green scale for a fraction between 0 and 1.
fn scale_color(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let position = t * (GREENS.len() - 1) as f64;
    let index = (position.floor() as usize).min(GREENS.len() - 2);
    let frac = position - index as f64;
    let (r0, g0, b0) = GREENS[index];
    let (r1, g1, b1) = GREENS[index + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Fill colour for a state count.
///
/// Zero counts use the empty colour; otherwise counts are scaled linearly against the largest.
pub fn fill_color(count: u64, max: u64) -> String {
    if count == 0 || max == 0 {
        return EMPTY_FILL.to_string();
    }
    scale_color(count as f64 / max as f64)
}

#[derive(Serialize)]
struct TileView {
    code: &'static str,
    x: u32,
    y: u32,
    size: u32,
    fill: String,
    text_fill: &'static str,
    count: u64,
    tooltip: String,
}

#[derive(Serialize)]
struct LabelView {
    name: String,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct StopView {
    offset: String,
    color: String,
}

#[derive(Serialize)]
struct LegendView {
    x: u32,
    y: u32,
    width: u32,
    max: u64,
    stops: Vec<StopView>,
}

#[derive(Serialize)]
struct MapView {
    width: u32,
    height: u32,
    title: String,
    tiles: Vec<TileView>,
    labels: Vec<LabelView>,
    legend: LegendView,
}

fn tile_origin(state: &State) -> (u32, u32) {
    (
        MARGIN + state.col * (TILE + GAP),
        MARGIN + TITLE_HEIGHT + state.row * (TILE + GAP),
    )
}

/// Map title describing what is shown.
fn map_title(dataset: &Dataset, aggregation: &Aggregation) -> String {
    if dataset.is_empty() {
        "No data available".to_string()
    } else if aggregation.total == 0 {
        "No data available for selected filters".to_string()
    } else {
        format!(
            "Programs for Selected Device Types ({} total programs)",
            aggregation.total
        )
    }
}

/// Hover text for a state tile.
///
/// Lists the state's count and device breakdown, followed by its region's totals. States outside
/// the selected regions only say that nothing is selected.
pub fn tooltip(state: &State, aggregation: &Aggregation, filters: &Filters) -> String {
    let mut text = format!("{} ({})\n", state.name, state.code);
    if !filters.regions.contains(&state.region) {
        text.push_str("No data for selected filters");
        return text;
    }
    let _ = writeln!(text, "Programs: {}", aggregation.count_for(state.code));
    if let Some(devices) = aggregation.state_devices.get(state.code) {
        for (device, count) in devices {
            let _ = writeln!(text, "  {}: {}", device, count);
        }
    }
    let region_total = aggregation
        .region_totals
        .get(&state.region)
        .copied()
        .unwrap_or(0);
    let _ = write!(
        text,
        "\n{} Region\nTotal Programs: {}",
        state.region, region_total
    );
    if let Some(devices) = aggregation.region_devices.get(&state.region) {
        for (device, count) in devices {
            let _ = write!(text, "\n  {}: {}", device, count);
        }
    }
    text
}

/// Label position for a region: the centre of its tiles.
fn region_label(region: Region) -> LabelView {
    let centres: Vec<(f64, f64)> = geography::states_in(region)
        .map(|state| {
            let (x, y) = tile_origin(state);
            (x as f64 + TILE as f64 / 2.0, y as f64 + TILE as f64 / 2.0)
        })
        .collect();
    let n = centres.len().max(1) as f64;
    LabelView {
        name: region.to_string(),
        x: centres.iter().map(|(x, _)| x).sum::<f64>() / n,
        y: centres.iter().map(|(_, y)| y).sum::<f64>() / n,
    }
}

/// Render the choropleth as a standalone SVG document.
///
/// # Arguments
///
/// * `dataset`: Data set the aggregation was computed from
/// * `aggregation`: Counts to colour the map by
/// * `filters`: Filters the aggregation was computed with
pub fn render_map(
    dataset: &Dataset,
    aggregation: &Aggregation,
    filters: &Filters,
) -> Result<String, IncentiveMapError> {
    let max = aggregation.max_count();
    let tiles = STATES
        .iter()
        .map(|state| {
            let (x, y) = tile_origin(state);
            let count = aggregation.count_for(state.code);
            let dark = max > 0 && count * 2 > max;
            TileView {
                code: state.code,
                x,
                y,
                size: TILE,
                fill: fill_color(count, max),
                text_fill: if dark { "#ffffff" } else { "#333333" },
                count,
                tooltip: tooltip(state, aggregation, filters),
            }
        })
        .collect();
    let labels = if aggregation.total > 0 {
        filters.regions.iter().copied().map(region_label).collect()
    } else {
        vec![]
    };
    let grid_height = GRID_ROWS * (TILE + GAP) - GAP;
    let grid_width = GRID_COLS * (TILE + GAP) - GAP;
    let stops = (0..GREENS.len())
        .map(|i| {
            let t = i as f64 / (GREENS.len() - 1) as f64;
            StopView {
                offset: format!("{:.1}%", t * 100.0),
                color: scale_color(t),
            }
        })
        .collect();
    let view = MapView {
        width: grid_width + 2 * MARGIN,
        height: MARGIN + TITLE_HEIGHT + grid_height + LEGEND_HEIGHT + MARGIN,
        title: map_title(dataset, aggregation),
        tiles,
        labels,
        legend: LegendView {
            x: MARGIN,
            y: MARGIN + TITLE_HEIGHT + grid_height + 16,
            width: LEGEND_WIDTH,
            max,
            stops,
        },
    };
    render_template(MAP_TEMPLATE, view)
}

#[derive(Serialize)]
struct OptionView {
    name: String,
    checked: bool,
}

#[derive(Serialize)]
struct LinksView {
    select_all_devices: String,
    clear_all_devices: String,
    select_all_regions: String,
    clear_all_regions: String,
    map: String,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    total: u64,
    states: usize,
    regions: usize,
    devices: &'a [DeviceCount],
}

#[derive(Serialize)]
struct PageView<'a> {
    load_error: Option<&'a str>,
    devices: Vec<OptionView>,
    regions: Vec<OptionView>,
    links: LinksView,
    map_svg: String,
    has_data: bool,
    summary: SummaryView<'a>,
}

/// Query string, with a leading `?` unless empty.
fn href(request: &FilterRequest) -> String {
    let query = request.to_query();
    if query.is_empty() {
        "?".to_string()
    } else {
        format!("?{}", query)
    }
}

/// Render the dashboard page.
///
/// # Arguments
///
/// * `dataset`: Loaded data set
/// * `request`: Filters as requested by the client, used to build links that keep the selection
/// * `filters`: Resolved filters
/// * `aggregation`: Counts under the resolved filters
pub fn render_page(
    dataset: &Dataset,
    request: &FilterRequest,
    filters: &Filters,
    aggregation: &Aggregation,
) -> Result<String, IncentiveMapError> {
    let map_svg = render_map(dataset, aggregation, filters)?;
    let devices = dataset
        .device_names()
        .iter()
        .map(|name| OptionView {
            name: name.clone(),
            checked: filters.devices.contains(name),
        })
        .collect();
    let regions = Region::ALL
        .iter()
        .map(|region| OptionView {
            name: region.to_string(),
            checked: filters.regions.contains(region),
        })
        .collect();
    let links = LinksView {
        select_all_devices: href(&FilterRequest {
            devices: None,
            regions: request.regions.clone(),
        }),
        clear_all_devices: href(&FilterRequest {
            devices: Some(vec![]),
            regions: request.regions.clone(),
        }),
        select_all_regions: href(&FilterRequest {
            devices: request.devices.clone(),
            regions: None,
        }),
        clear_all_regions: href(&FilterRequest {
            devices: request.devices.clone(),
            regions: Some(vec![]),
        }),
        map: format!("map.svg{}", href(request)),
    };
    let view = PageView {
        load_error: dataset.load_error(),
        devices,
        regions,
        links,
        map_svg,
        has_data: !dataset.is_empty(),
        summary: SummaryView {
            total: aggregation.total,
            states: aggregation.states_with_programs,
            regions: aggregation.regions_with_programs,
            devices: &aggregation.device_breakdown,
        },
    };
    render_template(PAGE_TEMPLATE, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate;
    use crate::test_utils;

    use regex::Regex;

    #[test]
    fn fill_colors() {
        assert_eq!(EMPTY_FILL, fill_color(0, 10));
        assert_eq!(EMPTY_FILL, fill_color(0, 0));
        assert_eq!("#00441b", fill_color(10, 10));
        assert_eq!("#74c476", fill_color(5, 10));
        assert_eq!("#f7fcf5", scale_color(0.0));
        assert_eq!("#00441b", scale_color(2.0));
    }

    #[test]
    fn tooltip_selected_region() {
        let dataset = test_utils::get_test_dataset();
        let filters = Filters::all(&dataset);
        let aggregation = aggregate(&dataset, &filters);
        let state = geography::lookup("CA").unwrap();
        assert_eq!(
            "California (CA)\nPrograms: 2\n  EV Charger: 1\n  HVAC: 1\n\nWest Region\nTotal Programs: 3\n  EV Charger: 2\n  HVAC: 1",
            tooltip(state, &aggregation, &filters)
        );
    }

    #[test]
    fn tooltip_empty_state() {
        let dataset = test_utils::get_test_dataset();
        let filters = Filters::all(&dataset);
        let aggregation = aggregate(&dataset, &filters);
        let state = geography::lookup("ME").unwrap();
        assert_eq!(
            "Maine (ME)\nPrograms: 0\n\nNortheast Region\nTotal Programs: 1\n  HVAC: 1",
            tooltip(state, &aggregation, &filters)
        );
    }

    #[test]
    fn tooltip_unselected_region() {
        let dataset = test_utils::get_test_dataset();
        let mut filters = Filters::all(&dataset);
        filters.regions.remove(&Region::Southwest);
        let aggregation = aggregate(&dataset, &filters);
        let state = geography::lookup("TX").unwrap();
        assert_eq!(
            "Texas (TX)\nNo data for selected filters",
            tooltip(state, &aggregation, &filters)
        );
    }

    #[test]
    fn map_has_every_state() {
        let dataset = test_utils::get_test_dataset();
        let filters = Filters::all(&dataset);
        let aggregation = aggregate(&dataset, &filters);
        let svg = render_map(&dataset, &aggregation, &filters).unwrap();
        let re = Regex::new(r#"<rect class="state" data-state="[A-Z]{2}""#).unwrap();
        assert_eq!(STATES.len(), re.find_iter(&svg).count());
        assert!(svg.contains("Programs for Selected Device Types (6 total programs)"));
        assert!(svg.contains(r##"data-state="CA" data-count="2" fill="#00441b""##), "{svg}");
        assert!(svg.contains(r##"data-state="ME" data-count="0" fill="#e5e5e5""##), "{svg}");
        assert!(svg.contains(">Mid-Atlantic</text>"));
    }

    #[test]
    fn map_without_matches() {
        let dataset = test_utils::get_test_dataset();
        let mut filters = Filters::all(&dataset);
        filters.devices.clear();
        let aggregation = aggregate(&dataset, &filters);
        let svg = render_map(&dataset, &aggregation, &filters).unwrap();
        assert!(svg.contains("No data available for selected filters"));
        assert!(!svg.contains(r#"class="region-label""#));
    }

    #[test]
    fn map_without_data() {
        let dataset = Dataset::failed("boom".to_string());
        let filters = Filters::all(&dataset);
        let aggregation = aggregate(&dataset, &filters);
        let svg = render_map(&dataset, &aggregation, &filters).unwrap();
        assert!(svg.contains("No data available"));
        assert!(!svg.contains("selected filters"));
    }

    #[test]
    fn page_escapes_names() {
        let dataset = Dataset::from_rows(
            vec![crate::models::DeviceCategory::new(1, "<b>Boiler</b>")],
            vec![crate::models::Program::new("CO", 1)],
        );
        let request = FilterRequest::default();
        let filters = Filters::resolve(&request, &dataset);
        let aggregation = aggregate(&dataset, &filters);
        let page = render_page(&dataset, &request, &filters, &aggregation).unwrap();
        assert!(!page.contains("<b>Boiler</b>"));
        assert!(page.contains("&lt;b&gt;Boiler"));
    }

    #[test]
    fn page_links_keep_other_filter() {
        let dataset = test_utils::get_test_dataset();
        let request = FilterRequest {
            devices: None,
            regions: Some(vec![Region::West]),
        };
        let filters = Filters::resolve(&request, &dataset);
        let aggregation = aggregate(&dataset, &filters);
        let page = render_page(&dataset, &request, &filters, &aggregation).unwrap();
        // Query strings are HTML escaped in attributes.
        assert!(page.contains("?devices=&amp;regions=West"), "{page}");
        assert!(page.contains(r#"href="?regions=""#), "{page}");
        assert!(page.contains("Total Programs: 3"));
        assert!(page.contains("States with Programs: 2"));
        assert!(page.contains("Regions with Programs: 1"));
    }

    #[test]
    fn page_shows_load_error() {
        let dataset = Dataset::failed("no rows returned from programs table".to_string());
        let request = FilterRequest::default();
        let filters = Filters::resolve(&request, &dataset);
        let aggregation = aggregate(&dataset, &filters);
        let page = render_page(&dataset, &request, &filters, &aggregation).unwrap();
        assert!(page.contains("Unable to load data"));
        assert!(page.contains("no rows returned from programs table"));
        assert!(page.contains("No data available"));
        assert!(!page.contains(r#"name="devices""#));
    }
}
