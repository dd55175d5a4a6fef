use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Every route the API serves, with a short description
pub const ROUTES: &[(&str, &str)] = &[
    (
        "/api/v1.0/precipitation",
        "Precipitation by date for the last twelve months",
    ),
    ("/api/v1.0/stations", "All weather station ids"),
    (
        "/api/v1.0/tobs",
        "Temperature observations of the most active station for the last twelve months",
    ),
    (
        "/api/v1.0/temp/{start}",
        "Min, average and max temperature from a start date (YYYY-MM-DD)",
    ),
    (
        "/api/v1.0/temp/{start}/{end}",
        "Min, average and max temperature between two dates, inclusive",
    ),
];

pub fn home_page(api_base: &str, anchor: &str, tobs_station: &str) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate Analysis API",
        api_base,
    };

    base(&config, content(api_base, anchor, tobs_station))
}

fn content(api_base: &str, anchor: &str, tobs_station: &str) -> Markup {
    html! {
        p class="subtitle" { "Welcome to the Hawaii Climate Analysis API!" }
        h4 class="title is-5" { "Available Routes:" }
        table class="table is-fullwidth" {
            tbody {
                @for (route, description) in ROUTES {
                    tr {
                        td {
                            @if route.contains('{') {
                                code { (route) }
                            } @else {
                                a href=(format!("{}{}", api_base, route)) { code { (route) } }
                            }
                        }
                        td { (description) }
                    }
                }
            }
        }
        p class="is-size-7" {
            "Twelve month windows count back from " (anchor)
            ". Temperature observations are reported for station " code { (tobs_station) } "."
        }
    }
}
