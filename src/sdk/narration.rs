//! Boundary to the text-generation step that describes a route.
//!
//! Only the numeric summary and POI list are handed over; the narrator never
//! sees geometry.

use crate::sdk::routing::geojson::FeatureCollection;
use crate::sdk::routing::scenic::{GENERIC_CATEGORY, UNNAMED_POI};
use serde_json::Value;
use std::fmt::Write as _;

/// Text generator, e.g. a local language model.
pub trait Narrator {
    fn narrate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: u64,
    /// `(name, category)` per visited POI.
    pub pois: Vec<(String, String)>,
}

impl RouteSummary {
    /// Reads the summary from a route document's properties. Missing totals
    /// read as zero.
    pub fn from_route(route: &FeatureCollection) -> Self {
        let props = &route.properties;
        let pois = props
            .get("pois")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .map(|p| {
                        (
                            p.get("name")
                                .and_then(Value::as_str)
                                .unwrap_or(UNNAMED_POI)
                                .to_string(),
                            p.get("type")
                                .and_then(Value::as_str)
                                .unwrap_or(GENERIC_CATEGORY)
                                .to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            distance_km: props
                .get("total_distance_km")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            duration_minutes: props
                .get("total_duration_minutes")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            pois,
        }
    }

    pub fn description_prompt(&self) -> String {
        let poi_text = if self.pois.is_empty() {
            "No specific points of interest.".to_string()
        } else {
            let mut text = String::new();
            for (name, category) in &self.pois {
                let _ = writeln!(text, "- {} ({})", name, category);
            }
            text.trim_end().to_string()
        };

        format!(
            "Describe the following walking route in a friendly, conversational way:\n\n\
             Route details:\n\
             - Total distance: {:.2} km\n\
             - Estimated duration: {} minutes\n\n\
             Points of interest along the route:\n\
             {}\n\n\
             Provide a brief, engaging description of this route that would encourage \
             someone to try it.\n\
             Include practical information like distance and time, as well as \
             highlighting any interesting features.\n\
             Keep your response concise and conversational.",
            self.distance_km, self.duration_minutes, poi_text
        )
    }
}

/// Asks `narrator` for a description and stores it under
/// `properties.description`. A narrator failure is stored as a notice.
pub fn attach_description(route: &mut FeatureCollection, narrator: &dyn Narrator) {
    let prompt = RouteSummary::from_route(route).description_prompt();
    let description = match narrator.narrate(&prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("Route description failed: {:#}", e);
            format!("Error generating route description: {}", e)
        }
    };
    route
        .properties
        .insert("description".into(), Value::from(description));
}
