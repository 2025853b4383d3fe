//! Pure helpers over route templates such as `/user-bookings/{id}` or
//! `/user-bookings/:id`.

use crate::models::HttpAction;

/// Returns true for placeholder segments: `:id`, `{id}` and `{*rest}`.
pub fn is_param_segment(segment: &str) -> bool {
    segment.starts_with(':') || (segment.starts_with('{') && segment.ends_with('}'))
}

/// Turns a route template into the words used in a description.
///
/// Placeholders are dropped, `/` and `-` both separate words.
pub fn resource_words(route: &str) -> String {
    route
        .trim_matches('/')
        .split('/')
        .filter(|segment| !is_param_segment(segment))
        .flat_map(|segment| segment.split('-'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds `"User <action> <resource words>"` for a verb and route template.
pub fn describe(method: &str, route: &str) -> String {
    describe_action(HttpAction::classify(method), route)
}

pub fn describe_action(action: HttpAction, route: &str) -> String {
    format!("User {} {}", action.action_word(), resource_words(route))
}

/// The part of the template before its first placeholder, without a
/// trailing slash. `/bookings/{id}/notes` gives `/bookings`.
pub fn base_path(route: &str) -> &str {
    let mut end = route.len();
    let mut offset = 0;
    for segment in route.split('/') {
        if is_param_segment(segment) {
            end = offset;
            break;
        }
        offset += segment.len() + 1;
    }
    route[..end].trim_end_matches('/')
}

/// First non-placeholder segment with hyphens turned into underscores.
pub fn first_segment_label(route: &str) -> String {
    route
        .split('/')
        .find(|segment| !segment.is_empty() && !is_param_segment(segment))
        .map(|segment| segment.replace('-', "_"))
        .unwrap_or_default()
}
