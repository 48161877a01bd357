use query_engine_metadata::metadata::Metadata;
use query_engine_translation::translation;
use query_engine_translation::translation::params::QueryParams;
use query_engine_translation::translation::query::QueryPlan;

/// Translate a list of parameters with the default metadata.
pub fn translate_pairs(pairs: &[(&str, &str)]) -> Result<QueryPlan, translation::error::Error> {
    translation::query::translate(
        &Metadata::default(),
        &QueryParams::from_pairs(pairs.iter().copied()),
    )
}

/// Translate a list of parameters, expecting success, and render the query.
pub fn render(pairs: &[(&str, &str)]) -> serde_json::Value {
    translate_pairs(pairs)
        .expect("translation should succeed")
        .query
        .to_document()
}
