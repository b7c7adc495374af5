//! Multipart form construction for partition requests.

use crate::partition::types::PartitionConfig;
use reqwest::multipart::{Form, Part};

/// Form field carrying the document payload.
pub(crate) const FILE_FIELD: &str = "files";

/// Text fields sent alongside the payload, in wire order.
///
/// `strategy` is always present. List options repeat their field once per entry, and boolean
/// options are emitted as the literal `"true"` only when enabled.
pub(crate) fn form_fields(config: &PartitionConfig) -> Vec<(&'static str, String)> {
    let mut fields = vec![("strategy", config.effective_strategy().to_string())];

    for language in &config.ocr_languages {
        fields.push(("ocr_languages", language.clone()));
    }

    if let Some(encoding) = non_empty(config.encoding.as_deref()) {
        fields.push(("encoding", encoding.to_string()));
    }

    let flags = [
        ("coordinates", config.coordinates),
        ("pdf_infer_table_structure", config.pdf_infer_table_structure),
        ("xml_keep_tags", config.xml_keep_tags),
        ("include_page_breaks", config.include_page_breaks),
        ("multipage_sections", config.multipage_sections),
    ];
    for (name, enabled) in flags {
        if enabled {
            fields.push((name, "true".to_string()));
        }
    }

    if let Some(model) = non_empty(config.hi_res_model_name.as_deref()) {
        fields.push(("hi_res_model_name", model.to_string()));
    }
    if let Some(chunking) = non_empty(config.chunking_strategy.as_deref()) {
        fields.push(("chunking_strategy", chunking.to_string()));
    }

    let limits = [
        ("max_characters", config.max_characters),
        ("new_after_n_chars", config.new_after_n_chars),
        ("combine_under_n_chars", config.combine_under_n_chars),
    ];
    for (name, limit) in limits {
        if let Some(value) = limit {
            fields.push((name, value.to_string()));
        }
    }

    if !config.skip_infer_table_types.is_empty() {
        let encoded = serde_json::Value::from(config.skip_infer_table_types.clone()).to_string();
        fields.push(("skip_infer_table_types", encoded));
    }

    fields
}

/// Assemble the multipart body for a single partition request.
pub(crate) fn build_form(bytes: Vec<u8>, file_name: &str, config: &PartitionConfig) -> Form {
    let payload = Part::bytes(bytes).file_name(file_name.to_string());
    form_fields(config)
        .into_iter()
        .fold(Form::new().part(FILE_FIELD, payload), |form, (name, value)| {
            form.text(name, value)
        })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
