//! Hub record properties on the model entity
//!
//! Numeric, boolean and string facts from the hub record land as
//! `{name, value}` string properties named `huggingface:<field>`. Integer
//! zero and empty strings are filtered out; `private` is set whenever a hub
//! record exists, even when false.

use super::helpers::{bom_component, extract_language};
use super::keys::Key;
use super::parse::parse_non_empty_string;
use super::value::{FieldError, FieldValue};
use super::{FieldSpec, Source};

pub(super) fn hub_prop_fields() -> Vec<FieldSpec> {
    vec![
        hub_prop(Key::HubLastModified, 0.2, |src| {
            let s = src.hub.as_ref()?.last_modified.trim();
            (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
        }),
        hub_prop(Key::HubCreatedAt, 0.2, |src| {
            let s = src.hub.as_ref()?.created_at.trim();
            (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
        }),
        hub_prop(Key::HubLanguage, 0.2, |src| {
            let s = extract_language(src.hub.as_ref()?.card_data.as_ref());
            (!s.is_empty()).then_some(FieldValue::Text(s))
        }),
        hub_prop(Key::HubUsedStorage, 0.2, |src| {
            let n = src.hub.as_ref()?.used_storage;
            (n > 0).then_some(FieldValue::Integer(n))
        }),
        hub_prop(Key::HubPrivate, 0.2, |src| {
            // Keep the boolean present (even false) whenever a record exists.
            Some(FieldValue::Flag(src.hub.as_ref()?.private))
        }),
        hub_prop(Key::HubLibraryName, 0.2, |src| {
            let s = src.hub.as_ref()?.library_name.trim();
            (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
        }),
        hub_prop(Key::HubDownloads, 0.2, |src| {
            let n = src.hub.as_ref()?.downloads;
            (n > 0).then_some(FieldValue::Integer(n))
        }),
        hub_prop(Key::HubLikes, 0.2, |src| {
            let n = src.hub.as_ref()?.likes;
            (n > 0).then_some(FieldValue::Integer(n))
        }),
        hub_prop(Key::HubBaseModel, 0.2, |src| {
            let s = src.readme.as_ref()?.base_model.trim();
            (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
        }),
        hub_prop(Key::HubModelCardContact, 0.2, |src| {
            let s = src.readme.as_ref()?.model_card_contact.trim();
            (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
        }),
    ]
}

fn hub_prop(
    key: Key,
    weight: f64,
    get: impl Fn(&Source) -> Option<FieldValue> + Send + Sync + 'static,
) -> FieldSpec {
    let prop_name = key
        .property_name()
        .expect("hub property key without property name");
    FieldSpec {
        key,
        weight,
        required: false,
        sources: vec![Box::new(get)],
        parse: Some(Box::new(|v| parse_non_empty_string(v, "property"))),
        apply: Box::new(move |tgt, input| {
            let value = input
                .value
                .render()
                .ok_or_else(|| FieldError::InvalidInput(key.to_string()))?;
            tgt.component.set_property(prop_name, &value);
            Ok(())
        }),
        present: Box::new(move |bom| {
            bom_component(bom)
                .map(|c| c.has_property(prop_name))
                .unwrap_or(false)
        }),
    }
}
