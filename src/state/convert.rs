//! Conversion of raw expression values to atom data.

use crate::component::{ComponentType, ConversionError, Data, DataKind, Options};
use crate::expression::Value;
use crate::reference::{ValueReference, VariableType};
use crate::source::State;

/// Convert a raw value to the data kind of `kind`.
///
/// `backing` is the reference behind the component: it decides which
/// option a switch or selection selects and whether an icon URL carries a
/// `state` query. Undefined values convert to no data.
pub fn convert_value(
    kind: ComponentType,
    raw: Value,
    backing: &ValueReference,
    icon_path: &str,
) -> Result<Option<Data>, ConversionError> {
    let Some(target) = kind.data_kind() else {
        return Ok(None);
    };

    let data = match (target, raw) {
        (_, Value::Null) => return Ok(None),
        (DataKind::Options, Value::Options(options)) => Data::Options(select(options, backing)),
        (DataKind::Text, Value::Text(text)) => Data::Text(text),
        (DataKind::Number, Value::Number(value)) => finite(value, "Number")?,
        (DataKind::Uri, Value::Uri(uri)) => Data::Uri(uri),
        (_, raw) if raw.is_undefined() => return Ok(None),
        (DataKind::Uri, Value::Text(category)) if kind == ComponentType::Icon => {
            Data::Uri(icon_url(icon_path, &category, backing))
        }
        (DataKind::Text, Value::State(state)) => Data::Text(state.to_full_string()),
        (DataKind::Number, Value::State(State::Decimal(value))) => finite(value, "DecimalType")?,
        (DataKind::Text, Value::Status(status)) => Data::Text(status.status.to_string()),
        (DataKind::Text, Value::Number(value)) => Data::Text(value.to_string()),
        (DataKind::Number, Value::Text(text)) => match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Data::Number(value),
            _ => {
                return Err(ConversionError::Unsupported {
                    from: format!("String '{}'", text),
                    to: target,
                })
            }
        },
        (target, raw) => {
            return Err(ConversionError::Unsupported {
                from: raw.type_name().to_string(),
                to: target,
            })
        }
    };
    Ok(Some(data))
}

/// Numbers must be finite so that equal inputs compare equal.
fn finite(value: f64, from: &str) -> Result<Data, ConversionError> {
    if value.is_finite() {
        Ok(Data::Number(value))
    } else {
        Err(ConversionError::Unsupported {
            from: format!("{} '{}'", from, value),
            to: DataKind::Number,
        })
    }
}

/// Select the option whose key is the backing source's current value.
fn select(mut options: Options, backing: &ValueReference) -> Options {
    let current = backing.value();
    if current.is_undefined() {
        options.clear_selection();
        return options;
    }
    let key = current.to_string();
    if options.set_selected_key(&key).is_err() {
        tracing::debug!(reference = %backing, key = %key, "No option matches the current value");
        options.clear_selection();
    }
    options
}

/// `{icon_path}/{category}`, with `?state=` holding the form-encoded item
/// state when the backing item has a defined state.
pub fn icon_url(icon_path: &str, category: &str, backing: &ValueReference) -> String {
    let mut url = format!("{}/{}", icon_path.trim_end_matches('/'), category);
    if backing.variable_type() == VariableType::Item {
        if let Value::State(state) = backing.value() {
            if !state.is_undefined() {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(state.to_full_string().as_bytes()).collect();
                url.push_str("?state=");
                url.push_str(&encoded);
            }
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::source::{Item, ThingStatus, ThingStatusInfo};

    #[test]
    fn icon_url_carries_defined_state() {
        let item = Arc::new(Item::new("Battery", "Number").with_state(State::Decimal(80.0)));
        let backing = ValueReference::for_item(&item);
        assert_eq!(
            convert_value(ComponentType::Icon, Value::Text("battery".into()), &backing, "/icon").unwrap(),
            Some(Data::Uri("/icon/battery?state=80".into()))
        );

        item.set_state(State::Undef);
        assert_eq!(
            convert_value(ComponentType::Icon, Value::Text("battery".into()), &backing, "/icon").unwrap(),
            Some(Data::Uri("/icon/battery".into()))
        );
    }

    #[test]
    fn icon_state_is_form_encoded() {
        let item = Arc::new(Item::new("Scene", "String").with_state(State::Text("movie night".into())));
        let backing = ValueReference::for_item(&item);
        assert_eq!(icon_url("/icon/", "scene", &backing), "/icon/scene?state=movie+night");
    }

    #[test]
    fn options_select_current_state() {
        let item = Arc::new(Item::new("Light", "Switch").with_state(State::parse("Switch", "OFF").unwrap()));
        let backing = ValueReference::for_item(&item);
        let options = Options::new([
            ("ON".to_string(), "On".to_string()),
            ("OFF".to_string(), "Off".to_string()),
        ]);

        let data = convert_value(ComponentType::Switch, Value::Options(options.clone()), &backing, "/icon")
            .unwrap()
            .unwrap();
        assert_eq!(data.as_options().unwrap().index(), 1);

        item.set_state(State::Null);
        let data = convert_value(ComponentType::Selection, Value::Options(options), &backing, "/icon")
            .unwrap()
            .unwrap();
        assert_eq!(data.as_options().unwrap().index(), Options::NONE);
    }

    #[test]
    fn states_and_statuses_convert_by_target() {
        let none = ValueReference::none();
        assert_eq!(
            convert_value(ComponentType::Text, Value::State(State::Decimal(21.5)), &none, "/icon").unwrap(),
            Some(Data::Text("21.5".into()))
        );
        assert_eq!(
            convert_value(ComponentType::Slider, Value::State(State::Decimal(40.0)), &none, "/icon").unwrap(),
            Some(Data::Number(40.0))
        );
        assert_eq!(
            convert_value(
                ComponentType::Label,
                Value::Status(ThingStatusInfo::new(ThingStatus::Offline)),
                &none,
                "/icon"
            )
            .unwrap(),
            Some(Data::Text("OFFLINE".into()))
        );
        assert_eq!(
            convert_value(ComponentType::Slider, Value::Text(" 12.5 ".into()), &none, "/icon").unwrap(),
            Some(Data::Number(12.5))
        );
        assert_eq!(
            convert_value(ComponentType::Slider, Value::State(State::Undef), &none, "/icon").unwrap(),
            None
        );
    }

    #[test]
    fn unsupported_combinations_fail() {
        let none = ValueReference::none();
        assert!(matches!(
            convert_value(ComponentType::Slider, Value::Text("warm".into()), &none, "/icon"),
            Err(ConversionError::Unsupported {
                to: DataKind::Number,
                ..
            })
        ));
        assert!(convert_value(
            ComponentType::Switch,
            Value::State(State::Text("x".into())),
            &none,
            "/icon"
        )
        .is_err());
        assert!(convert_value(ComponentType::Group, Value::Text("x".into()), &none, "/icon").is_err());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let none = ValueReference::none();
        for raw in [
            Value::Text("NaN".into()),
            Value::Number(f64::INFINITY),
            Value::State(State::Decimal(f64::NAN)),
        ] {
            assert!(convert_value(ComponentType::Slider, raw, &none, "/icon").is_err());
        }
        assert_eq!(
            convert_value(ComponentType::Slider, Value::Text("42".into()), &none, "/icon").unwrap(),
            Some(Data::Number(42.0))
        );
    }
}
