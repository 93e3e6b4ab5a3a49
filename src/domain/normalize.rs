//! Turns a [`Load`] of uncertain shape into a display-ready [`NormalizedLoadView`].
//!
//! Every derived attribute is resolved through an ordered chain of candidate
//! fields; the first usable candidate wins and anything unresolvable falls back
//! to a fixed placeholder. Nothing here touches the network or mutates the load.

use std::cmp::Ordering;

use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, Time,
};

use super::load::{DropStop, Load, PickupStop, Place};

pub const UNKNOWN_CITY: &str = "Unknown";
pub const UNRESOLVED_DATE: &str = "TBD";
const MISSING_FIELD: &str = "—";

const LIST_DATE: &[FormatItem<'static>] = format_description!("[month]/[day]/[year]");
const DETAIL_DATE: &[FormatItem<'static>] = format_description!(
    "[month]/[day]/[year] [hour repr:12 padding:none]:[minute] [period]"
);
const NAIVE_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_FRACTION: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE_MINUTES: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Where a view is rendered; decides the status default and the date format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewContext {
    ActiveList,
    DeliveredList,
    Details,
}

impl ViewContext {
    fn default_status(&self) -> &'static str {
        match self {
            ViewContext::DeliveredList => "Delivered",
            ViewContext::ActiveList | ViewContext::Details => "Active",
        }
    }

    fn date_format(&self) -> DateStyle {
        match self {
            ViewContext::Details => DateStyle::DateTime,
            ViewContext::ActiveList | ViewContext::DeliveredList => DateStyle::DateOnly,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateStyle {
    DateOnly,
    DateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPlace {
    pub city: String,
    pub state: String,
}

impl ResolvedPlace {
    fn unknown() -> Self {
        Self {
            city: UNKNOWN_CITY.to_string(),
            state: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.city == UNKNOWN_CITY
    }

    /// `"City, ST"`, or just the city when no state is known.
    pub fn label(&self) -> String {
        if self.state.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.state)
        }
    }
}

/// Shipper/receiver block shown on the details screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressBlock {
    pub name: String,
    pub street: String,
    pub city_state_zip: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedLoadView {
    pub id: String,
    pub status: String,
    pub origin: ResolvedPlace,
    pub destination: ResolvedPlace,
    pub pickup_date: String,
    pub delivery_date: String,
    pub equipment: String,
    pub reference_number: String,
    pub heading_number: String,
    pub price: f64,
    pub price_display: String,
    pub broker: String,
    pub pickup_address: Option<AddressBlock>,
    pub drop_address: Option<AddressBlock>,
    pub updated_at: String,
}

impl NormalizedLoadView {
    pub fn from_load(load: &Load, context: ViewContext) -> Self {
        let style = context.date_format();
        let price = resolve_price(load);
        let reference_number = resolve_reference(load);
        let heading_number = if reference_number.is_empty() {
            load.id.clone()
        } else {
            reference_number.clone()
        };

        Self {
            id: load.id.clone(),
            status: resolve_status(load, context),
            origin: resolve_origin(load),
            destination: resolve_destination(load),
            pickup_date: format_load_date(pickup_date_raw(load), style),
            delivery_date: format_load_date(delivery_date_raw(load), style),
            equipment: resolve_equipment(load),
            reference_number,
            heading_number,
            price,
            price_display: format_price(price),
            broker: resolve_broker(load),
            pickup_address: load.first_pickup().map(pickup_address),
            drop_address: load.first_drop().map(drop_address),
            updated_at: load
                .updated_at
                .as_deref()
                .map(|raw| format_load_date(Some(raw), DateStyle::DateTime))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }

    pub fn origin_label(&self) -> String {
        self.origin.label()
    }

    pub fn destination_label(&self) -> String {
        self.destination.label()
    }

    /// Label/value rows of the details panel. Equipment is left out when the
    /// load carries none.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("Rate", self.price_display.clone())];
        if !self.equipment.is_empty() {
            rows.push(("Equipment", self.equipment.clone()));
        }
        rows.push(("Reference", self.reference_number.clone()));
        rows.push(("Broker", self.broker.clone()));
        rows.push(("Last updated", self.updated_at.clone()));
        rows
    }
}

pub fn resolve_status(load: &Load, context: ViewContext) -> String {
    load.status
        .clone()
        .unwrap_or_else(|| context.default_status().to_string())
}

/// Takes the first candidate that resolves to a known city.
fn first_known(candidates: impl IntoIterator<Item = ResolvedPlace>) -> ResolvedPlace {
    candidates
        .into_iter()
        .find(|place| !place.is_unknown())
        .unwrap_or_else(ResolvedPlace::unknown)
}

fn place_from(place: Option<&Place>) -> ResolvedPlace {
    match place {
        Some(Place::Text(text)) if !text.is_empty() => ResolvedPlace {
            city: text.clone(),
            state: String::new(),
        },
        Some(Place::Structured { city, state_code }) => place_from_parts(city, state_code),
        _ => ResolvedPlace::unknown(),
    }
}

fn place_from_parts(city: &Option<String>, state: &Option<String>) -> ResolvedPlace {
    ResolvedPlace {
        city: non_empty(city).unwrap_or(UNKNOWN_CITY).to_string(),
        state: non_empty(state).unwrap_or_default().to_string(),
    }
}

pub fn resolve_origin(load: &Load) -> ResolvedPlace {
    first_known([
        place_from(load.origin.as_ref()),
        place_from(load.pickup_location.as_ref()),
        load.first_pickup()
            .map(|stop| place_from_parts(&stop.city, &stop.state))
            .unwrap_or_else(ResolvedPlace::unknown),
    ])
}

pub fn resolve_destination(load: &Load) -> ResolvedPlace {
    first_known([
        place_from(load.destination.as_ref()),
        place_from(load.delivery_location.as_ref()),
        load.first_drop()
            .map(|stop| place_from_parts(&stop.city, &stop.state))
            .unwrap_or_else(ResolvedPlace::unknown),
    ])
}

fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

pub fn pickup_date_raw(load: &Load) -> Option<&str> {
    first_text([
        load.pick_up_by_date.as_deref(),
        load.pickup_date.as_deref(),
        load.first_pickup().and_then(|stop| stop.date.as_deref()),
        load.pickup_date_time.as_deref(),
    ])
}

pub fn delivery_date_raw(load: &Load) -> Option<&str> {
    first_text([
        load.deliver_by.as_deref(),
        load.delivery_date.as_deref(),
        load.first_drop().and_then(|stop| stop.date.as_deref()),
        load.delivery_date_time.as_deref(),
    ])
}

/// Pickup date used to order the active list; `None` when unparsable.
pub fn pickup_sort_key(load: &Load) -> Option<PrimitiveDateTime> {
    pickup_date_raw(load).and_then(parse_load_date)
}

/// Orders loads by pickup date, newest first, unparsable dates last.
pub fn compare_pickup_desc(a: &Load, b: &Load) -> Ordering {
    match (pickup_sort_key(a), pickup_sort_key(b)) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parses the date formats seen in load payloads. The wall clock written in the
/// payload is kept as-is; offsets are not applied.
pub fn parse_load_date(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(stamp.date(), stamp.time()));
    }
    [NAIVE_FRACTION, NAIVE_SECONDS, NAIVE_MINUTES]
        .into_iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .or_else(|| {
            Date::parse(raw, DATE_ONLY)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        })
}

pub fn format_load_date(raw: Option<&str>, style: DateStyle) -> String {
    let format = match style {
        DateStyle::DateOnly => LIST_DATE,
        DateStyle::DateTime => DETAIL_DATE,
    };
    raw.and_then(parse_load_date)
        .and_then(|stamp| stamp.format(format).ok())
        .unwrap_or_else(|| UNRESOLVED_DATE.to_string())
}

/// `rate` wins over `price`; a zero counts as missing.
pub fn resolve_price(load: &Load) -> f64 {
    [load.rate, load.price]
        .into_iter()
        .flatten()
        .find(|value| *value != 0.0 && value.is_finite())
        .unwrap_or(0.0)
}

pub fn resolve_reference(load: &Load) -> String {
    first_text([
        load.load_number.as_deref(),
        load.reference_number.as_deref(),
        load.first_pickup().and_then(|stop| stop.reference.as_deref()),
        load.first_drop().and_then(|stop| stop.reference.as_deref()),
    ])
    .unwrap_or_default()
    .to_string()
}

pub fn resolve_equipment(load: &Load) -> String {
    let Some(equipment) = load.equipment.as_ref() else {
        return String::new();
    };
    let mut text = equipment.modes.join(", ");
    if let Some(length) = equipment
        .length
        .as_ref()
        .and_then(|length| length.standard.as_deref())
    {
        text.push_str(&format!(", {length}ft"));
    }
    text
}

fn resolve_broker(load: &Load) -> String {
    first_text([load.brokerage.as_deref(), load.company.as_deref()])
        .unwrap_or(MISSING_FIELD)
        .to_string()
}

fn pickup_address(stop: &PickupStop) -> AddressBlock {
    address_block(
        &stop.shipper_name,
        &stop.address,
        [&stop.city, &stop.state, &stop.zip],
    )
}

fn drop_address(stop: &DropStop) -> AddressBlock {
    address_block(
        &stop.receiver_name,
        &stop.address,
        [&stop.city, &stop.state, &stop.zip],
    )
}

fn address_block(
    name: &Option<String>,
    street: &Option<String>,
    locality: [&Option<String>; 3],
) -> AddressBlock {
    let city_state_zip = locality
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(", ");
    AddressBlock {
        name: non_empty(name).unwrap_or(MISSING_FIELD).to_string(),
        street: non_empty(street).unwrap_or(MISSING_FIELD).to_string(),
        city_state_zip: if city_state_zip.is_empty() {
            MISSING_FIELD.to_string()
        } else {
            city_state_zip
        },
    }
}

/// `$1,234` for whole amounts, `$1,234.50` otherwise.
pub fn format_price(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{fraction:02}")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: serde_json::Value) -> Load {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_origin_everywhere_is_unknown() {
        for raw in [
            json!({ "_id": "1" }),
            json!({ "_id": "1", "pickup": [] }),
            json!({ "_id": "1", "origin": "", "pickupLocation": { "city": "" } }),
        ] {
            let origin = resolve_origin(&load(raw));
            assert_eq!(origin.city, "Unknown");
            assert_eq!(origin.state, "");
        }
    }

    #[test]
    fn origin_falls_through_to_first_pickup_stop() {
        let load = load(json!({
            "_id": "1",
            "origin": { "stateCode": "TX" },
            "pickup": [
                { "pickupCity": "El Paso", "pickupState": "TX" },
                { "pickupCity": "Odessa", "pickupState": "TX" }
            ],
            "deliveryLocation": { "city": "Phoenix", "stateCode": "AZ" }
        }));

        assert_eq!(resolve_origin(&load).label(), "El Paso, TX");
        assert_eq!(resolve_destination(&load).label(), "Phoenix, AZ");
    }

    #[test]
    fn plain_string_place_has_no_state() {
        let load = load(json!({ "_id": "1", "destination": "Memphis" }));
        let destination = resolve_destination(&load);
        assert_eq!(destination.label(), "Memphis");
        assert_eq!(destination.state, "");
    }

    #[test]
    fn dates_format_for_list_and_details() {
        let raw = Some("2024-03-05T00:00:00Z");
        assert_eq!(format_load_date(raw, DateStyle::DateOnly), "03/05/2024");
        assert_eq!(
            format_load_date(raw, DateStyle::DateTime),
            "03/05/2024 12:00 AM"
        );
        assert_eq!(
            format_load_date(Some("2024-11-20T15:07:00.000Z"), DateStyle::DateTime),
            "11/20/2024 3:07 PM"
        );
        assert_eq!(
            format_load_date(Some("2024-07-04"), DateStyle::DateTime),
            "07/04/2024 12:00 AM"
        );
        assert_eq!(
            format_load_date(Some("2024-07-04T08:30"), DateStyle::DateOnly),
            "07/04/2024"
        );
    }

    #[test]
    fn offsets_do_not_shift_the_wall_clock() {
        assert_eq!(
            format_load_date(Some("2024-03-05T23:30:00-06:00"), DateStyle::DateTime),
            "03/05/2024 11:30 PM"
        );
    }

    #[test]
    fn unusable_dates_render_tbd() {
        for raw in [None, Some(""), Some("   "), Some("tomorrow"), Some("2024-13-45")] {
            assert_eq!(format_load_date(raw, DateStyle::DateOnly), "TBD");
            assert_eq!(format_load_date(raw, DateStyle::DateTime), "TBD");
        }
    }

    #[test]
    fn date_chain_prefers_by_dates_and_skips_blanks() {
        let load = load(json!({
            "_id": "1",
            "pickUpByDate": "",
            "pickupDate": "2024-02-01T10:00:00Z",
            "pickupDateTime": "2024-09-09T10:00:00Z",
            "drop": [{ "dropDate": "2024-02-03T10:00:00Z" }],
            "deliveryDateTime": "2024-09-09T10:00:00Z"
        }));

        assert_eq!(pickup_date_raw(&load), Some("2024-02-01T10:00:00Z"));
        assert_eq!(delivery_date_raw(&load), Some("2024-02-03T10:00:00Z"));
    }

    #[test]
    fn price_prefers_rate_then_price() {
        assert_eq!(resolve_price(&load(json!({ "rate": 1800, "price": 1500 }))), 1800.0);
        assert_eq!(resolve_price(&load(json!({ "rate": 0, "price": 1500 }))), 1500.0);
        assert_eq!(resolve_price(&load(json!({}))), 0.0);
        assert_eq!(format_price(1234567.0), "$1,234,567");
        assert_eq!(format_price(950.5), "$950.50");
        assert_eq!(format_price(0.0), "$0");
    }

    #[test]
    fn reference_number_chain() {
        assert_eq!(
            resolve_reference(&load(json!({ "loadNumber": "L-1", "referenceNumber": "R-1" }))),
            "L-1"
        );
        assert_eq!(
            resolve_reference(&load(json!({
                "pickup": [{}],
                "drop": [{ "dropReference": "D-7" }]
            }))),
            "D-7"
        );
        assert_eq!(resolve_reference(&load(json!({}))), "");
    }

    #[test]
    fn equipment_joins_modes_and_length() {
        let with_length = load(json!({
            "equipment": { "modes": ["Van", "Reefer"], "length": { "standard": 53 } }
        }));
        assert_eq!(resolve_equipment(&with_length), "Van, Reefer, 53ft");

        let modes_only = load(json!({ "equipment": { "modes": ["Flatbed"] } }));
        assert_eq!(resolve_equipment(&modes_only), "Flatbed");

        assert_eq!(resolve_equipment(&load(json!({}))), "");
    }

    #[test]
    fn detail_rows_skip_missing_equipment() {
        let labels = |load: &Load| {
            NormalizedLoadView::from_load(load, ViewContext::Details)
                .detail_rows()
                .into_iter()
                .map(|(label, _)| label)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            labels(&load(json!({ "rate": 900 }))),
            vec!["Rate", "Reference", "Broker", "Last updated"]
        );

        let with_van = load(json!({ "equipment": { "modes": ["Van"] } }));
        assert!(labels(&with_van).contains(&"Equipment"));
    }

    #[test]
    fn status_default_depends_on_screen() {
        let bare = load(json!({ "_id": "1" }));
        assert_eq!(resolve_status(&bare, ViewContext::ActiveList), "Active");
        assert_eq!(resolve_status(&bare, ViewContext::DeliveredList), "Delivered");
    }

    #[test]
    fn normalizing_twice_is_identical_and_leaves_source_alone() {
        let source = load(json!({
            "_id": "9",
            "rate": 2100,
            "status": "enRoute",
            "pickup": [{ "pickupCity": "Reno", "pickupState": "NV", "shipperName": "Acme" }],
            "drop": [{ "dropCity": "Boise", "dropZip": "83702" }],
            "deliverBy": "2024-05-02T14:00:00Z"
        }));
        let before = source.clone();

        let first = NormalizedLoadView::from_load(&source, ViewContext::Details);
        let second = NormalizedLoadView::from_load(&source, ViewContext::Details);

        assert_eq!(first, second);
        assert_eq!(source, before);
        assert_eq!(first.origin_label(), "Reno, NV");
        assert_eq!(first.delivery_date, "05/02/2024 2:00 PM");
        assert_eq!(first.pickup_date, "TBD");
        assert_eq!(first.heading_number, "9");
        assert_eq!(
            first.pickup_address,
            Some(AddressBlock {
                name: "Acme".into(),
                street: "—".into(),
                city_state_zip: "Reno, NV".into(),
            })
        );
        assert_eq!(
            first.drop_address.map(|block| block.city_state_zip),
            Some("Boise, 83702".to_string())
        );
        assert_eq!(first.broker, "—");
        assert_eq!(first.updated_at, "N/A");
    }

    #[test]
    fn pickup_ordering_puts_unparsable_last() {
        let newer = load(json!({ "pickupDate": "2024-06-01" }));
        let older = load(json!({ "pickupDate": "2024-01-01" }));
        let garbled = load(json!({ "pickupDate": "soon" }));

        let mut loads = vec![garbled.clone(), older.clone(), newer.clone()];
        loads.sort_by(compare_pickup_desc);
        assert_eq!(loads, vec![newer, older, garbled]);
    }
}
