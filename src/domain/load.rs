//! The backend "load" record as it arrives over the wire.
//!
//! The API has shipped several shapes for the same entity over time, so every
//! field is optional and tolerant: a field with an unexpected JSON type is
//! treated as absent instead of failing the whole record. Fields this model does
//! not know about are kept in [`Load::extra`] so a record survives a round trip.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::documents::{DocumentCategory, DocumentFile};

/// Identifier of a load (`_id` on the wire).
pub type LoadId = String;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: LoadId,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub origin: Option<Place>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub destination: Option<Place>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<Place>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<Place>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub pickup: Vec<PickupStop>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub drop: Vec<DropStop>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub pick_up_by_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub pickup_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub deliver_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub delivery_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub load_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub brokerage: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub proof_of_delivery: Vec<DocumentFile>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub lumper_receipt: Vec<DocumentFile>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub accessorials: Vec<DocumentFile>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Load {
    pub fn documents(&self, category: DocumentCategory) -> &[DocumentFile] {
        match category {
            DocumentCategory::ProofOfDelivery => &self.proof_of_delivery,
            DocumentCategory::LumperReceipt => &self.lumper_receipt,
            DocumentCategory::Accessorials => &self.accessorials,
        }
    }

    pub fn documents_mut(&mut self, category: DocumentCategory) -> &mut Vec<DocumentFile> {
        match category {
            DocumentCategory::ProofOfDelivery => &mut self.proof_of_delivery,
            DocumentCategory::LumperReceipt => &mut self.lumper_receipt,
            DocumentCategory::Accessorials => &mut self.accessorials,
        }
    }

    pub fn first_pickup(&self) -> Option<&PickupStop> {
        self.pickup.first()
    }

    pub fn first_drop(&self) -> Option<&DropStop> {
        self.drop.first()
    }
}

/// A location given either as free text or as a `{city, stateCode}` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Place {
    Text(String),
    Structured {
        #[serde(default, deserialize_with = "lenient_text")]
        city: Option<String>,
        #[serde(rename = "stateCode", default, deserialize_with = "lenient_text")]
        state_code: Option<String>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PickupStop {
    #[serde(rename = "pickupCity", default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(rename = "pickupState", default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(rename = "pickupZip", default, deserialize_with = "lenient_text")]
    pub zip: Option<String>,
    #[serde(rename = "pickupAddress", default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(rename = "pickupDate", default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(rename = "pickupReference", default, deserialize_with = "lenient_text")]
    pub reference: Option<String>,
    #[serde(rename = "shipperName", default, deserialize_with = "lenient_text")]
    pub shipper_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DropStop {
    #[serde(rename = "dropCity", default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(rename = "dropState", default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(rename = "dropZip", default, deserialize_with = "lenient_text")]
    pub zip: Option<String>,
    #[serde(rename = "dropAddress", default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(rename = "dropDate", default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(rename = "dropReference", default, deserialize_with = "lenient_text")]
    pub reference: Option<String>,
    #[serde(rename = "receiverName", default, deserialize_with = "lenient_text")]
    pub receiver_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default, deserialize_with = "lenient")]
    pub modes: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub length: Option<EquipmentLength>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentLength {
    #[serde(default, deserialize_with = "lenient_text")]
    pub standard: Option<String>,
}

/// One page of loads as returned by either listing endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadPage {
    pub loads: Vec<Load>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Body of the status-modify endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StatusAck {
    #[serde(default, deserialize_with = "lenient")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

/// Deserializes any JSON into `T`, falling back to `T::default()` when the
/// value has the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Strings and numbers become text; everything else, and blank strings, is absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

/// Numbers, and strings holding a number (`"1,250.00"` included), become `f64`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) if !raw.trim().is_empty() => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
