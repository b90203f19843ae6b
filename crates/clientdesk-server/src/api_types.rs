//! Wire-level response shapes.

use serde::Serialize;

use clientdesk_core::{ClientId, ClientRecord};

/// Public projection of a client record.
///
/// Deliberately narrower than [`ClientRecord`]: `owner_id` and the
/// timestamps never appear in a response body.
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    #[serde(rename = "linkedInUrl")]
    pub linked_in_url: String,
}

impl From<ClientRecord> for ClientResponse {
    fn from(record: ClientRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            age: record.age,
            linked_in_url: record.linkedin_url,
        }
    }
}
