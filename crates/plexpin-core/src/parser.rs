//! Decoding of plex.tv PIN responses.
//!
//! Both `POST /pins.xml` and `GET /pins/<id>.xml` answer with the same
//! document:
//!
//! ```xml
//! <pin>
//!   <code>MOCA</code>
//!   <expires-at type="datetime">2026-10-19T10:15:00Z</expires-at>
//!   <id type="integer">12345678</id>
//!   <auth_token nil="true"/>
//! </pin>
//! ```
//!
//! The body is decoded into a [`PinDocument`] and the needed fields are
//! projected from it. A missing code or id is a malformed response; a
//! missing or nil token is simply "not authorized yet".

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::api::{PinError, Result};
use crate::models::Pin;

/// Direct children of the response's root element that the PIN flow uses.
/// Empty or `nil="true"` elements decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinDocument {
    pub code: Option<String>,
    pub id: Option<String>,
    pub expires_at: Option<String>,
    pub client_identifier: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Code,
    Id,
    ExpiresAt,
    ClientIdentifier,
    AuthToken,
}

impl Field {
    fn from_element(e: &BytesStart<'_>) -> Option<Self> {
        match e.local_name().as_ref() {
            b"code" => Some(Field::Code),
            b"id" => Some(Field::Id),
            b"expires-at" => Some(Field::ExpiresAt),
            b"client-identifier" => Some(Field::ClientIdentifier),
            b"auth_token" | b"auth-token" => Some(Field::AuthToken),
            _ => None,
        }
    }
}

fn is_nil(e: &BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"nil" && attr.value.as_ref() == b"true")
}

impl PinDocument {
    /// Decode a response body. Fails when the body is not an XML document.
    ///
    /// A field element that appears twice is rejected as ambiguous.
    pub fn decode(body: &str) -> Result<Self> {
        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        let mut doc = PinDocument::default();
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut current: Option<Field> = None;
        let mut seen: HashSet<Field> = HashSet::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    match depth {
                        1 => saw_root = true,
                        2 => {
                            let field = Self::first_occurrence(&e, &mut seen)?;
                            if !is_nil(&e) {
                                current = field;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(e)) => {
                    // An empty child carries no value; an empty root is still a document
                    match depth {
                        0 => saw_root = true,
                        1 => {
                            Self::first_occurrence(&e, &mut seen)?;
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => {
                    if depth == 2 {
                        current = None;
                    }
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Text(e)) => {
                    if let (2, Some(field)) = (depth, current) {
                        let text = e.unescape().map_err(|e| {
                            PinError::MalformedResponse(format!("Invalid text in response: {}", e))
                        })?;
                        doc.append(field, &text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let (2, Some(field)) = (depth, current) {
                        let raw = e.into_inner();
                        doc.append(field, &String::from_utf8_lossy(&raw));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(PinError::MalformedResponse(format!(
                        "XML error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        if !saw_root {
            return Err(PinError::MalformedResponse(
                "Response is not an XML document".to_string(),
            ));
        }

        Ok(doc.normalized())
    }

    fn first_occurrence(e: &BytesStart<'_>, seen: &mut HashSet<Field>) -> Result<Option<Field>> {
        match Field::from_element(e) {
            Some(field) if !seen.insert(field) => Err(PinError::MalformedResponse(format!(
                "Duplicate <{}> element in response",
                String::from_utf8_lossy(e.local_name().as_ref())
            ))),
            field => Ok(field),
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Code => &mut self.code,
            Field::Id => &mut self.id,
            Field::ExpiresAt => &mut self.expires_at,
            Field::ClientIdentifier => &mut self.client_identifier,
            Field::AuthToken => &mut self.auth_token,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            code: clean(self.code),
            id: clean(self.id),
            expires_at: clean(self.expires_at),
            client_identifier: clean(self.client_identifier),
            auth_token: clean(self.auth_token),
        }
    }
}

/// Extract the PIN from a creation response.
///
/// Never returns a partial PIN: both a code and a numeric id must be present.
pub fn parse_pin_creation(body: &str) -> Result<Pin> {
    let doc = PinDocument::decode(body)?;

    let code = doc
        .code
        .ok_or_else(|| PinError::MalformedResponse("Could not find PIN code in response".to_string()))?;
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PinError::MalformedResponse(format!("Invalid PIN code: {}", code)));
    }

    let id = doc
        .id
        .ok_or_else(|| PinError::MalformedResponse("Could not find PIN id in response".to_string()))?;
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PinError::MalformedResponse(format!("Invalid PIN id: {}", id)));
    }

    let expires_at = doc
        .expires_at
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|at| at.with_timezone(&Utc));

    Ok(Pin { code, id, expires_at })
}

/// Extract the auth token from a status response, `None` while the PIN is unclaimed.
pub fn parse_auth_token(body: &str) -> Result<Option<String>> {
    Ok(PinDocument::decode(body)?.auth_token)
}
