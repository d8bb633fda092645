//! Body encoding for field lists: `application/x-www-form-urlencoded` for
//! plain forms and `multipart/form-data` for uploads.
//!
//! Multipart framing, file names and part content types come from
//! `reqwest::blocking::multipart`; this module only decides which fields go
//! where and reports the ones that cannot be sent.

use reqwest::blocking::multipart::{Form, Part};
use url::form_urlencoded;

use crate::error::TransportError;
use crate::http::RequestBody;
use crate::types::FormField;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A request body ready for the transport.
#[derive(Debug)]
pub enum EncodedBody {
    /// Plain bytes plus the content type they imply, if any.
    Bytes {
        content_type: Option<&'static str>,
        bytes: Vec<u8>,
    },
    /// A multipart form. It carries its own boundary-bearing content type.
    Multipart(Form),
}

/// Encode a request body. `Ok(None)` means there is nothing to send.
pub fn encode_body(body: &RequestBody, multipart: bool) -> Result<Option<EncodedBody>, TransportError> {
    match body {
        RequestBody::Empty => Ok(None),
        RequestBody::Text(text) => Ok(Some(EncodedBody::Bytes {
            content_type: None,
            bytes: text.as_bytes().to_vec(),
        })),
        RequestBody::Fields(fields) if multipart => Ok(Some(EncodedBody::Multipart(multipart_form(fields)?))),
        RequestBody::Fields(fields) => Ok(Some(EncodedBody::Bytes {
            content_type: Some(FORM_URLENCODED),
            bytes: encode_urlencoded(fields)?.into_bytes(),
        })),
    }
}

/// Content fields as a urlencoded string. File fields need multipart.
pub fn encode_urlencoded(fields: &[FormField]) -> Result<String, TransportError> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for field in fields {
        match field {
            FormField::Content { name, value } => {
                check_name(name)?;
                serializer.append_pair(name, value);
            }
            FormField::File { name, .. } => {
                return Err(TransportError::InvalidField(format!(
                    "file field `{name}` requires a multipart request"
                )));
            }
        }
    }
    Ok(serializer.finish())
}

/// Fields as a multipart form. File parts are opened here so a missing
/// file fails before anything is sent.
pub fn multipart_form(fields: &[FormField]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for field in fields {
        check_name(field.name())?;
        form = match field {
            FormField::Content { name, value } => form.text(name.clone(), value.clone()),
            FormField::File { name, path } => {
                let part = Part::file(path).map_err(|e| {
                    TransportError::InvalidField(format!("cannot read `{}` for field `{name}`: {e}", path.display()))
                })?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

fn check_name(name: &str) -> Result<(), TransportError> {
    if name.is_empty() {
        return Err(TransportError::InvalidField("field name is empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_sends_nothing() {
        assert!(encode_body(&RequestBody::Empty, false).unwrap().is_none());
    }

    #[test]
    fn text_body_is_sent_verbatim() {
        let encoded = encode_body(&RequestBody::Text("a b&c".to_string()), false).unwrap();
        let Some(EncodedBody::Bytes { content_type, bytes }) = encoded else {
            panic!("expected plain bytes");
        };
        assert_eq!(bytes, b"a b&c");
        assert_eq!(content_type, None);
    }

    #[test]
    fn content_fields_are_urlencoded() {
        let fields = vec![
            FormField::content("search", "MSU vs UNC"),
            FormField::content("q", "derek,matt"),
        ];
        let encoded = encode_body(&RequestBody::Fields(fields), false).unwrap();
        let Some(EncodedBody::Bytes { content_type, bytes }) = encoded else {
            panic!("expected plain bytes");
        };
        assert_eq!(content_type, Some(FORM_URLENCODED));
        assert_eq!(bytes, b"search=MSU+vs+UNC&q=derek%2Cmatt");
    }

    #[test]
    fn file_field_without_multipart_is_invalid() {
        let fields = vec![FormField::file("cc_pic", "/images/credit_card.jpg")];
        let err = encode_urlencoded(&fields).unwrap_err();
        assert!(matches!(err, TransportError::InvalidField(_)));
    }

    #[test]
    fn empty_field_name_is_invalid() {
        let fields = vec![FormField::content("", "value")];
        assert!(matches!(
            multipart_form(&fields).unwrap_err(),
            TransportError::InvalidField(_)
        ));
        assert!(matches!(
            encode_urlencoded(&fields).unwrap_err(),
            TransportError::InvalidField(_)
        ));
    }

    #[test]
    fn fields_become_multipart_form_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credit_card.txt");
        std::fs::write(&path, "4111 1111 1111 1111").unwrap();

        let fields = vec![
            FormField::content("gelato", "peanut butter"),
            FormField::file("cc_pic", &path),
        ];
        let encoded = encode_body(&RequestBody::Fields(fields), true).unwrap();
        let Some(EncodedBody::Multipart(form)) = encoded else {
            panic!("expected a multipart form");
        };
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn missing_file_is_invalid_field() {
        let fields = vec![FormField::file("cc_pic", "/definitely/not/here.jpg")];
        let err = multipart_form(&fields).unwrap_err();
        match err {
            TransportError::InvalidField(msg) => {
                assert!(msg.contains("cc_pic"));
                assert!(msg.contains("/definitely/not/here.jpg"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
