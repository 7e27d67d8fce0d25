//! Document information dictionary for rendered PDFs.
//!
//! genpdf only writes a title, so the remaining metadata is merged into the
//! `/Info` dictionary after rendering with `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::document::ReportDocument;
use crate::error::Result;

/// Metadata written to the `/Info` dictionary. Empty values are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub keywords: String,
    pub creator: String,
}

impl DocumentInfo {
    pub fn from_document(document: &ReportDocument) -> Self {
        Self {
            title: document.title().to_string(),
            subject: document.subject().to_string(),
            author: document.author().to_string(),
            keywords: document.keywords().to_string(),
            creator: document.config().product(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("Title", self.title.as_str()),
            ("Subject", self.subject.as_str()),
            ("Author", self.author.as_str()),
            ("Keywords", self.keywords.as_str()),
            ("Creator", self.creator.as_str()),
        ]
    }
}

/// Returns `pdf_bytes` with `info` merged into the document information
/// dictionary, creating the dictionary when the file has none.
pub fn apply_document_info(pdf_bytes: &[u8], info: &DocumentInfo) -> Result<Vec<u8>> {
    let mut document = Document::load_mem(pdf_bytes)?;
    let info_id = info_dictionary_id(&mut document);

    let Some(dictionary) = document
        .objects
        .get_mut(&info_id)
        .and_then(|object| object.as_dict_mut().ok())
    else {
        log::warn!("document information entry is not a dictionary, leaving metadata untouched");
        return Ok(pdf_bytes.to_vec());
    };

    for (key, value) in info.entries() {
        if !value.is_empty() {
            dictionary.set(key, text_string(value));
        }
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

fn info_dictionary_id(document: &mut Document) -> ObjectId {
    if let Some(id) = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .ok()
    {
        return id;
    }

    let id = document.add_object(Dictionary::new());
    document.trailer.set("Info", Object::Reference(id));
    id
}

/// Encodes `value` as a PDF text string: a literal for ASCII, UTF-16BE with
/// a byte order mark otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn minimal_pdf() -> Vec<u8> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        document.save_to(&mut bytes).expect("save");
        bytes
    }

    fn info_of(bytes: &[u8]) -> Dictionary {
        let document = Document::load_mem(bytes).expect("load");
        let id = document
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .expect("info reference");
        document
            .get_object(id)
            .and_then(Object::as_dict)
            .expect("info dictionary")
            .clone()
    }

    #[test]
    fn creates_missing_info_dictionary() {
        let info = DocumentInfo {
            title: "Births".into(),
            creator: "webtrees 2.1".into(),
            ..DocumentInfo::default()
        };
        let bytes = apply_document_info(&minimal_pdf(), &info).expect("apply");
        let dictionary = info_of(&bytes);

        assert_eq!(
            dictionary.get(b"Title").and_then(Object::as_str).expect("title"),
            b"Births"
        );
        assert!(dictionary.get(b"Creator").is_ok());
        assert!(dictionary.get(b"Subject").is_err());
    }

    #[test]
    fn non_ascii_values_are_utf16() {
        match text_string("Müller") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xfe, 0xff]);
                assert_eq!(bytes.len(), 2 + 2 * 6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
