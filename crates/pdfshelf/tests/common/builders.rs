//! Builder for in-memory PDF payloads.
//!
//! Shared by the integration tests and, through `processor::fixtures`, by the
//! unit tests inside the crate.

#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, Stream};

#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<String>,
    info: Vec<(String, Object)>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, text: &str) -> Self {
        self.pages.push(text.to_string());
        self
    }

    pub fn info(self, key: &str, value: &str) -> Self {
        self.info_object(key, Object::string_literal(value))
    }

    /// Adds an info entry of any object type, e.g. a UTF-16 string or a name.
    pub fn info_object(mut self, key: &str, value: Object) -> Self {
        self.info.push((key.to_string(), value));
        self
    }

    pub fn producer(self, value: &str) -> Self {
        self.info("Producer", value)
    }

    pub fn creator(self, value: &str) -> Self {
        self.info("Creator", value)
    }

    pub fn creation_date(self, value: &str) -> Self {
        self.info("CreationDate", value)
    }

    pub fn mod_date(self, value: &str) -> Self {
        self.info("ModDate", value)
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for text in &self.pages {
            let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let mut info = Dictionary::new();
            for (key, value) in self.info {
                info.set(key.into_bytes(), value);
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("Failed to serialize PDF");
        bytes
    }
}

/// One page per entry in `pages`, with `info` as the information dictionary.
pub fn build_pdf(pages: &[&str], info: &[(&str, Object)]) -> Vec<u8> {
    let builder = pages.iter().fold(PdfBuilder::new(), |b, text| b.page(text));
    info.iter()
        .fold(builder, |b, (key, value)| b.info_object(key, value.clone()))
        .build()
}

/// All four mapped info fields present.
pub fn full_info() -> Vec<(&'static str, Object)> {
    vec![
        ("Producer", Object::string_literal("Skia/PDF m120")),
        ("Creator", Object::string_literal("Writer")),
        ("CreationDate", Object::string_literal("D:20240115093000+01'00'")),
        ("ModDate", Object::string_literal("D:20240220120000Z")),
    ]
}
