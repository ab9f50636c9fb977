//! Word-processing template.

use super::{XML_DECLARATION, content_types_xml, relationships_xml};
use crate::common::xml::escape_text;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::packuri::CONTENT_TYPES_URI;
use crate::ooxml::session::plain_text::split_paragraphs;
use std::fmt::Write;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont"><w:name w:val="Default Paragraph Font"/><w:uiPriority w:val="1"/><w:semiHidden/><w:unhideWhenUsed/></w:style></w:styles>"#;

const SETTINGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:zoom w:percent="100"/><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#;

const FONT_TABLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:fonts xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:font w:name="Calibri"><w:panose1 w:val="020F0502020204030204"/><w:charset w:val="00"/><w:family w:val="swiss"/><w:pitch w:val="variable"/><w:sig w:usb0="E0002AFF" w:usb1="C000247B" w:usb2="00000009" w:usb3="00000000" w:csb0="000001FF" w:csb1="00000000"/></w:font></w:fonts>"#;

/// US Letter page with one-inch margins.
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/><w:cols w:space="720"/><w:docGrid w:linePitch="360"/></w:sectPr>"#;

/// Parts of a new word-processing package, in archive order.
pub fn parts(text: &str) -> Vec<(String, Vec<u8>)> {
    let content_types = content_types_xml(&[
        ("/word/document.xml".to_string(), ct::WML_DOCUMENT_MAIN),
        ("/word/styles.xml".to_string(), ct::WML_STYLES),
        ("/word/settings.xml".to_string(), ct::WML_SETTINGS),
        ("/word/fontTable.xml".to_string(), ct::WML_FONT_TABLE),
    ]);
    let package_rels = relationships_xml(&[(
        "rId1".to_string(),
        rt::OFFICE_DOCUMENT,
        "word/document.xml".to_string(),
    )]);
    let document_rels = relationships_xml(&[
        ("rId1".to_string(), rt::STYLES, "styles.xml".to_string()),
        ("rId2".to_string(), rt::SETTINGS, "settings.xml".to_string()),
        ("rId3".to_string(), rt::FONT_TABLE, "fontTable.xml".to_string()),
    ]);

    vec![
        (CONTENT_TYPES_URI[1..].to_string(), content_types.into_bytes()),
        ("_rels/.rels".to_string(), package_rels.into_bytes()),
        ("word/document.xml".to_string(), document_xml(text).into_bytes()),
        ("word/_rels/document.xml.rels".to_string(), document_rels.into_bytes()),
        ("word/styles.xml".to_string(), STYLES_XML.as_bytes().to_vec()),
        ("word/settings.xml".to_string(), SETTINGS_XML.as_bytes().to_vec()),
        ("word/fontTable.xml".to_string(), FONT_TABLE_XML.as_bytes().to_vec()),
    ]
}

/// Generate `word/document.xml` with one single-run paragraph per segment.
///
/// Empty text yields a single empty paragraph and therefore no text slots.
pub fn document_xml(text: &str) -> String {
    let paragraphs = split_paragraphs(text, 0);

    let mut xml = String::with_capacity(512 + text.len() * 2);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#,
        namespace::WML_MAIN,
        namespace::OFC_RELATIONSHIPS
    );

    if paragraphs.is_empty() {
        xml.push_str("<w:p/>");
    }
    for paragraph in &paragraphs {
        xml.push_str("<w:p><w:r>");
        if paragraph.starts_with(char::is_whitespace) || paragraph.ends_with(char::is_whitespace) {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
        } else {
            xml.push_str("<w:t>");
        }
        xml.push_str(&escape_text(paragraph));
        xml.push_str("</w:t></w:r></w:p>");
    }

    xml.push_str(SECTION_PROPERTIES);
    xml.push_str("</w:body></w:document>");
    xml
}
