//! Presentation template.
//!
//! One slide master, one blank layout and one theme; every slide holds a
//! single text box with one paragraph per line.

use super::{XML_DECLARATION, content_types_xml, relationships_xml};
use crate::common::xml::escape_text;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::packuri::CONTENT_TYPES_URI;
use crate::ooxml::session::plain_text::slide_blocks;
use std::fmt::Write;

/// 16:9 slide size in EMU.
const SLIDE_WIDTH: i64 = 12_192_000;
const SLIDE_HEIGHT: i64 = 6_858_000;
/// Text box inset from the slide edges in EMU (half an inch).
const TEXT_BOX_INSET: i64 = 457_200;
const FIRST_SLIDE_ID: usize = 256;

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="2800"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

/// Parts of a new presentation package, in archive order.
///
/// Slides are split on `Slide N:` header lines; text without headers
/// becomes a single slide.
pub fn parts(text: &str) -> Vec<(String, Vec<u8>)> {
    let slides = slide_blocks(text);
    let slide_count = slides.len();

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), ct::PML_PRESENTATION_MAIN),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), ct::PML_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), ct::PML_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml".to_string(), ct::OFC_THEME),
    ];
    overrides.extend((1..=slide_count).map(|n| (format!("/ppt/slides/slide{}.xml", n), ct::PML_SLIDE)));

    let mut presentation_rels = vec![
        (
            "rId1".to_string(),
            rt::SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), rt::THEME, "theme/theme1.xml".to_string()),
    ];
    presentation_rels.extend(
        (1..=slide_count).map(|n| (slide_rel_id(n), rt::SLIDE, format!("slides/slide{}.xml", n))),
    );

    let mut parts = vec![
        (CONTENT_TYPES_URI[1..].to_string(), content_types_xml(&overrides).into_bytes()),
        (
            "_rels/.rels".to_string(),
            relationships_xml(&[(
                "rId1".to_string(),
                rt::OFFICE_DOCUMENT,
                "ppt/presentation.xml".to_string(),
            )])
            .into_bytes(),
        ),
        (
            "ppt/presentation.xml".to_string(),
            presentation_xml(slide_count).into_bytes(),
        ),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            relationships_xml(&presentation_rels).into_bytes(),
        ),
        (
            "ppt/slideMasters/slideMaster1.xml".to_string(),
            SLIDE_MASTER_XML.as_bytes().to_vec(),
        ),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            relationships_xml(&[
                (
                    "rId1".to_string(),
                    rt::SLIDE_LAYOUT,
                    "../slideLayouts/slideLayout1.xml".to_string(),
                ),
                ("rId2".to_string(), rt::THEME, "../theme/theme1.xml".to_string()),
            ])
            .into_bytes(),
        ),
        (
            "ppt/slideLayouts/slideLayout1.xml".to_string(),
            SLIDE_LAYOUT_XML.as_bytes().to_vec(),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
            relationships_xml(&[(
                "rId1".to_string(),
                rt::SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml".to_string(),
            )])
            .into_bytes(),
        ),
        ("ppt/theme/theme1.xml".to_string(), THEME_XML.as_bytes().to_vec()),
    ];

    let slide_layout_rels = relationships_xml(&[(
        "rId1".to_string(),
        rt::SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml".to_string(),
    )]);
    for (i, body) in slides.iter().enumerate() {
        let n = i + 1;
        parts.push((format!("ppt/slides/slide{}.xml", n), slide_xml(body).into_bytes()));
        parts.push((
            format!("ppt/slides/_rels/slide{}.xml.rels", n),
            slide_layout_rels.clone().into_bytes(),
        ));
    }

    parts
}

#[inline]
fn slide_rel_id(slide_number: usize) -> String {
    // rId1 and rId2 are taken by the master and the theme
    format!("rId{}", slide_number + 2)
}

/// Generate `ppt/presentation.xml` listing `slide_count` slides.
pub fn presentation_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 1..=slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + n - 1,
                slide_rel_id(n)
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT
    );
    xml.push_str("</p:presentation>");
    xml
}

/// Generate a slide with one text box holding one paragraph per line of `body`.
///
/// An empty body yields a paragraph without runs, so the slide has no text slots.
pub fn slide_xml(body: &str) -> String {
    let mut xml = String::with_capacity(1024 + body.len() * 2);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    );
    xml.push_str(r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
    let _ = write!(
        xml,
        r#"<p:spPr><a:xfrm><a:off x="{inset}" y="{inset}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
        SLIDE_WIDTH - 2 * TEXT_BOX_INSET,
        SLIDE_HEIGHT - 2 * TEXT_BOX_INSET,
        inset = TEXT_BOX_INSET
    );
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);

    if body.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    } else {
        for line in body.split('\n') {
            xml.push_str(r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>"#);
            xml.push_str(&escape_text(line));
            xml.push_str("</a:t></a:r></a:p>");
        }
    }

    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}
