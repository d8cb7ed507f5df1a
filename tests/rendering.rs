use std::cell::RefCell;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv_invoice::config::InvoiceConfig;
use csv_invoice::fonts::{FontLoader, FontSource};
use csv_invoice::model::{InvoiceDocument, LineItem};
use csv_invoice::pipeline::{self, InvoiceError};
use csv_invoice::render;
use csv_invoice::viewer::Viewer;
use sha2::{Digest, Sha256};

const SAMPLE_CSV: &str = "product,price,qty
Widget,10.00,2
,,
Чайник электрический,\"1 499,90\",1
Чай,\"1,50\",4
Gadget,5,3
";

#[derive(Default)]
struct RecordingViewer {
    opened: RefCell<Vec<PathBuf>>,
}

impl Viewer for RecordingViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Fonts with Cyrillic glyphs that are commonly installed.
const FALLBACK_FONTS: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

fn font_path() -> Option<PathBuf> {
    env::var_os("INVOICE_FONT_PATH")
        .map(PathBuf::from)
        .or_else(|| {
            FALLBACK_FONTS
                .iter()
                .map(PathBuf::from)
                .find(|path| path.is_file())
        })
}

fn font_loader() -> Option<FontLoader> {
    font_path().map(|path| FontLoader::new(FontSource::File(path)))
}

fn skip(test: &str) {
    eprintln!(
        "Skipping {test}: no Cyrillic TrueType font found; set INVOICE_FONT_PATH to one."
    );
}

fn sample_document() -> InvoiceDocument {
    InvoiceDocument::new(vec![
        LineItem::parse("Widget", "10.00", "2").unwrap(),
        LineItem::parse("Гаджет", "5", "3").unwrap(),
    ])
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn blank_until(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if !data[index..].starts_with(tag) {
                index += 1;
                continue;
            }
            let mut cursor = index + tag.len();
            while cursor < data.len() && data[cursor] != terminator {
                if !matches!(data[cursor], b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    data[cursor] = b'0';
                }
                cursor += 1;
            }
            index = cursor;
        }
    }

    let mut normalized = bytes.to_vec();
    let tags: [(&[u8], u8); 10] = [
        (b"/CreationDate(", b')'),
        (b"/ModDate(", b')'),
        (b"/ID[", b']'),
        (b"/Producer(", b')'),
        (b"<xmp:CreateDate>", b'<'),
        (b"<xmp:ModifyDate>", b'<'),
        (b"<xmp:MetadataDate>", b'<'),
        (b"<xmpMM:DocumentID>", b'<'),
        (b"<xmpMM:InstanceID>", b'<'),
        (b"<xmpMM:VersionID>", b'<'),
    ];
    for (tag, terminator) in tags {
        blank_until(&mut normalized, tag, terminator);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_pdf_bytes() {
    let Some(mut fonts) = font_loader() else {
        return skip("renders_pdf_bytes");
    };

    let bytes = render::render_to_bytes(&sample_document(), &mut fonts).expect("render invoice");
    assert!(bytes.starts_with(b"%PDF"), "output should carry a PDF header");
}

#[test]
fn rendering_is_deterministic() {
    let Some(mut fonts) = font_loader() else {
        return skip("rendering_is_deterministic");
    };

    let first = render::render_to_bytes(&sample_document(), &mut fonts).expect("first render");
    let second = render::render_to_bytes(&sample_document(), &mut fonts).expect("second render");

    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first),
        normalized_hash(&second),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn pipeline_writes_and_opens_invoice() {
    let Some(mut fonts) = font_loader() else {
        return skip("pipeline_writes_and_opens_invoice");
    };

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("products.csv");
    let output = dir.path().join("output").join("invoice.pdf");
    fs::write(&input, SAMPLE_CSV).unwrap();
    let config = InvoiceConfig::new().with_input(&input).with_output(&output);

    let viewer = RecordingViewer::default();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = pipeline::run(&config, &mut fonts, &viewer, &mut out, &mut err).unwrap();

    assert_eq!(summary.line_items, 3);
    assert_eq!(summary.skipped_blank, 1);
    assert_eq!(summary.skipped_malformed, 1);
    assert!(output.is_file());
    assert_eq!(
        fs::metadata(&output).unwrap().len() as usize,
        summary.bytes_written
    );
    assert_eq!(*viewer.opened.borrow(), vec![output.clone()]);

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with(
        "Processing: Widget...\nProcessing: Чай...\nProcessing: Gadget...\n"
    ));
    assert!(out.contains("Opening PDF..."));
    let err = String::from_utf8(err).unwrap();
    assert_eq!(err.lines().count(), 1, "only the '1 499.90' row complains");
}

#[test]
fn rerun_overwrites_output() {
    let Some(mut fonts) = font_loader() else {
        return skip("rerun_overwrites_output");
    };

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("products.csv");
    let output = dir.path().join("invoice.pdf");
    fs::write(&output, vec![b'x'; 4 * 1024 * 1024]).unwrap();
    fs::write(&input, "product,price,qty\nWidget,10.00,2\n").unwrap();
    let config = InvoiceConfig::new()
        .with_input(&input)
        .with_output(&output)
        .with_open_viewer(false);

    let viewer = RecordingViewer::default();
    let mut run = || {
        pipeline::run(&config, &mut fonts, &viewer, &mut io::sink(), &mut io::sink())
    };
    let first = run().unwrap();
    let second = run().unwrap();

    assert_eq!(first.bytes_written, second.bytes_written);
    assert_eq!(
        fs::metadata(&output).unwrap().len() as usize,
        second.bytes_written
    );
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
}

#[test]
fn viewer_is_not_called_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("products.csv");
    fs::write(&input, "product,price,qty\n,,\n").unwrap();
    let config = InvoiceConfig::new()
        .with_input(&input)
        .with_output(dir.path().join("invoice.pdf"));

    let viewer = RecordingViewer::default();
    let mut fonts = FontLoader::new(FontSource::File(dir.path().join("missing.ttf")));
    let result = pipeline::run(&config, &mut fonts, &viewer, &mut io::sink(), &mut io::sink());

    assert!(matches!(result, Err(InvoiceError::NoData)));
    assert!(viewer.opened.borrow().is_empty());
}
