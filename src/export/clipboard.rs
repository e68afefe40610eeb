//! Clipboard payloads for a captured plot and the export sequence.
//!
//! A capture is offered as an HTML fragment (PNG embedded as base64, linked
//! to the saved file), optionally as RTF, and as a raw 32-bit bitmap. Each
//! step stands alone: a failing step is logged and the next one still runs.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::config::CaptureConfig;
use crate::error::{PlotError, Result};
use crate::export::capture::CapturedImage;

const HTML_PRE: &str = "<!DOCTYPE html>\r\n<html>\r\n<body>\r\n<!--StartFragment-->";
const HTML_POST: &str = "<!--EndFragment-->\r\n</body>\r\n</html>";
const IMG_ALT: &str = "Embedded Image";
const BITMAPINFOHEADER_SIZE: u32 = 40;

/// HTML clipboard payload: the bare fragment and the full CF_HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlClip {
    pub fragment: String,
    pub document: String,
}

impl HtmlClip {
    pub fn new(png: &[u8], link: &str) -> Self {
        let fragment = html_fragment(png, link);
        let document = cf_html_document(&fragment);
        Self { fragment, document }
    }
}

/// `<a href=link><img src=data:…></a>`.
pub fn html_fragment(png: &[u8], link: &str) -> String {
    let data = base64::engine::general_purpose::STANDARD.encode(png);
    format!("<a href=\"{link}\"><img src=\"data:image/png;base64,{data}\" alt=\"{IMG_ALT}\"></a>")
}

fn cf_html_header(start_html: usize, end_html: usize, start_frag: usize, end_frag: usize) -> String {
    format!(
        "Version:0.9\r\nStartHTML:{start_html:010}\r\nEndHTML:{end_html:010}\r\n\
         StartFragment:{start_frag:010}\r\nEndFragment:{end_frag:010}\r\n"
    )
}

/// Wrap a fragment in a CF_HTML document whose header holds byte offsets of
/// the HTML and of the fragment.
pub fn cf_html_document(fragment: &str) -> String {
    // Offsets are zero-padded, so the header length does not depend on them.
    let header_len = cf_html_header(0, 0, 0, 0).len();
    let start_html = header_len;
    let start_frag = start_html + HTML_PRE.len();
    let end_frag = start_frag + fragment.len();
    let end_html = end_frag + HTML_POST.len();

    let mut doc = cf_html_header(start_html, end_html, start_frag, end_frag);
    doc.push_str(HTML_PRE);
    doc.push_str(fragment);
    doc.push_str(HTML_POST);
    doc
}

/// RTF picture (hex-encoded PNG) wrapped in a hyperlink field.
/// Goal sizes are in twips, 20 per pixel.
pub fn rtf_document(png: &[u8], width: usize, height: usize, link: &str) -> String {
    let mut rtf = String::with_capacity(png.len() * 2 + 256);
    rtf.push_str("{\\rtf1\\ansi\\deff0 ");
    rtf.push_str(&format!(
        "{{\\field{{\\fldinst HYPERLINK \"{link}\"}}{{\\fldrslt {{\\pict\\pngblip\\picw{width}\\pich{height}\
         \\picwgoal{}\\pichgoal{}\\picscalex100\\picscaley100 ",
        width * 20,
        height * 20
    ));
    for byte in png {
        rtf.push_str(&format!("{byte:02X}"));
    }
    rtf.push_str("}}}\n}\n");
    rtf
}

/// BITMAPINFOHEADER followed by top-down BGRA pixels, as CF_DIB expects.
pub fn encode_dib(image: &CapturedImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(BITMAPINFOHEADER_SIZE as usize + image.rgba.len());
    out.extend_from_slice(&BITMAPINFOHEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(image.width as i32).to_le_bytes());
    // Negative height: rows are stored top-down.
    out.extend_from_slice(&(-(image.height as i32)).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&0u32.to_le_bytes()); // image size (implied for BI_RGB)
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    for px in image.rgba.chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

/// Path as it appears in the HTML/RTF link.
pub fn link_for(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Somewhere clipboard payloads can be written.
pub trait ClipboardTarget {
    /// Called once before the first payload of an export.
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
    fn write_html(&mut self, html: &HtmlClip) -> Result<()>;
    fn write_rtf(&mut self, rtf: &str) -> Result<()>;
    fn write_bitmap(&mut self, image: &CapturedImage) -> Result<()>;
}

/// Cross-platform clipboard. Each `set_*` replaces the previous content, so
/// after a full export the bitmap is what remains.
pub struct ArboardClipboard {
    clipboard: arboard::Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            clipboard: arboard::Clipboard::new()?,
        })
    }
}

impl ClipboardTarget for ArboardClipboard {
    fn write_html(&mut self, html: &HtmlClip) -> Result<()> {
        self.clipboard
            .set_html(html.fragment.as_str(), Some(IMG_ALT))?;
        Ok(())
    }

    fn write_rtf(&mut self, _rtf: &str) -> Result<()> {
        Err(PlotError::Clipboard(
            "RTF is not supported by this clipboard backend".to_string(),
        ))
    }

    fn write_bitmap(&mut self, image: &CapturedImage) -> Result<()> {
        self.clipboard.set_image(arboard::ImageData {
            width: image.width,
            height: image.height,
            bytes: std::borrow::Cow::Borrowed(&image.rgba),
        })?;
        Ok(())
    }
}

#[cfg(windows)]
mod win {
    use clipboard_win::{formats, raw, Clipboard};

    use super::{encode_dib, ClipboardTarget, HtmlClip};
    use crate::error::{PlotError, Result};
    use crate::export::capture::CapturedImage;

    /// Native clipboard: formats are added without clearing, so HTML, RTF
    /// and CF_DIB sit side by side and the paste target picks one.
    pub struct WindowsClipboard;

    fn with_open(f: impl FnOnce() -> Result<()>) -> Result<()> {
        let _clip = Clipboard::new_attempts(10).map_err(PlotError::clipboard)?;
        f()
    }

    fn set_registered(name: &str, text: &str) -> Result<()> {
        let format = raw::register_format(name).ok_or_else(|| {
            PlotError::Clipboard(format!("Unable to register {name} clipboard format"))
        })?;
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        with_open(|| raw::set_without_clear(format.get(), &bytes).map_err(PlotError::clipboard))
    }

    impl ClipboardTarget for WindowsClipboard {
        fn clear(&mut self) -> Result<()> {
            with_open(|| raw::empty().map_err(PlotError::clipboard))
        }

        fn write_html(&mut self, html: &HtmlClip) -> Result<()> {
            set_registered("HTML Format", &html.document)
        }

        fn write_rtf(&mut self, rtf: &str) -> Result<()> {
            set_registered("Rich Text Format", rtf)
        }

        fn write_bitmap(&mut self, image: &CapturedImage) -> Result<()> {
            let dib = encode_dib(image);
            with_open(|| raw::set_without_clear(formats::CF_DIB, &dib).map_err(PlotError::clipboard))
        }
    }
}

#[cfg(windows)]
pub use win::WindowsClipboard;

/// The platform's preferred clipboard target.
pub fn system_clipboard() -> Result<Box<dyn ClipboardTarget>> {
    #[cfg(windows)]
    {
        Ok(Box::new(WindowsClipboard))
    }
    #[cfg(not(windows))]
    {
        Ok(Box::new(ArboardClipboard::new()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    Clipboard,
    Html,
    Rtf,
    Bitmap,
    File,
}

/// What happened during one export. Failed steps do not undo earlier ones.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub failures: Vec<(ExportStep, PlotError)>,
    pub saved_to: Option<PathBuf>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, step: ExportStep, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!("Export step {step:?} failed: {e}");
            self.failures.push((step, e));
        }
    }
}

/// Put `image` on the clipboard (HTML, optional RTF, bitmap) and save it
/// as PNG to `config.path`. The file is written whatever the clipboard did.
///
/// Only a PNG encoding failure aborts the export.
pub fn export_capture(
    image: &CapturedImage,
    config: &CaptureConfig,
    target: Result<&mut dyn ClipboardTarget>,
) -> Result<ExportReport> {
    let png = image.encode_png()?;
    let link = link_for(&config.path);
    let mut report = ExportReport::default();

    match target {
        Ok(target) => {
            let cleared = target.clear();
            report.record(ExportStep::Clipboard, cleared);

            let html = HtmlClip::new(&png, &link);
            let written = target.write_html(&html);
            report.record(ExportStep::Html, written);

            if config.rtf {
                let rtf = rtf_document(&png, image.width, image.height, &link);
                let written = target.write_rtf(&rtf);
                report.record(ExportStep::Rtf, written);
            }

            let written = target.write_bitmap(image);
            report.record(ExportStep::Bitmap, written);
        }
        Err(e) => report.record(ExportStep::Clipboard, Err(e)),
    }

    match std::fs::write(&config.path, &png) {
        Ok(()) => {
            tracing::info!(
                "Saved {}x{} capture to {:?}",
                image.width,
                image.height,
                config.path
            );
            report.saved_to = Some(config.path.clone());
        }
        Err(e) => report.record(ExportStep::File, Err(e.into())),
    }

    Ok(report)
}
