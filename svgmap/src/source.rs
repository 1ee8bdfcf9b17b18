//! Lecture et décodage des fichiers SVG

use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use memchr::memmem;
use tracing::{debug, warn};

use crate::SvgMapError;

/// Taille maximale de la zone où chercher la déclaration XML
const PROLOG_WINDOW: usize = 256;

/// Lit un fichier SVG et le décode en texte
pub fn read(path: &Path) -> Result<String, SvgMapError> {
    let data = std::fs::read(path)?;
    decode(&data)
}

/// Décode le contenu brut d'un fichier SVG
///
/// Ordre de résolution: BOM, puis attribut `encoding` de la déclaration
/// XML, puis UTF-8 strict, puis windows-1252 en dernier recours.
pub fn decode(data: &[u8]) -> Result<String, SvgMapError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        return Ok(decode_with(&data[bom_len..], encoding));
    }

    if let Some(label) = declared_encoding(data) {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| SvgMapError::UnsupportedEncoding(label.clone()))?;
        // Sans BOM, une déclaration UTF-16 est lue dans un flux ASCII
        let is_utf16 = encoding == UTF_16LE || encoding == UTF_16BE;
        if encoding != UTF_8 && !is_utf16 {
            debug!(encoding = encoding.name(), "Decoding with declared encoding");
            return Ok(decode_with(data, encoding));
        }
    }

    match simdutf8::basic::from_utf8(data) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            warn!("SVG is not valid UTF-8, falling back to windows-1252");
            Ok(decode_with(data, WINDOWS_1252))
        }
    }
}

/// Extrait l'encodage de la déclaration `<?xml ... encoding="..."?>`
fn declared_encoding(data: &[u8]) -> Option<String> {
    let window = &data[..data.len().min(PROLOG_WINDOW)];
    if !window.starts_with(b"<?xml") {
        return None;
    }

    let end = memmem::find(window, b"?>")?;
    let prolog = &window[..end];
    let pos = memmem::find(prolog, b"encoding")?;

    let rest = &prolog[pos + "encoding".len()..];
    let eq = rest.iter().position(|&b| b == b'=')?;
    let rest = &rest[eq + 1..];
    let quote_pos = rest.iter().position(|&b| b == b'"' || b == b'\'')?;
    let quote = rest[quote_pos];
    let value = &rest[quote_pos + 1..];
    let close = value.iter().position(|&b| b == quote)?;

    std::str::from_utf8(&value[..close])
        .ok()
        .map(|s| s.trim().to_string())
}

fn decode_with(data: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, _) = encoding.decode_without_bom_handling(data);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        let text = decode("<svg><text>Lô 1</text></svg>".as_bytes()).unwrap();
        assert!(text.contains("Lô 1"));
    }

    #[test]
    fn test_decode_declared_latin1() {
        let mut data = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><svg><text>Lo".to_vec();
        data.push(0xF4); // ô
        data.extend_from_slice(b"</text></svg>");

        let text = decode(&data).unwrap();
        assert!(text.contains("Lo\u{f4}"));
    }

    #[test]
    fn test_decode_unknown_encoding() {
        let data = b"<?xml version='1.0' encoding='klingon'?><svg/>";
        assert!(matches!(
            decode(data),
            Err(SvgMapError::UnsupportedEncoding(label)) if label == "klingon"
        ));
    }

    #[test]
    fn test_decode_invalid_utf8_falls_back() {
        let data = [b'<', b's', b'v', b'g', b'>', 0xE9, b'<', b'/', b's', b'v', b'g', b'>'];
        let text = decode(&data).unwrap();
        assert_eq!(text, "<svg>\u{e9}</svg>");
    }

    #[test]
    fn test_decode_declared_utf16_without_bom() {
        let data = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><svg><text>Lô 2</text></svg>";
        let text = decode(data.as_bytes()).unwrap();
        assert!(text.contains("Lô 2"));
        assert!(text.starts_with("<?xml"));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let mut data = vec![0xFF, 0xFE];
        for unit in "<svg/>".encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&data).unwrap(), "<svg/>");
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"),
            Some("UTF-8".to_string())
        );
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><svg/>"), None);
        assert_eq!(declared_encoding(b"<svg/>"), None);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read(Path::new("nonexistent.svg"));
        assert!(matches!(result, Err(SvgMapError::Io(_))));
    }
}
